//! Project persistence

pub mod snapshot;

pub use snapshot::{
    SnapshotError, RecordHeader,
    encode_record, decode_record,
    compress, decompress,
    save_snapshot, load_snapshot,
    project_path, backup_path,
    RECORD_SIZE, HEADER_SIZE,
};
