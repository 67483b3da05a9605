//! Snapshot serialization and disk I/O
//!
//! A project is one fixed-layout record, gzip-compressed:
//!
//! | field | type |
//! |---|---|
//! | position | 4 × f32 |
//! | place candidate | 4 × f32 (w: 1 valid, -1 invalid) |
//! | sensitivity, yaw, pitch, selected, speed, speed_high, speed_low | 7 × f32 |
//! | pitch_lock | u8 + 3 padding bytes |
//! | palette | 39 × u32 |
//! | voxels | 2 097 152 × u8 |
//!
//! Fields are host byte order, little-endian on every supported target.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use bytemuck::{Pod, Zeroable};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use thiserror::Error;

use crate::core::types::{IVec3, Result, Vec3};
use crate::voxel::canvas::Canvas;
use crate::voxel::palette::{Palette, PALETTE_SLOTS};
use crate::voxel::state::{EditorState, PlacementCandidate};
use crate::voxel::volume::{VoxelVolume, GRID_CELLS};

/// Project file extension
pub const SNAPSHOT_EXTENSION: &str = "wox.gz";

/// Suffix appended to the project path for idle backups
pub const BACKUP_SUFFIX: &str = ".idle";

/// Size of the state + palette header
pub const HEADER_SIZE: usize = std::mem::size_of::<RecordHeader>();

/// Size of a full uncompressed record
pub const RECORD_SIZE: usize = HEADER_SIZE + GRID_CELLS;

/// Errors specific to snapshot decoding
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("gzip stream is invalid: {0}")]
    Decompress(std::io::Error),

    #[error("record is {actual} bytes, expected {expected}")]
    Length { expected: usize, actual: usize },
}

/// Header preceding the voxel bytes
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct RecordHeader {
    pub position: [f32; 4],
    pub candidate: [f32; 4],
    pub sensitivity: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub selected: f32,
    pub speed: f32,
    pub speed_high: f32,
    pub speed_low: f32,
    pub pitch_lock: u8,
    pub _pad: [u8; 3],
    pub palette: [u32; PALETTE_SLOTS],
}

const _: () = assert!(std::mem::size_of::<RecordHeader>() == 220);

impl RecordHeader {
    fn from_canvas(canvas: &Canvas) -> Self {
        let state = &canvas.state;
        let c = state.candidate;
        Self {
            position: [state.position.x, state.position.y, state.position.z, 0.0],
            candidate: [
                c.cell.x as f32,
                c.cell.y as f32,
                c.cell.z as f32,
                if c.valid { 1.0 } else { -1.0 },
            ],
            sensitivity: state.sensitivity,
            yaw: state.yaw,
            pitch: state.pitch,
            selected: state.selected as f32,
            speed: state.speed,
            speed_high: state.speed_high,
            speed_low: state.speed_low,
            pitch_lock: state.pitch_lock as u8,
            _pad: [0; 3],
            palette: *canvas.palette.slots(),
        }
    }

    fn state(&self) -> EditorState {
        let [px, py, pz, _] = self.position;
        let [cx, cy, cz, cw] = self.candidate;
        EditorState {
            position: Vec3::new(px, py, pz),
            candidate: PlacementCandidate {
                cell: IVec3::new(cx as i32, cy as i32, cz as i32),
                valid: cw == 1.0,
            },
            sensitivity: self.sensitivity,
            yaw: self.yaw,
            pitch: self.pitch,
            selected: self.selected as u8,
            speed: self.speed,
            speed_high: self.speed_high,
            speed_low: self.speed_low,
            pitch_lock: self.pitch_lock != 0,
        }
    }
}

/// Serialize a canvas to an uncompressed record
pub fn encode_record(canvas: &Canvas) -> Vec<u8> {
    let header = RecordHeader::from_canvas(canvas);
    let mut bytes = Vec::with_capacity(RECORD_SIZE);
    bytes.extend_from_slice(bytemuck::bytes_of(&header));
    bytes.extend_from_slice(canvas.volume.as_bytes());
    bytes
}

/// Deserialize an uncompressed record.
///
/// Only the length is validated; field values are taken as stored.
pub fn decode_record(bytes: &[u8]) -> std::result::Result<Canvas, SnapshotError> {
    if bytes.len() != RECORD_SIZE {
        return Err(SnapshotError::Length { expected: RECORD_SIZE, actual: bytes.len() });
    }
    let (head, voxels) = bytes.split_at(HEADER_SIZE);
    let header: RecordHeader = bytemuck::pod_read_unaligned(head);
    let volume = VoxelVolume::from_bytes(voxels)
        .ok_or(SnapshotError::Length { expected: RECORD_SIZE, actual: bytes.len() })?;

    Ok(Canvas {
        state: header.state(),
        palette: Palette::from_slots(header.palette),
        volume,
    })
}

/// Gzip at the highest compression level
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Inflate a gzip stream.
///
/// Output stops one byte past [`RECORD_SIZE`]; anything longer is already
/// a length error and is not inflated further.
pub fn decompress(data: &[u8]) -> std::result::Result<Vec<u8>, SnapshotError> {
    let mut decoder = GzDecoder::new(data).take(RECORD_SIZE as u64 + 1);
    let mut out = Vec::with_capacity(RECORD_SIZE);
    decoder.read_to_end(&mut out).map_err(SnapshotError::Decompress)?;
    Ok(out)
}

/// Get the file path for a named project
pub fn project_path(data_dir: &Path, name: &str) -> PathBuf {
    data_dir.join(format!("{}.{}", name, SNAPSHOT_EXTENSION))
}

/// Idle-backup path next to a project file
pub fn backup_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(BACKUP_SUFFIX);
    PathBuf::from(os)
}

/// Save a canvas to disk (compressed)
pub fn save_snapshot(path: &Path, canvas: &Canvas) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // Write beside the target, then rename over it
    let compressed = compress(&encode_record(canvas))?;
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, compressed)?;
    std::fs::rename(&tmp, path)?;

    log::info!(
        "Saved {} voxels to {} ({} bytes)",
        canvas.volume.count_occupied(),
        path.display(),
        std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
    );
    Ok(())
}

/// Load a canvas from disk (if it exists)
pub fn load_snapshot(path: &Path) -> Result<Option<Canvas>> {
    if !path.exists() {
        return Ok(None);
    }

    let compressed = std::fs::read(path)?;
    let canvas = decode_record(&decompress(&compressed)?)?;

    log::info!(
        "Loaded {} voxels from {}",
        canvas.volume.count_occupied(),
        path.display()
    );
    Ok(Some(canvas))
}
