//! Error types for the woxel editor

use thiserror::Error;

use crate::storage::SnapshotError;

/// Main error type for the editor
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("Palette error: {0}")]
    Palette(String),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Render error: {0}")]
    Render(String),
}
