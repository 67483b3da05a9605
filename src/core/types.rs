//! Core type aliases and re-exports

pub use glam::{
    Vec3,
    Mat3,
    IVec3,
};

/// Standard Result type for the editor
pub type Result<T> = std::result::Result<T, crate::core::error::Error>;
