//! Woxel - an editable volumetric voxel canvas

pub mod core;
pub mod math;
pub mod voxel;
pub mod raycast;
pub mod storage;
pub mod export;
pub mod render;
pub mod session;
