//! Voxel editing
//!
//! Picking finds the cell under the crosshair, face resolution finds the
//! neighbor a new cell goes into, and the engine applies edit ops to the
//! volume.

pub mod face;
pub mod op;
pub mod engine;

pub use face::{resolve_face, update_candidate};
pub use op::{EditOp, EditOutcome, Rejection, ScrollTarget};
pub use engine::{aim_at, mirror_x, EditContext, EditEngine};
