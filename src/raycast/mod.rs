//! Ray traversal through the voxel volume
//!
//! Two strategies share the [`Traversal`] interface:
//! - [`PickingMarch`]: fixed-step march used to find the cell under the
//!   crosshair for editing.
//! - [`BoundaryDda`]: exact cell-boundary stepping used for rendering.
//!
//! They are deliberately separate and can disagree on grazing rays.

pub mod dda;
pub mod picking;

pub use dda::BoundaryDda;
pub use picking::PickingMarch;

use crate::core::types::{IVec3, Vec3};
use crate::math::{Axis, Ray};
use crate::voxel::volume::VoxelVolume;

/// Distance attenuation factor for background and floor-facing hits
pub const FADE_PER_UNIT: f32 = 0.002590674;
/// Lower bound of the distance fade
pub const FADE_FLOOR: f32 = 0.6;

/// Fade multiplier for a point `distance` units from the eye
#[inline]
pub fn distance_fade(distance: f32) -> f32 {
    (1.0 - distance * FADE_PER_UNIT).max(FADE_FLOOR)
}

/// First occupied cell along a ray
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Hit cell
    pub cell: IVec3,
    /// Color index stored in the cell (never 0)
    pub color: u8,
    /// Sample position that produced the hit
    pub position: Vec3,
    /// `position - cell`; picking uses it to resolve the struck face
    pub offset: Vec3,
    /// Boundary axis crossed into the cell, if known
    pub face: Option<Axis>,
    /// Flat shading multiplier
    pub shade: f32,
    /// Distance from the ray origin to `position`
    pub distance: f32,
}

/// Why a traversal produced no hit
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MissReason {
    /// Ray points away from the volume
    Diverged,
    /// Ray enters exactly along an edge of the volume
    Edge,
    /// Ray left the volume; carries the background fade
    Exited { fade: f32 },
    /// Step budget ran out
    Exhausted,
}

/// Result of tracing one ray
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TraversalResult {
    Hit(RayHit),
    Miss(MissReason),
}

impl TraversalResult {
    pub fn hit(&self) -> Option<&RayHit> {
        match self {
            TraversalResult::Hit(hit) => Some(hit),
            TraversalResult::Miss(_) => None,
        }
    }

    pub fn is_hit(&self) -> bool {
        matches!(self, TraversalResult::Hit(_))
    }
}

/// A strategy for finding the first occupied cell along a ray
pub trait Traversal {
    fn trace(&self, volume: &VoxelVolume, ray: &Ray) -> TraversalResult;
}
