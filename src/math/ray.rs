//! Ray type and operations

use crate::core::types::Vec3;

/// A ray defined by origin and direction.
///
/// The direction is not required to be normalized. Grid traversals treat
/// the direction as given so distances are measured in units of its length.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Per-axis step sign: +1 for non-negative components, -1 otherwise
    pub fn step_sign(&self) -> Vec3 {
        Vec3::new(
            if self.direction.x >= 0.0 { 1.0 } else { -1.0 },
            if self.direction.y >= 0.0 { 1.0 } else { -1.0 },
            if self.direction.z >= 0.0 { 1.0 } else { -1.0 },
        )
    }

    /// True if the direction has no length
    pub fn is_degenerate(&self) -> bool {
        self.direction == Vec3::ZERO
    }
}
