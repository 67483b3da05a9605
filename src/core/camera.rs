//! View basis derived from yaw and pitch

use crate::core::types::{Mat3, Vec3};

/// Orthonormal view basis.
///
/// The rotation is `Rz(yaw) * Rx(pitch)`. With pitch at pi/2 the camera
/// looks horizontally along the world plane and +Z is up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct View {
    pub right: Vec3,
    pub up: Vec3,
    pub forward: Vec3,
}

impl View {
    /// Build the view basis from yaw and pitch in radians
    pub fn from_angles(yaw: f32, pitch: f32) -> Self {
        let m = Mat3::from_rotation_z(yaw) * Mat3::from_rotation_x(pitch);
        Self {
            right: m.x_axis,
            up: m.y_axis,
            forward: -m.z_axis,
        }
    }

    /// Per-axis screen scale keeping pixels square for a `width` x `height` target.
    pub fn screen_scale(width: u32, height: u32) -> (f32, f32) {
        let (w, h) = (width.max(1) as f32, height.max(1) as f32);
        if w < h {
            (w / h, 1.0)
        } else {
            (1.0, h / w)
        }
    }

    /// Unnormalized ray direction for a pixel at normalized device coordinates
    /// `(px, py)` in [-1, 1].
    pub fn ray_direction(&self, px: f32, py: f32, scale: (f32, f32)) -> Vec3 {
        self.forward + self.up * (py * scale.1) + self.right * (px * scale.0)
    }
}
