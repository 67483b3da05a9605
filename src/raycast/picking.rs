//! Fixed-step picking march

use super::{MissReason, RayHit, Traversal, TraversalResult};
use crate::core::types::IVec3;
use crate::math::Ray;
use crate::voxel::volume::VoxelVolume;

/// Marches a ray in fixed increments and rounds each sample to a cell.
///
/// The direction is expected to be unit length. Samples outside
/// `[-0.5, 127.5]` are skipped rather than terminating the march, so a ray
/// starting outside the volume can still reach it within the step budget.
#[derive(Clone, Copy, Debug)]
pub struct PickingMarch {
    /// Advance per step as a fraction of the direction
    pub step: f32,
    pub max_steps: u32,
}

impl Default for PickingMarch {
    fn default() -> Self {
        Self {
            step: 1.0 / 64.0,
            max_steps: 8192,
        }
    }
}

impl Traversal for PickingMarch {
    fn trace(&self, volume: &VoxelVolume, ray: &Ray) -> TraversalResult {
        let increment = ray.direction * self.step;
        let mut sample = ray.origin;

        for i in 1..=self.max_steps {
            sample += increment;
            if !VoxelVolume::is_in_bounds(sample) {
                continue;
            }

            // f32::round rounds half away from zero
            let rounded = sample.round();
            let cell = IVec3::new(rounded.x as i32, rounded.y as i32, rounded.z as i32);
            match volume.get_checked(cell) {
                Some(color) if color != 0 => {
                    return TraversalResult::Hit(RayHit {
                        cell,
                        color,
                        position: sample,
                        offset: sample - rounded,
                        face: None,
                        shade: 1.0,
                        distance: i as f32 * increment.length(),
                    });
                }
                _ => {}
            }
        }

        TraversalResult::Miss(MissReason::Exhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vec3;

    #[test]
    fn test_hit_from_above() {
        let mut volume = VoxelVolume::new();
        volume.set(64, 64, 64, 8);
        let ray = Ray::new(Vec3::new(64.0, 64.0, 100.0), Vec3::NEG_Z);

        let result = PickingMarch::default().trace(&volume, &ray);
        let hit = result.hit().copied().unwrap();
        assert_eq!(hit.cell, IVec3::new(64, 64, 64));
        assert_eq!(hit.color, 8);
        assert_eq!(hit.offset.x, 0.0);
        assert_eq!(hit.offset.y, 0.0);
        assert!((hit.offset.z - 0.484375).abs() < 1e-4);
    }

    #[test]
    fn test_miss_on_empty_volume() {
        let volume = VoxelVolume::new();
        let ray = Ray::new(Vec3::splat(64.0), Vec3::X);
        assert_eq!(
            PickingMarch::default().trace(&volume, &ray),
            TraversalResult::Miss(MissReason::Exhausted)
        );
    }

    #[test]
    fn test_reaches_volume_from_outside() {
        let mut volume = VoxelVolume::new();
        volume.set(0, 10, 10, 3);
        let ray = Ray::new(Vec3::new(-20.0, 10.0, 10.0), Vec3::X);
        let hit = PickingMarch::default().trace(&volume, &ray);
        assert_eq!(hit.hit().map(|h| h.cell), Some(IVec3::new(0, 10, 10)));
    }

    #[test]
    fn test_rounded_cell_past_grid_is_ignored() {
        let mut volume = VoxelVolume::new();
        volume.set(127, 5, 5, 9);
        // Travels along the +X face plane; samples round to x = 128 and must not alias
        let ray = Ray::new(Vec3::new(127.5, 5.0, 20.0), Vec3::NEG_Z);
        let result = PickingMarch { step: 1.0 / 64.0, max_steps: 2000 }.trace(&volume, &ray);
        assert!(!result.is_hit());
    }
}
