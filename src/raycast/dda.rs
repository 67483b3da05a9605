//! Exact cell-boundary DDA used for rendering

use super::{distance_fade, MissReason, RayHit, Traversal, TraversalResult};
use crate::core::types::{IVec3, Vec3};
use crate::math::{Axis, Ray};
use crate::voxel::volume::{VoxelVolume, BOUNDS_MAX, BOUNDS_MIN};

/// Exit tolerance past the outer cell faces
const EXIT_MIN: f32 = -0.7;
const EXIT_MAX: f32 = BOUNDS_MAX + 0.2;

/// Flat shading per crossing axis
fn axis_shade(axis: Axis) -> f32 {
    match axis {
        Axis::X => 0.9,
        Axis::Y => 1.0,
        Axis::Z => 0.8,
    }
}

/// Steps from boundary to boundary, sampling the cell just past each
/// crossing. The direction need not be normalized; distances are in
/// multiples of it.
#[derive(Clone, Copy, Debug)]
pub struct BoundaryDda {
    pub max_steps: u32,
}

impl Default for BoundaryDda {
    fn default() -> Self {
        Self { max_steps: 512 }
    }
}

/// Cell containing a continuous position, cells being centered on integers
#[inline]
fn cell_at(p: Vec3) -> IVec3 {
    let c = (p + Vec3::splat(0.5)).floor();
    IVec3::new(c.x as i32, c.y as i32, c.z as i32)
}

/// Distance to the next boundary on one axis, infinite for a zero component
#[inline]
fn boundary_distance(pos: f32, dir: f32, sign: f32) -> f32 {
    if dir == 0.0 {
        return f32::INFINITY;
    }
    let frac = (pos + 0.5) - (pos + 0.5).floor();
    (((sign + 1.0) * 0.5) - frac) / dir
}

#[inline]
fn remaining_distances(pos: Vec3, dir: Vec3, sign: Vec3) -> Vec3 {
    Vec3::new(
        boundary_distance(pos.x, dir.x, sign.x),
        boundary_distance(pos.y, dir.y, sign.y),
        boundary_distance(pos.z, dir.z, sign.z),
    )
}

/// Entry distance along one axis for an origin outside the slab.
/// `None` means the ray can never reach the slab on this axis.
#[inline]
fn entry_distance(pos: f32, dir: f32) -> Option<f32> {
    let bound = if pos < BOUNDS_MIN {
        BOUNDS_MIN
    } else if pos > BOUNDS_MAX {
        BOUNDS_MAX
    } else {
        return Some(0.0);
    };
    if dir == 0.0 {
        return None;
    }
    let t = -((pos - bound) / dir);
    (t >= 0.0).then_some(t)
}

#[inline]
fn outside(v: f32) -> bool {
    v < BOUNDS_MIN || v > BOUNDS_MAX
}

impl BoundaryDda {
    fn sample(
        volume: &VoxelVolume,
        origin: Vec3,
        pos: Vec3,
        check: Vec3,
        axis: Axis,
        shade: f32,
    ) -> Option<RayHit> {
        let cell = cell_at(check);
        let color = volume.get_checked(cell)?;
        if color == 0 {
            return None;
        }
        Some(RayHit {
            cell,
            color,
            position: pos,
            offset: pos - cell.as_vec3(),
            face: Some(axis),
            shade,
            distance: origin.distance(pos),
        })
    }
}

impl Traversal for BoundaryDda {
    fn trace(&self, volume: &VoxelVolume, ray: &Ray) -> TraversalResult {
        if ray.is_degenerate() {
            return TraversalResult::Miss(MissReason::Diverged);
        }

        let origin = ray.origin;
        let dir = ray.direction;
        let sign = ray.step_sign();
        let half = sign * 0.5;
        let per = Vec3::new(
            if dir.x == 0.0 { f32::INFINITY } else { sign.x / dir.x },
            if dir.y == 0.0 { f32::INFINITY } else { sign.y / dir.y },
            if dir.z == 0.0 { f32::INFINITY } else { sign.z / dir.z },
        );

        let mut pos = origin;
        let mut remaining = remaining_distances(pos, dir, sign);

        if !VoxelVolume::is_in_bounds(pos) {
            let (Some(tx), Some(ty), Some(tz)) = (
                entry_distance(pos.x, dir.x),
                entry_distance(pos.y, dir.y),
                entry_distance(pos.z, dir.z),
            ) else {
                return TraversalResult::Miss(MissReason::Diverged);
            };

            let t = tx.max(ty).max(tz);
            pos += dir * t;
            remaining = remaining_distances(pos, dir, sign);

            let axis = if t == tx {
                Axis::X
            } else if t == ty {
                Axis::Y
            } else {
                Axis::Z
            };
            let [a, b] = axis.others();
            if outside(a.of(pos)) || outside(b.of(pos)) {
                return TraversalResult::Miss(MissReason::Edge);
            }

            let i = axis.index();
            remaining[i] = per[i];
            let mut check = pos;
            check[i] += half[i];
            if let Some(hit) = Self::sample(volume, origin, pos, check, axis, 1.0) {
                return TraversalResult::Hit(hit);
            }
        }

        for _ in 0..self.max_steps {
            let axis = if remaining.x < remaining.y && remaining.x < remaining.z {
                Axis::X
            } else if remaining.y < remaining.z {
                Axis::Y
            } else {
                Axis::Z
            };
            let i = axis.index();
            let step = remaining[i];

            pos += dir * step;
            for other in axis.others() {
                remaining[other.index()] -= step;
            }
            remaining[i] = per[i];

            let next = pos[i] + sign[i];
            if next > EXIT_MAX || next < EXIT_MIN {
                let fade = distance_fade(origin.distance(pos));
                return TraversalResult::Miss(MissReason::Exited { fade });
            }

            let mut check = pos;
            check[i] += half[i];
            let mut shade = axis_shade(axis);
            if axis == Axis::Y {
                shade *= distance_fade(origin.distance(pos));
            }
            if let Some(hit) = Self::sample(volume, origin, pos, check, axis, shade) {
                return TraversalResult::Hit(hit);
            }
        }

        TraversalResult::Miss(MissReason::Exhausted)
    }
}
