//! Resolve the struck face of a picked cell

use crate::core::types::{IVec3, Vec3};
use crate::voxel::state::PlacementCandidate;

/// Neighbor cell across the face the sub-cell `offset` points at.
///
/// The offset is normalized and reduced to its strictly dominant axis. When
/// two or more axes tie for dominance nothing is zeroed, so rounding usually
/// produces a diagonal step and the resolution fails. Success requires the
/// rounded step to be exactly one cell along one axis.
pub fn resolve_face(cell: IVec3, offset: Vec3) -> Option<IVec3> {
    let mut diff = offset.try_normalize()?;
    let a = diff.abs();

    if a.x > a.y && a.x > a.z {
        diff.y = 0.0;
        diff.z = 0.0;
    } else if a.y > a.x && a.y > a.z {
        diff.x = 0.0;
        diff.z = 0.0;
    } else if a.z > a.x && a.z > a.y {
        diff.x = 0.0;
        diff.y = 0.0;
    }

    let step = diff.round();
    if step.abs().element_sum() != 1.0 {
        return None;
    }
    Some(cell + IVec3::new(step.x as i32, step.y as i32, step.z as i32))
}

/// Update a placement candidate from a picking hit.
///
/// On failure the candidate is marked invalid but keeps its previous cell.
pub fn update_candidate(candidate: &mut PlacementCandidate, cell: IVec3, offset: Vec3) {
    match resolve_face(cell, offset) {
        Some(target) => {
            candidate.cell = target;
            candidate.valid = true;
        }
        None => candidate.valid = false,
    }
}
