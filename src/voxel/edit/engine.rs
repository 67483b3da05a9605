//! Edit engine: picking-driven mutations of the volume

use crate::core::types::{IVec3, Vec3};
use crate::math::Ray;
use crate::raycast::{PickingMarch, RayHit, Traversal};
use crate::voxel::edit::face::update_candidate;
use crate::voxel::edit::op::{EditOp, EditOutcome, Rejection, ScrollTarget};
use crate::voxel::palette::{Palette, FIRST_USER_INDEX};
use crate::voxel::state::EditorState;
use crate::voxel::volume::{VoxelVolume, GRID_SIZE};

/// Distance in front of the eye used by place-at-viewpoint
const VIEWPOINT_REACH: f32 = 6.0;

/// Mutable view of a project handed to the engine for one operation
pub struct EditContext<'a> {
    pub volume: &'a mut VoxelVolume,
    pub palette: &'a Palette,
    pub state: &'a mut EditorState,
}

/// X coordinate mirrored about the volume center, kept inside the grid
pub fn mirror_x(x: i32) -> i32 {
    (GRID_SIZE as i32 - x).clamp(0, GRID_SIZE as i32 - 1)
}

/// Applies [`EditOp`]s under the occupancy rules.
///
/// - Place writes only into an empty cell next to the picked face.
/// - Delete and replace act on the picked cell itself.
/// - With mirroring on, place/delete/replace also write the X-mirrored
///   cell, regardless of what it holds.
#[derive(Debug, Default)]
pub struct EditEngine {
    pub mirror: bool,
    picker: PickingMarch,
}

impl EditEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cast the picking ray from the eye along the look direction
    pub fn pick(&self, volume: &VoxelVolume, state: &EditorState) -> Option<RayHit> {
        let ray = Ray::new(state.eye(), state.look_direction());
        self.picker.trace(volume, &ray).hit().copied()
    }

    /// Apply one operation
    pub fn apply(&mut self, op: EditOp, ctx: &mut EditContext<'_>) -> EditOutcome {
        match op {
            EditOp::Place => self.place(ctx),
            EditOp::Delete => self.overwrite_picked(ctx, 0),
            EditOp::Replace => {
                let color = ctx.state.selected;
                self.overwrite_picked(ctx, color)
            }
            EditOp::CloneColor => self.clone_color(ctx),
            EditOp::Scroll { delta, target } => self.scroll(ctx, delta, target),
            EditOp::ToggleMirror => {
                self.mirror = !self.mirror;
                log::debug!("Mirror {}", if self.mirror { "on" } else { "off" });
                EditOutcome::Applied { changed: false }
            }
            EditOp::PlaceAtViewpoint => place_at_viewpoint(ctx),
        }
    }

    fn place(&self, ctx: &mut EditContext<'_>) -> EditOutcome {
        let Some(hit) = self.pick(ctx.volume, ctx.state) else {
            ctx.state.candidate.valid = false;
            return EditOutcome::NoHit;
        };

        update_candidate(&mut ctx.state.candidate, hit.cell, hit.offset);
        if !ctx.state.candidate.valid {
            return EditOutcome::Rejected(Rejection::AmbiguousFace);
        }

        let cell = ctx.state.candidate.cell;
        match ctx.volume.get_checked(cell) {
            None => EditOutcome::Rejected(Rejection::OutOfBounds),
            Some(c) if c != 0 => EditOutcome::Rejected(Rejection::Occupied),
            Some(_) => {
                let color = ctx.state.selected;
                ctx.volume.set_checked(cell, color);
                self.write_mirror(ctx.volume, cell, color);
                EditOutcome::Applied { changed: true }
            }
        }
    }

    fn overwrite_picked(&self, ctx: &mut EditContext<'_>, color: u8) -> EditOutcome {
        let Some(hit) = self.pick(ctx.volume, ctx.state) else {
            return EditOutcome::NoHit;
        };
        ctx.volume.set_checked(hit.cell, color);
        self.write_mirror(ctx.volume, hit.cell, color);
        EditOutcome::Applied { changed: true }
    }

    fn write_mirror(&self, volume: &mut VoxelVolume, cell: IVec3, color: u8) {
        if self.mirror {
            volume.set_checked(IVec3::new(mirror_x(cell.x), cell.y, cell.z), color);
        }
    }

    fn clone_color(&self, ctx: &mut EditContext<'_>) -> EditOutcome {
        let Some(hit) = self.pick(ctx.volume, ctx.state) else {
            return EditOutcome::NoHit;
        };
        if !Palette::is_user(hit.color) {
            return EditOutcome::Rejected(Rejection::SystemColor);
        }
        ctx.state.selected = hit.color;
        EditOutcome::Applied { changed: false }
    }

    fn scroll(&self, ctx: &mut EditContext<'_>, delta: i32, target: ScrollTarget) -> EditOutcome {
        if target == ScrollTarget::Pointed {
            if let Some(hit) = self.pick(ctx.volume, ctx.state) {
                if Palette::is_user(hit.color) {
                    let color = ctx.palette.step(hit.color, delta);
                    ctx.volume.set_checked(hit.cell, color);
                    ctx.state.selected = color;
                    return EditOutcome::Applied { changed: color != hit.color };
                }
            }
        }
        ctx.state.selected = ctx.palette.step(ctx.state.selected, delta);
        EditOutcome::Applied { changed: false }
    }
}

fn place_at_viewpoint(ctx: &mut EditContext<'_>) -> EditOutcome {
    let target = (ctx.state.eye() + ctx.state.look_direction() * VIEWPOINT_REACH).round();
    if !VoxelVolume::is_in_bounds(target) {
        return EditOutcome::Rejected(Rejection::OutOfBounds);
    }
    let cell = IVec3::new(target.x as i32, target.y as i32, target.z as i32);
    if ctx.volume.set_checked(cell, FIRST_USER_INDEX) {
        EditOutcome::Applied { changed: true }
    } else {
        EditOutcome::Rejected(Rejection::OutOfBounds)
    }
}

/// Point the eye at `target` from `eye`, setting yaw and pitch.
///
/// Inverse of the view basis: forward = (-sin(yaw) sin(pitch),
/// cos(yaw) sin(pitch), -cos(pitch)).
pub fn aim_at(state: &mut EditorState, eye: Vec3, target: Vec3) {
    state.set_eye(eye);
    let dir = (target - eye).normalize_or_zero();
    if dir == Vec3::ZERO {
        return;
    }
    state.pitch = (-dir.z).clamp(-1.0, 1.0).acos();
    state.yaw = (-dir.x).atan2(dir.y);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Project {
        volume: VoxelVolume,
        palette: Palette,
        state: EditorState,
    }

    impl Project {
        fn new() -> Self {
            Self {
                volume: VoxelVolume::new(),
                palette: Palette::default(),
                state: EditorState::default(),
            }
        }

        /// Eye above (x, y) looking straight down -Z
        fn looking_down(x: f32, y: f32, z: f32) -> Self {
            let mut project = Self::new();
            project.state.set_eye(Vec3::new(x, y, z));
            project.state.yaw = 0.0;
            project.state.pitch = 0.0;
            project
        }

        fn apply(&mut self, engine: &mut EditEngine, op: EditOp) -> EditOutcome {
            let mut ctx = EditContext {
                volume: &mut self.volume,
                palette: &self.palette,
                state: &mut self.state,
            };
            engine.apply(op, &mut ctx)
        }
    }

    #[test]
    fn test_place_above_picked_cell() {
        let mut project = Project::looking_down(64.0, 64.0, 100.0);
        project.volume.set(64, 64, 64, 8);
        project.state.selected = 12;
        let mut engine = EditEngine::new();

        let outcome = project.apply(&mut engine, EditOp::Place);
        assert_eq!(outcome, EditOutcome::Applied { changed: true });
        assert_eq!(project.volume.get(64, 64, 65), 12);
        assert!(project.state.candidate.valid);
        assert_eq!(project.state.candidate.cell, IVec3::new(64, 64, 65));

        // The next place lands on top of the new cell, never overwriting
        project.apply(&mut engine, EditOp::Place);
        assert_eq!(project.volume.get(64, 64, 66), 12);
        assert_eq!(project.volume.get(64, 64, 65), 12);
        assert_eq!(project.volume.get(64, 64, 64), 8);
    }

    #[test]
    fn test_place_without_hit() {
        let mut project = Project::looking_down(64.0, 64.0, 100.0);
        let mut engine = EditEngine::new();
        assert_eq!(project.apply(&mut engine, EditOp::Place), EditOutcome::NoHit);
        assert_eq!(project.volume.count_occupied(), 0);
        assert!(!project.state.candidate.valid);
    }

    #[test]
    fn test_place_out_of_bounds_rejected() {
        // Hit the top layer from below the grid floor so the adjacent cell is z = -1
        let mut project = Project::new();
        project.volume.set(10, 10, 0, 9);
        aim_at(&mut project.state, Vec3::new(10.0, 10.0, -20.0), Vec3::new(10.0, 10.0, 0.0));
        let mut engine = EditEngine::new();
        assert_eq!(
            project.apply(&mut engine, EditOp::Place),
            EditOutcome::Rejected(Rejection::OutOfBounds)
        );
        assert_eq!(project.volume.count_occupied(), 1);
    }

    #[test]
    fn test_place_onto_occupied_neighbor_rejected() {
        // Entering the top face near its +X edge leaves an offset whose
        // dominant axis is X, so the candidate is the occupied neighbor
        let mut project = Project::new();
        project.volume.set(64, 64, 64, 8);
        project.volume.set(65, 64, 64, 9);
        project.state.selected = 12;
        let eye = Vec3::new(64.596, 64.0, 70.0);
        aim_at(&mut project.state, eye, eye + Vec3::new(-0.02, 0.0, -1.0));
        let mut engine = EditEngine::new();

        assert_eq!(
            project.apply(&mut engine, EditOp::Place),
            EditOutcome::Rejected(Rejection::Occupied)
        );
        assert_eq!(project.state.candidate.cell, IVec3::new(65, 64, 64));
        assert_eq!(project.volume.get(64, 64, 64), 8);
        assert_eq!(project.volume.get(65, 64, 64), 9);
        assert_eq!(project.volume.count_occupied(), 2);
    }

    #[test]
    fn test_delete_and_replace() {
        let mut project = Project::looking_down(30.0, 40.0, 120.0);
        project.volume.set(30, 40, 50, 9);
        project.state.selected = 15;
        let mut engine = EditEngine::new();

        assert_eq!(project.apply(&mut engine, EditOp::Replace), EditOutcome::Applied { changed: true });
        assert_eq!(project.volume.get(30, 40, 50), 15);

        assert_eq!(project.apply(&mut engine, EditOp::Delete), EditOutcome::Applied { changed: true });
        assert_eq!(project.volume.count_occupied(), 0);
        assert_eq!(project.apply(&mut engine, EditOp::Delete), EditOutcome::NoHit);
    }

    #[test]
    fn test_mirror_symmetry() {
        assert_eq!(mirror_x(64), 64);
        assert_eq!(mirror_x(60), 68);
        assert_eq!(mirror_x(68), 60);
        assert_eq!(mirror_x(0), 127);
        assert_eq!(mirror_x(127), 1);

        let mut project = Project::looking_down(60.0, 64.0, 100.0);
        project.volume.set(60, 64, 64, 8);
        project.volume.set(68, 64, 70, 3);
        project.state.selected = 10;
        let mut engine = EditEngine::new();
        project.apply(&mut engine, EditOp::ToggleMirror);
        assert!(engine.mirror);

        project.apply(&mut engine, EditOp::Place);
        assert_eq!(project.volume.get(60, 64, 65), 10);
        assert_eq!(project.volume.get(68, 64, 65), 10);

        project.apply(&mut engine, EditOp::Replace);
        assert_eq!(project.volume.get(60, 64, 65), 10);
        assert_eq!(project.volume.get(68, 64, 65), 10);

        project.apply(&mut engine, EditOp::Delete);
        assert_eq!(project.volume.get(60, 64, 65), 0);
        assert_eq!(project.volume.get(68, 64, 65), 0);
        assert_eq!(project.volume.get(68, 64, 70), 3);
    }

    #[test]
    fn test_clone_color() {
        let mut project = Project::looking_down(20.0, 20.0, 100.0);
        project.volume.set(20, 20, 20, 17);
        let mut engine = EditEngine::new();
        assert_eq!(project.apply(&mut engine, EditOp::CloneColor), EditOutcome::Applied { changed: false });
        assert_eq!(project.state.selected, 17);

        project.volume.set(20, 20, 30, 2);
        let outcome = project.apply(&mut engine, EditOp::CloneColor);
        assert_eq!(outcome, EditOutcome::Rejected(Rejection::SystemColor));
        assert_eq!(project.state.selected, 17);
    }

    #[test]
    fn test_scroll_pointed_cell() {
        let mut project = Project::looking_down(20.0, 20.0, 100.0);
        project.volume.set(20, 20, 20, 9);
        let mut engine = EditEngine::new();

        let op = EditOp::Scroll { delta: 1, target: ScrollTarget::Pointed };
        assert_eq!(project.apply(&mut engine, op), EditOutcome::Applied { changed: true });
        assert_eq!(project.volume.get(20, 20, 20), 10);
        assert_eq!(project.state.selected, 10);

        // Selection-only scroll leaves the cell alone
        let op = EditOp::Scroll { delta: -1, target: ScrollTarget::Selection };
        project.apply(&mut engine, op);
        assert_eq!(project.state.selected, 9);
        assert_eq!(project.volume.get(20, 20, 20), 10);
    }

    #[test]
    fn test_scroll_system_cell_moves_selection() {
        let mut project = Project::looking_down(20.0, 20.0, 100.0);
        project.volume.set(20, 20, 20, 3);
        project.state.selected = 39;
        let mut engine = EditEngine::new();
        let op = EditOp::Scroll { delta: 1, target: ScrollTarget::Pointed };
        project.apply(&mut engine, op);
        assert_eq!(project.volume.get(20, 20, 20), 3);
        assert_eq!(project.state.selected, 8);
    }

    #[test]
    fn test_place_at_viewpoint() {
        let mut project = Project::looking_down(64.0, 64.0, 100.0);
        let mut engine = EditEngine::new();
        assert_eq!(
            project.apply(&mut engine, EditOp::PlaceAtViewpoint),
            EditOutcome::Applied { changed: true }
        );
        assert_eq!(project.volume.get(64, 64, 94), 8);

        let mut outside = Project::looking_down(64.0, 64.0, 300.0);
        assert_eq!(
            outside.apply(&mut engine, EditOp::PlaceAtViewpoint),
            EditOutcome::Rejected(Rejection::OutOfBounds)
        );
    }

    #[test]
    fn test_aim_at() {
        let mut state = EditorState::default();
        aim_at(&mut state, Vec3::new(0.0, 0.0, 0.0), Vec3::new(3.0, 4.0, 0.0));
        let look = state.look_direction();
        assert!((look - Vec3::new(0.6, 0.8, 0.0)).length() < 1e-4);
    }
}
