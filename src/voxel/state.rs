//! Player, camera and selection state

use crate::core::camera::View;
use crate::core::types::{IVec3, Vec3};
use crate::voxel::palette::FIRST_USER_INDEX;

/// Pitch range while free looking
pub const PITCH_RANGE: (f32, f32) = (0.1, 3.14);
/// Pitch range while pitch lock is on
pub const PITCH_RANGE_LOCKED: (f32, f32) = (0.03, 3.11);

/// Movement speed tiers selectable with keys 1..=7
pub const SPEED_TIERS: [f32; 7] = [9.3, 18.6, 37.2, 74.4, 148.8, 297.6, 595.2];

/// Cell adjacent to a picked face where a new voxel would go
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementCandidate {
    pub cell: IVec3,
    /// False when the last face resolution was ambiguous
    pub valid: bool,
}

impl PlacementCandidate {
    pub const INVALID: Self = Self { cell: IVec3::ZERO, valid: false };
}

impl Default for PlacementCandidate {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Editor state persisted alongside the volume.
///
/// `position` is stored negated: the eye sits at `-position`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EditorState {
    pub position: Vec3,
    pub candidate: PlacementCandidate,
    /// Mouse look sensitivity in radians per pixel
    pub sensitivity: f32,
    pub yaw: f32,
    pub pitch: f32,
    /// Selected color index
    pub selected: u8,
    /// Active movement speed
    pub speed: f32,
    pub speed_high: f32,
    pub speed_low: f32,
    pub pitch_lock: bool,
}

impl EditorState {
    pub const DEFAULT_SENSITIVITY: f32 = 0.003;

    /// Restore the default viewpoint and selection, keeping speed tiers
    pub fn reset(&mut self) {
        let speeds = (self.speed, self.speed_high, self.speed_low);
        *self = Self {
            speed: speeds.0,
            speed_high: speeds.1,
            speed_low: speeds.2,
            ..Self::default()
        };
    }

    /// Eye position in grid space
    pub fn eye(&self) -> Vec3 {
        -self.position
    }

    pub fn set_eye(&mut self, eye: Vec3) {
        self.position = -eye;
    }

    /// Current view basis
    pub fn view(&self) -> View {
        View::from_angles(self.yaw, self.pitch)
    }

    /// Look direction used for picking and movement.
    ///
    /// Under pitch lock the direction is flattened onto the horizontal plane.
    pub fn look_direction(&self) -> Vec3 {
        let mut look = self.view().forward;
        if self.pitch_lock {
            look.z = -0.001;
            look = look.normalize();
        }
        look
    }

    /// Clamp pitch into the range allowed by the current lock mode
    pub fn clamp_pitch(&mut self) {
        let (min, max) = if self.pitch_lock { PITCH_RANGE_LOCKED } else { PITCH_RANGE };
        self.pitch = self.pitch.clamp(min, max);
    }

    /// Apply a relative mouse motion in pixels
    pub fn apply_mouse_look(&mut self, dx: f32, dy: f32) {
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        self.yaw -= dx * self.sensitivity;
        self.pitch -= dy * self.sensitivity;
        self.clamp_pitch();
    }

    /// Select speed tier 1..=7; the tier is stored into the high or low
    /// slot depending on `fast`. Out-of-range tiers are ignored.
    pub fn select_speed_tier(&mut self, tier: u8, fast: bool) {
        let Some(&speed) = SPEED_TIERS.get((tier as usize).wrapping_sub(1)) else {
            return;
        };
        self.speed = speed;
        if fast {
            self.speed_high = speed;
        } else {
            self.speed_low = speed;
        }
    }

    /// Switch between high and low speed; returns the new fast flag
    pub fn toggle_fast(&mut self, fast: bool) -> bool {
        let fast = !fast;
        self.speed = if fast { self.speed_high } else { self.speed_low };
        fast
    }

    /// Fast mode is derived from the active speed on load
    pub fn is_fast(&self) -> bool {
        self.speed == self.speed_high
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            position: Vec3::new(-64.0, 130.0, -64.0),
            candidate: PlacementCandidate::INVALID,
            sensitivity: Self::DEFAULT_SENSITIVITY,
            yaw: 0.0,
            pitch: 1.57,
            selected: FIRST_USER_INDEX,
            speed: 37.2,
            speed_high: 74.4,
            speed_low: 37.2,
            pitch_lock: false,
        }
    }
}
