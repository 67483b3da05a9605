//! Input state tracking
//!
//! Input arrives as abstract [`InputEvent`]s so the session does not depend
//! on any windowing backend. A frontend maps its keys and buttons onto
//! [`Control`]s.

use std::collections::HashSet;

/// Logical editor controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Forward,
    Back,
    Left,
    Right,
    Up,
    Down,
    LookLeft,
    LookRight,
    LookUp,
    LookDown,
    Place,
    Delete,
    Replace,
    CloneColor,
    ScrollColorUp,
    ScrollColorDown,
    ToggleMirror,
    PlaceAtViewpoint,
    ToggleFast,
    /// Movement speed tier 1..=7
    SpeedTier(u8),
    TogglePitchLock,
    Reset,
    Save,
    Load,
}

/// A single input event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Pressed(Control),
    Released(Control),
    /// Relative mouse motion in pixels
    MouseMotion { dx: f32, dy: f32 },
    /// Wheel steps; negative scrolls forward through the palette
    Wheel(i32),
}

/// Tracks which controls are held and accumulated mouse motion
#[derive(Debug, Default)]
pub struct InputState {
    /// Currently held controls
    held: HashSet<Control>,
    /// Mouse movement since the last frame
    mouse_delta: (f32, f32),
}

impl InputState {
    /// Create new input state
    pub fn new() -> Self {
        Self::default()
    }

    /// Process an event. Returns true if it counts as user activity.
    pub fn process_event(&mut self, event: &InputEvent) -> bool {
        match *event {
            InputEvent::Pressed(control) => {
                self.held.insert(control);
            }
            InputEvent::Released(control) => {
                self.held.remove(&control);
            }
            InputEvent::MouseMotion { dx, dy } => {
                self.mouse_delta.0 += dx;
                self.mouse_delta.1 += dy;
            }
            InputEvent::Wheel(_) => {}
        }
        true
    }

    /// Check if a control is currently held
    pub fn is_held(&self, control: Control) -> bool {
        self.held.contains(&control)
    }

    /// Take the accumulated mouse delta, resetting it
    pub fn take_mouse_delta(&mut self) -> (f32, f32) {
        std::mem::take(&mut self.mouse_delta)
    }

    /// Release everything
    pub fn clear(&mut self) {
        self.held.clear();
        self.mouse_delta = (0.0, 0.0);
    }
}
