//! Edit operations and their outcomes

/// Which color a palette scroll changes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollTarget {
    /// Scroll the pointed user-colored cell, falling back to the selection
    Pointed,
    /// Scroll only the selected color
    Selection,
}

/// Type of edit operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditOp {
    /// Fill the empty cell adjacent to the picked face with the selection
    Place,
    /// Clear the picked cell
    Delete,
    /// Overwrite the picked cell with the selection
    Replace,
    /// Copy the picked cell's user color into the selection
    CloneColor,
    /// Move one assigned palette slot forward (`delta > 0`) or back
    Scroll { delta: i32, target: ScrollTarget },
    /// Toggle X-mirrored editing
    ToggleMirror,
    /// Write color 8 a few units in front of the eye
    PlaceAtViewpoint,
}

impl EditOp {
    /// Ops that repeat while their control is held
    pub fn repeats(&self) -> bool {
        matches!(self, EditOp::Place | EditOp::Delete | EditOp::Replace)
    }
}

/// Why an operation did nothing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// The picked offset did not resolve to a single face
    AmbiguousFace,
    /// Target cell lies outside the volume
    OutOfBounds,
    /// Target cell is already filled
    Occupied,
    /// System colors cannot be cloned
    SystemColor,
}

impl Rejection {
    /// Transient message to show the user, if any
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Rejection::SystemColor => Some("This is a system color you cannot clone this."),
            _ => None,
        }
    }
}

/// Result of applying an [`EditOp`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditOutcome {
    /// Applied; `changed` is false when only the selection or a flag moved
    Applied { changed: bool },
    /// The op needed a picking hit and there was none
    NoHit,
    Rejected(Rejection),
}

impl EditOutcome {
    pub fn changed_volume(&self) -> bool {
        matches!(self, EditOutcome::Applied { changed: true })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeating_ops() {
        assert!(EditOp::Place.repeats());
        assert!(EditOp::Replace.repeats());
        assert!(!EditOp::CloneColor.repeats());
        assert!(!EditOp::Scroll { delta: 1, target: ScrollTarget::Pointed }.repeats());
    }

    #[test]
    fn test_only_system_color_has_message() {
        assert!(Rejection::SystemColor.message().is_some());
        assert!(Rejection::Occupied.message().is_none());
    }
}
