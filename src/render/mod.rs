//! Software rendering of the volume
//!
//! Frames are traced on the CPU with the boundary DDA and handed to a
//! [`PresentationSurface`]. Window and HUD presentation live outside the
//! crate behind that trait.

pub mod shading;
pub mod frame;
pub mod surface;

pub use frame::{render_frame, Frame, FrameCamera};
pub use surface::{PngSurface, PresentationSurface};
