//! Voxel data structures and operations

pub mod volume;
pub mod palette;
pub mod state;
pub mod canvas;
pub mod edit;

pub use volume::{VoxelVolume, GRID_SIZE};
pub use palette::Palette;
pub use state::EditorState;
pub use canvas::Canvas;
