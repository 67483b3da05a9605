//! A project: volume, palette and editor state together

use crate::voxel::palette::Palette;
use crate::voxel::state::EditorState;
use crate::voxel::volume::VoxelVolume;

/// Everything that makes up one saved project
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Canvas {
    pub state: EditorState,
    pub palette: Palette,
    pub volume: VoxelVolume,
}

impl Canvas {
    /// New project with the default palette, state and seed voxels.
    ///
    /// The seed marks the center, one cell in from each face on the
    /// centerlines, and the eight inner corners.
    pub fn seeded() -> Self {
        let mut volume = VoxelVolume::new();

        volume.set(64, 64, 64, 1);
        volume.set(64, 64, 1, 7);
        volume.set(1, 64, 64, 3);
        volume.set(64, 1, 64, 5);
        volume.set(64, 64, 126, 6);
        volume.set(126, 64, 64, 2);
        volume.set(64, 126, 64, 4);

        for z in [1, 126] {
            for y in [1, 126] {
                for x in [1, 126] {
                    volume.set(x, y, z, 1);
                }
            }
        }

        Self {
            state: EditorState::default(),
            palette: Palette::default(),
            volume,
        }
    }
}
