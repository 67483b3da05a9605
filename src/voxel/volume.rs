//! Dense 128³ voxel volume
//!
//! Each cell holds an 8-bit color index: 0 is empty, 1..=7 are system
//! colors and 8..=39 are user palette colors. Cells are stored X-fastest:
//! `index = z * 16384 + y * 128 + x`.

use crate::core::types::{IVec3, Vec3};
use crate::math::Aabb;

/// Cells per side of the volume
pub const GRID_SIZE: usize = 128;

/// Total number of cells
pub const GRID_CELLS: usize = GRID_SIZE * GRID_SIZE * GRID_SIZE;

/// Continuous bounds used for picking and traversal entry: every axis in
/// `[-0.5, 127.5]`, the outer faces of the border cells.
pub const BOUNDS_MIN: f32 = -0.5;
pub const BOUNDS_MAX: f32 = GRID_SIZE as f32 - 0.5;

/// Dense grid of color indices
#[derive(Clone, PartialEq, Eq)]
pub struct VoxelVolume {
    cells: Box<[u8]>,
}

impl VoxelVolume {
    /// Create an empty volume
    pub fn new() -> Self {
        Self {
            cells: vec![0u8; GRID_CELLS].into_boxed_slice(),
        }
    }

    /// Linear index of an in-range cell
    #[inline]
    pub fn index_of(x: usize, y: usize, z: usize) -> usize {
        z * GRID_SIZE * GRID_SIZE + y * GRID_SIZE + x
    }

    /// Inverse of [`Self::index_of`]
    #[inline]
    pub fn cell_of(index: usize) -> (usize, usize, usize) {
        let x = index % GRID_SIZE;
        let y = (index / GRID_SIZE) % GRID_SIZE;
        let z = index / (GRID_SIZE * GRID_SIZE);
        (x, y, z)
    }

    /// Whether an integer cell lies inside the grid
    #[inline]
    pub fn contains_cell(cell: IVec3) -> bool {
        let max = GRID_SIZE as i32;
        cell.x >= 0 && cell.x < max && cell.y >= 0 && cell.y < max && cell.z >= 0 && cell.z < max
    }

    /// Raw read. Panics on out-of-range coordinates like slice indexing.
    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> u8 {
        self.cells[Self::index_of(x, y, z)]
    }

    /// Read a cell, `None` outside 0..=127 on any axis
    #[inline]
    pub fn get_checked(&self, cell: IVec3) -> Option<u8> {
        if Self::contains_cell(cell) {
            Some(self.get(cell.x as usize, cell.y as usize, cell.z as usize))
        } else {
            None
        }
    }

    /// Read with the linear index clamped into the backing store.
    ///
    /// Out-of-range coordinates alias onto some in-range cell; callers use
    /// this only for neighbor occlusion tests where that is acceptable.
    #[inline]
    pub fn get_clamped(&self, x: i32, y: i32, z: i32) -> u8 {
        let n = GRID_SIZE as i64;
        let index = z as i64 * n * n + y as i64 * n + x as i64;
        self.cells[index.clamp(0, GRID_CELLS as i64 - 1) as usize]
    }

    /// Unconditional write
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, index: u8) {
        self.cells[Self::index_of(x, y, z)] = index;
    }

    /// Write an integer cell; returns false and does nothing if out of range
    pub fn set_checked(&mut self, cell: IVec3, index: u8) -> bool {
        if Self::contains_cell(cell) {
            self.set(cell.x as usize, cell.y as usize, cell.z as usize, index);
            true
        } else {
            false
        }
    }

    /// Continuous bounds of the grid
    pub fn bounds() -> Aabb {
        Aabb::cube(BOUNDS_MIN, BOUNDS_MAX)
    }

    /// Whether a continuous position is within `[-0.5, 127.5]` on every axis
    #[inline]
    pub fn is_in_bounds(p: Vec3) -> bool {
        Self::bounds().contains_point(p)
    }

    /// Number of non-empty cells
    pub fn count_occupied(&self) -> usize {
        self.cells.iter().filter(|&&c| c != 0).count()
    }

    /// Clear every cell
    pub fn clear(&mut self) {
        self.cells.fill(0);
    }

    /// Backing bytes in index order
    pub fn as_bytes(&self) -> &[u8] {
        &self.cells
    }

    /// Build a volume from exactly [`GRID_CELLS`] bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != GRID_CELLS {
            return None;
        }
        Some(Self {
            cells: bytes.to_vec().into_boxed_slice(),
        })
    }
}

impl Default for VoxelVolume {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for VoxelVolume {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoxelVolume")
            .field("occupied", &self.count_occupied())
            .finish()
    }
}
