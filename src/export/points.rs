//! Text point-list exports

use std::io::{self, Write};

use super::{for_each_exportable, EXPORT_CENTER, EXPORT_TITLE};
use crate::voxel::palette::Palette;
use crate::voxel::volume::{VoxelVolume, GRID_SIZE};

/// One exported cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExportPoint {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub rgb: [u8; 3],
}

impl ExportPoint {
    fn new(x: usize, y: usize, z: usize, rgb: [u8; 3]) -> Self {
        Self {
            x: x as i32 - EXPORT_CENTER,
            y: y as i32 - EXPORT_CENTER,
            z: z as i32,
            rgb,
        }
    }
}

impl std::fmt::Display for ExportPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [r, g, b] = self.rgb;
        write!(f, "{} {} {} {:02X}{:02X}{:02X}", self.x, self.y, self.z, r, g, b)
    }
}

/// Whether a cell touches the grid boundary or an empty neighbor
fn is_visible(volume: &VoxelVolume, x: usize, y: usize, z: usize) -> bool {
    let last = GRID_SIZE - 1;
    if x == 0 || y == 0 || z == 0 || x >= last || y >= last || z >= last {
        return true;
    }
    let (x, y, z) = (x as i32, y as i32, z as i32);
    [
        (x - 1, y, z),
        (x + 1, y, z),
        (x, y - 1, z),
        (x, y + 1, z),
        (x, y, z - 1),
        (x, y, z + 1),
    ]
    .into_iter()
    .any(|(nx, ny, nz)| volume.get_clamped(nx, ny, nz) == 0)
}

/// Collect exportable points, optionally only visible ones
pub fn collect_points(volume: &VoxelVolume, palette: &Palette, visible_only: bool) -> Vec<ExportPoint> {
    let mut points = Vec::new();
    for_each_exportable(volume, palette, |x, y, z, rgb| {
        if !visible_only || is_visible(volume, x, y, z) {
            points.push(ExportPoint::new(x, y, z, rgb));
        }
    });
    points
}

fn write_points<W: Write>(writer: &mut W, points: &[ExportPoint], suffix: &str) -> io::Result<()> {
    writeln!(writer, "# {}{}", EXPORT_TITLE, suffix)?;
    writeln!(writer, "# X Y Z RRGGBB")?;
    for point in points {
        writeln!(writer, "{}", point)?;
    }
    Ok(())
}

/// Write every colored cell
pub fn export_points<W: Write>(writer: &mut W, volume: &VoxelVolume, palette: &Palette) -> io::Result<()> {
    write_points(writer, &collect_points(volume, palette, false), "")
}

/// Write only cells on the boundary or next to an empty cell
pub fn visible_points<W: Write>(writer: &mut W, volume: &VoxelVolume, palette: &Palette) -> io::Result<()> {
    write_points(writer, &collect_points(volume, palette, true), " - Visible Voxels only")
}
