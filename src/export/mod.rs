//! Point-list and mesh export
//!
//! Every export scans the volume z-outer, y, x-inner and considers only
//! user-colored cells (index >= 8) whose palette RGB is non-zero. Output
//! X and Y are re-centered by -64; Z is written as stored.

pub mod points;
pub mod mesh;

pub use points::{export_points, visible_points, ExportPoint};
pub use mesh::{count_exposed_faces, write_ply, Face};

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::core::types::Result;
use crate::core::Error;
use crate::storage::save_snapshot;
use crate::voxel::canvas::Canvas;
use crate::voxel::palette::{Palette, FIRST_USER_INDEX};
use crate::voxel::volume::{VoxelVolume, GRID_SIZE};

/// Header name written into text and mesh exports
pub const EXPORT_TITLE: &str = "Woxel v1.0";

/// Offset subtracted from X and Y on export
pub const EXPORT_CENTER: i32 = (GRID_SIZE / 2) as i32;

/// Supported export formats
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    /// Compressed project snapshot at an explicit path
    Wox,
    /// Every colored cell
    Txt,
    /// Only cells with at least one empty neighbor
    Vv,
    /// ASCII PLY mesh of exposed faces
    Ply,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Wox,
        ExportFormat::Txt,
        ExportFormat::Vv,
        ExportFormat::Ply,
    ];

    /// Parse a format name; anything unrecognized is a snapshot
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "txt" => ExportFormat::Txt,
            "vv" => ExportFormat::Vv,
            "ply" => ExportFormat::Ply,
            _ => ExportFormat::Wox,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ExportFormat::Wox => "wox",
            ExportFormat::Txt => "txt",
            ExportFormat::Vv => "vv",
            ExportFormat::Ply => "ply",
        }
    }
}

/// Color of an exportable cell, `None` for empty, system or black cells
#[inline]
pub(crate) fn export_color(palette: &Palette, index: u8) -> Option<[u8; 3]> {
    if index < FIRST_USER_INDEX {
        return None;
    }
    let rgb = palette.rgb_bytes(index);
    (rgb != [0, 0, 0]).then_some(rgb)
}

/// Visit exportable cells in export order
pub(crate) fn for_each_exportable(
    volume: &VoxelVolume,
    palette: &Palette,
    mut f: impl FnMut(usize, usize, usize, [u8; 3]),
) {
    for z in 0..GRID_SIZE {
        for y in 0..GRID_SIZE {
            for x in 0..GRID_SIZE {
                if let Some(rgb) = export_color(palette, volume.get(x, y, z)) {
                    f(x, y, z, rgb);
                }
            }
        }
    }
}

/// Write one export to `path`
pub fn export_to_path(canvas: &Canvas, format: ExportFormat, path: &Path) -> Result<()> {
    type Writer = fn(&mut BufWriter<File>, &VoxelVolume, &Palette) -> std::io::Result<()>;
    let write: Writer = match format {
        ExportFormat::Wox => return save_snapshot(path, canvas),
        ExportFormat::Txt => export_points,
        ExportFormat::Vv => visible_points,
        ExportFormat::Ply => write_ply,
    };

    let file = File::create(path)
        .map_err(|e| Error::Export(format!("cannot create {}: {}", path.display(), e)))?;
    let mut writer = BufWriter::new(file);
    write(&mut writer, &canvas.volume, &canvas.palette)?;
    writer.flush()?;

    log::info!("Exported {}: {}", format.name().to_uppercase(), path.display());
    Ok(())
}

/// Run several exports, logging and skipping any that fail.
///
/// Returns how many succeeded.
pub fn export_all(canvas: &Canvas, jobs: &[(ExportFormat, &Path)]) -> usize {
    let mut done = 0;
    for (format, path) in jobs {
        match export_to_path(canvas, *format, path) {
            Ok(()) => done += 1,
            Err(e) => log::error!("Export {} to {} failed: {}", format.name(), path.display(), e),
        }
    }
    done
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format() {
        assert_eq!(ExportFormat::parse("txt"), ExportFormat::Txt);
        assert_eq!(ExportFormat::parse("VV"), ExportFormat::Vv);
        assert_eq!(ExportFormat::parse("ply"), ExportFormat::Ply);
        assert_eq!(ExportFormat::parse("wox"), ExportFormat::Wox);
        assert_eq!(ExportFormat::parse("obj"), ExportFormat::Wox);
    }

    #[test]
    fn test_export_color_filters() {
        let mut palette = Palette::default();
        palette.set(9, 0);
        assert_eq!(export_color(&palette, 0), None);
        assert_eq!(export_color(&palette, 2), None);
        assert_eq!(export_color(&palette, 9), None);
        assert_eq!(export_color(&palette, 8), Some([0xFF, 0xFF, 0xFF]));
    }

    #[test]
    fn test_export_all_skips_failures() {
        let dir = tempfile::tempdir().unwrap();
        let canvas = Canvas::seeded();
        let good = dir.path().join("points.txt");
        let bad = dir.path().join("missing_dir").join("mesh.ply");
        let snapshot = dir.path().join("copy.wox.gz");

        let done = export_all(
            &canvas,
            &[
                (ExportFormat::Txt, good.as_path()),
                (ExportFormat::Ply, bad.as_path()),
                (ExportFormat::Wox, snapshot.as_path()),
            ],
        );
        assert_eq!(done, 2);
        assert!(good.exists());
        assert!(!bad.exists());
        assert!(snapshot.exists());
    }
}
