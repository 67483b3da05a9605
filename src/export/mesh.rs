//! ASCII PLY mesh export
//!
//! Each exposed cell face becomes two triangles with their own six
//! vertices. Vertices are not shared between faces.

use std::io::{self, Write};

use super::{for_each_exportable, EXPORT_CENTER, EXPORT_TITLE};
use crate::core::types::IVec3;
use crate::voxel::palette::Palette;
use crate::voxel::volume::VoxelVolume;

/// Vertices written per exposed face
pub const VERTICES_PER_FACE: usize = 6;

/// Half the cell size
const S: f32 = 0.5;

/// A cell face, in export order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Face {
    NegX,
    PosX,
    NegY,
    PosY,
    NegZ,
    PosZ,
}

impl Face {
    pub const ALL: [Face; 6] = [Face::NegX, Face::PosX, Face::NegY, Face::PosY, Face::NegZ, Face::PosZ];

    /// Outward unit normal
    pub fn normal(self) -> IVec3 {
        match self {
            Face::NegX => IVec3::NEG_X,
            Face::PosX => IVec3::X,
            Face::NegY => IVec3::NEG_Y,
            Face::PosY => IVec3::Y,
            Face::NegZ => IVec3::NEG_Z,
            Face::PosZ => IVec3::Z,
        }
    }

    /// Corner offsets of the face's two triangles
    pub fn corners(self) -> [[f32; 3]; 6] {
        match self {
            Face::NegX => [[-S, -S, S], [-S, S, -S], [-S, -S, -S], [-S, -S, S], [-S, S, S], [-S, S, -S]],
            Face::PosX => [[S, S, S], [S, -S, -S], [S, S, -S], [S, S, S], [S, -S, S], [S, -S, -S]],
            Face::NegY => [[S, -S, S], [-S, -S, -S], [S, -S, -S], [S, -S, S], [-S, -S, S], [-S, -S, -S]],
            Face::PosY => [[-S, S, S], [S, S, -S], [-S, S, -S], [-S, S, S], [S, S, S], [S, S, -S]],
            Face::NegZ => [[S, S, -S], [-S, -S, -S], [-S, S, -S], [S, S, -S], [S, -S, -S], [-S, -S, -S]],
            Face::PosZ => [[-S, S, S], [S, -S, S], [S, S, S], [-S, S, S], [-S, -S, S], [S, -S, S]],
        }
    }
}

/// Whether the neighbor across `face` is empty or outside the grid
fn is_exposed(volume: &VoxelVolume, cell: IVec3, face: Face) -> bool {
    volume.get_checked(cell + face.normal()).is_none_or(|c| c == 0)
}

fn exposed_faces(volume: &VoxelVolume, cell: IVec3) -> impl Iterator<Item = Face> + '_ {
    Face::ALL.into_iter().filter(move |&face| is_exposed(volume, cell, face))
}

/// Count exposed faces across all exportable cells
pub fn count_exposed_faces(volume: &VoxelVolume, palette: &Palette) -> usize {
    let mut count = 0;
    for_each_exportable(volume, palette, |x, y, z, _| {
        let cell = IVec3::new(x as i32, y as i32, z as i32);
        count += exposed_faces(volume, cell).count();
    });
    count
}

/// Write the mesh.
///
/// A first pass counts faces so the header carries exact element counts;
/// the second pass writes the vertices.
pub fn write_ply<W: Write>(writer: &mut W, volume: &VoxelVolume, palette: &Palette) -> io::Result<()> {
    let vertex_count = count_exposed_faces(volume, palette) * VERTICES_PER_FACE;
    let triangle_count = vertex_count / 3;

    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "comment Created by {} - woxels.github.io", EXPORT_TITLE)?;
    writeln!(writer, "element vertex {}", vertex_count)?;
    for property in ["x", "y", "z", "nx", "ny", "nz"] {
        writeln!(writer, "property float {}", property)?;
    }
    for property in ["red", "green", "blue"] {
        writeln!(writer, "property uchar {}", property)?;
    }
    writeln!(writer, "element face {}", triangle_count)?;
    writeln!(writer, "property list uchar uint vertex_indices")?;
    writeln!(writer, "end_header")?;

    let mut result = Ok(());
    for_each_exportable(volume, palette, |x, y, z, [r, g, b]| {
        if result.is_err() {
            return;
        }
        let cell = IVec3::new(x as i32, y as i32, z as i32);
        let cx = (cell.x - EXPORT_CENTER) as f32;
        let cy = (cell.y - EXPORT_CENTER) as f32;
        let cz = cell.z as f32;
        for face in exposed_faces(volume, cell) {
            let n = face.normal();
            for [dx, dy, dz] in face.corners() {
                result = writeln!(
                    writer,
                    "{} {} {} {} {} {} {} {} {}",
                    cx + dx, cy + dy, cz + dz, n.x, n.y, n.z, r, g, b
                );
                if result.is_err() {
                    return;
                }
            }
        }
    });
    result?;

    for i in 0..triangle_count {
        let base = i * 3;
        writeln!(writer, "3 {} {} {}", base, base + 1, base + 2)?;
    }
    Ok(())
}
