//! Offline frame rendering

use rayon::prelude::*;

use super::shading::{shade_pixel, to_rgba8};
use crate::core::camera::View;
use crate::core::types::Vec3;
use crate::math::Ray;
use crate::raycast::{BoundaryDda, Traversal};
use crate::voxel::palette::Palette;
use crate::voxel::volume::VoxelVolume;

/// Bytes per RGBA8 pixel
const BYTES_PER_PIXEL: usize = 4;

/// An RGBA8 image, rows top to bottom
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Frame {
    /// Pixel at (x, y)
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2], self.pixels[i + 3]]
    }
}

/// Camera inputs for one frame
#[derive(Clone, Copy, Debug)]
pub struct FrameCamera {
    pub eye: Vec3,
    pub view: View,
}

/// Render a frame by tracing one [`BoundaryDda`] ray per pixel.
///
/// Rows are traced in parallel; the volume is only borrowed immutably.
pub fn render_frame(
    volume: &VoxelVolume,
    palette: &Palette,
    camera: FrameCamera,
    width: u32,
    height: u32,
) -> Frame {
    let width = width.max(1);
    let height = height.max(1);
    let scale = View::screen_scale(width, height);
    let dda = BoundaryDda::default();
    let row_bytes = width as usize * BYTES_PER_PIXEL;

    let mut pixels = vec![0u8; row_bytes * height as usize];
    pixels
        .par_chunks_mut(row_bytes)
        .enumerate()
        .for_each(|(y, row)| {
            let py = 1.0 - 2.0 * (y as f32 + 0.5) / height as f32;
            for x in 0..width as usize {
                let px = 2.0 * (x as f32 + 0.5) / width as f32 - 1.0;
                let ray = Ray::new(camera.eye, camera.view.ray_direction(px, py, scale));
                let result = dda.trace(volume, &ray);
                let screen = (px * 0.5 + 0.5, -py * 0.5 + 0.5);
                let rgba = to_rgba8(shade_pixel(&result, palette, screen));
                row[x * BYTES_PER_PIXEL..(x + 1) * BYTES_PER_PIXEL].copy_from_slice(&rgba);
            }
        });

    Frame { width, height, pixels }
}
