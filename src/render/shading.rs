//! Pixel colors for traversal results

use crate::raycast::{MissReason, TraversalResult};
use crate::voxel::palette::Palette;

/// Background and hit color for one pixel.
///
/// Misses paint a screen-space gradient whose blue channel tells the miss
/// kind apart: 0.5 for rays pointing away or running out of steps, 0 for
/// edge grazes and a faded 1.0 for rays that crossed the volume.
pub fn shade_pixel(result: &TraversalResult, palette: &Palette, screen: (f32, f32)) -> [f32; 3] {
    let (sx, sy) = screen;
    match result {
        TraversalResult::Hit(hit) => {
            let [r, g, b] = palette.rgb_f32(hit.color);
            [r * hit.shade, g * hit.shade, b * hit.shade]
        }
        TraversalResult::Miss(MissReason::Diverged | MissReason::Exhausted) => [sx, sy, 0.5],
        TraversalResult::Miss(MissReason::Edge) => [sx, sy, 0.0],
        TraversalResult::Miss(MissReason::Exited { fade }) => [sx * fade, sy * fade, *fade],
    }
}

/// Quantize a linear color to RGBA8
pub fn to_rgba8(color: [f32; 3]) -> [u8; 4] {
    let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0 + 0.5) as u8;
    [q(color[0]), q(color[1]), q(color[2]), 255]
}
