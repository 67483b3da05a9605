//! Presentation of rendered frames

use std::path::PathBuf;

use image::ImageEncoder;

use super::frame::Frame;
use crate::core::types::Result;
use crate::core::Error;

/// Something that can display or store a finished frame
pub trait PresentationSurface {
    fn present(&mut self, frame: &Frame) -> Result<()>;
}

/// Writes each presented frame to a PNG file
pub struct PngSurface {
    path: PathBuf,
}

impl PngSurface {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Encode a frame as PNG bytes
    pub fn encode(frame: &Frame) -> Result<Vec<u8>> {
        let expected = frame.width as usize * frame.height as usize * 4;
        if frame.pixels.len() != expected {
            return Err(Error::Render(format!(
                "frame is {}x{} but holds {} bytes",
                frame.width, frame.height, frame.pixels.len()
            )));
        }

        let mut png_data = Vec::new();
        image::codecs::png::PngEncoder::new(&mut png_data)
            .write_image(
                &frame.pixels,
                frame.width,
                frame.height,
                image::ExtendedColorType::Rgba8,
            )
            .map_err(|e| Error::Render(e.to_string()))?;
        Ok(png_data)
    }
}

impl PresentationSurface for PngSurface {
    fn present(&mut self, frame: &Frame) -> Result<()> {
        let png_data = Self::encode(frame)?;
        std::fs::write(&self.path, png_data)?;
        log::info!("Wrote {}x{} frame to {}", frame.width, frame.height, self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let frame = Frame { width: 2, height: 1, pixels: vec![255, 0, 0, 255, 0, 0, 255, 255] };
        PngSurface::new(&path).present(&frame).unwrap();

        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (2, 1));
        assert_eq!(decoded.get_pixel(1, 0).0, [0, 0, 255, 255]);
    }

    #[test]
    fn test_bad_dimensions_rejected() {
        let frame = Frame { width: 4, height: 4, pixels: vec![0; 3] };
        assert!(PngSurface::encode(&frame).is_err());
    }
}
