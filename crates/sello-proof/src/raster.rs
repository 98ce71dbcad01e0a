//! A minimal raster image carried between collaborators.

use std::fmt;

/// An RGBA8 raster image.
///
/// The pixel buffer is row-major, 4 bytes per pixel. This is the interchange
/// type between the symbol codec, the page rasterizer, and the document
/// surface; no pixel-level symbol logic lives in this crate.
#[derive(Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RasterImage {
    /// Create an image from dimensions and an RGBA8 buffer.
    ///
    /// Returns `None` if the buffer length does not match `width * height * 4`.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        if pixels.len() != (width as usize) * (height as usize) * 4 {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    /// A fully transparent image.
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width as usize) * (height as usize) * 4],
        }
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The RGBA8 pixel buffer.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

impl fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RasterImage({}x{})", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_length_checked() {
        assert!(RasterImage::new(2, 2, vec![0; 16]).is_some());
        assert!(RasterImage::new(2, 2, vec![0; 15]).is_none());
    }

    #[test]
    fn test_blank_dimensions() {
        let img = RasterImage::blank(3, 5);
        assert_eq!(img.width(), 3);
        assert_eq!(img.height(), 5);
        assert_eq!(img.pixels().len(), 60);
    }
}
