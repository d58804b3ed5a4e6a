//! Decoded raster images returned by the render backend.

use std::fmt;

/// An 8-bit RGBA raster.
#[derive(Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RasterImage {
    /// Wrap RGBA pixel data, or `None` if the buffer length does not match.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        if width == 0 || height == 0 || pixels.len() != expected {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major RGBA bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

impl fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

/// A rendered view of the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFrame {
    pub image: RasterImage,
    /// Color-scale legend, present for false-color renders
    pub colorbar: Option<RasterImage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgba_checks_length() {
        assert!(RasterImage::from_rgba(2, 2, vec![0; 16]).is_some());
        assert!(RasterImage::from_rgba(2, 2, vec![0; 12]).is_none());
        assert!(RasterImage::from_rgba(0, 2, Vec::new()).is_none());
    }

    #[test]
    fn test_debug_omits_pixels() {
        let image = RasterImage::from_rgba(1, 1, vec![1, 2, 3, 4]).unwrap();
        assert_eq!(
            format!("{image:?}"),
            "RasterImage { width: 1, height: 1, bytes: 4 }"
        );
    }
}
