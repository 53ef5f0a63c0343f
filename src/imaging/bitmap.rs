//! Decoded raster bitmaps.

use super::params::Size;
use image::{DynamicImage, RgbaImage};
use std::sync::Arc;

/// An immutable decoded RGBA8 bitmap with a pixel scale factor.
///
/// The scale is the number of pixels per logical unit; the logical size is
/// the pixel size divided by it. Cloning shares the pixel buffer, so a
/// bitmap can be handed to a background worker without copying.
#[derive(Debug, Clone)]
pub struct Bitmap {
    pixels: Arc<RgbaImage>,
    scale: f64,
}

impl Bitmap {
    /// Wrap a pixel buffer. Non-positive or non-finite scales fall back to 1.
    pub fn new(pixels: RgbaImage, scale: f64) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
        Self {
            pixels: Arc::new(pixels),
            scale,
        }
    }

    pub fn from_dynamic(image: DynamicImage, scale: f64) -> Self {
        Self::new(image.into_rgba8(), scale)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Size in logical units.
    pub fn size(&self) -> Size {
        Size::new(
            f64::from(self.width()) / self.scale,
            f64::from(self.height()) / self.scale,
        )
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Copy out as a `DynamicImage` for encoding.
    pub fn to_dynamic(&self) -> DynamicImage {
        DynamicImage::ImageRgba8(self.pixels.as_ref().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logical_size_divides_by_scale() {
        let bitmap = Bitmap::new(RgbaImage::new(300, 150), 3.0);
        assert_eq!(bitmap.width(), 300);
        assert_eq!(bitmap.height(), 150);
        assert_eq!(bitmap.size(), Size::new(100.0, 50.0));
    }

    #[test]
    fn invalid_scale_falls_back_to_one() {
        assert_eq!(Bitmap::new(RgbaImage::new(4, 4), 0.0).scale(), 1.0);
        assert_eq!(Bitmap::new(RgbaImage::new(4, 4), -2.0).scale(), 1.0);
        assert_eq!(Bitmap::new(RgbaImage::new(4, 4), f64::NAN).scale(), 1.0);
    }

    #[test]
    fn clone_shares_pixels() {
        let bitmap = Bitmap::new(RgbaImage::new(8, 8), 1.0);
        let copy = bitmap.clone();
        assert!(std::ptr::eq(bitmap.pixels(), copy.pixels()));
    }
}
