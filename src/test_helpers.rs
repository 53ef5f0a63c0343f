//! Shared test utilities for the image-framer test suite.
//!
//! Provides synthetic bitmaps and assertions about framed output so unit
//! tests across modules don't each hand-roll pixel buffers.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let framed = processor.compose_frame(&gradient_bitmap(120, 80), FrameSize::new(10))?;
//! assert_square(&framed, 120);
//! ```

use crate::imaging::Bitmap;
use image::{Rgba, RgbaImage};

// =========================================================================
// Synthetic bitmaps
// =========================================================================

/// A bitmap of a single color at scale 1.
pub fn solid_bitmap(width: u32, height: u32, color: Rgba<u8>) -> Bitmap {
    Bitmap::new(RgbaImage::from_pixel(width, height, color), 1.0)
}

/// A bitmap with a red/green gradient at scale 1, so resampling has something to chew on.
pub fn gradient_bitmap(width: u32, height: u32) -> Bitmap {
    let pixels = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
    });
    Bitmap::new(pixels, 1.0)
}

// =========================================================================
// Assertions
// =========================================================================

/// Assert a bitmap is a square of the given pixel side.
pub fn assert_square(bitmap: &Bitmap, side: u32) {
    assert_eq!(
        (bitmap.width(), bitmap.height()),
        (side, side),
        "expected a {side}x{side} canvas"
    );
}
