//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides what geometry to produce) and the [`backend`](super::backend)
//! (which does the actual pixel work). This separation allows swapping backends
//! (e.g. for testing with a mock) without changing operation logic.
//!
//! ## Types
//!
//! - [`Size`] — A logical (scale-independent) width/height pair.
//! - [`FrameSize`] — The user-facing border knob (0–30). Clamped on construction.
//! - [`SliderRange`] — Maps a continuous slider position onto an integer range.
//! - [`Quality`] — Lossy encoding quality (1–100, default 90). Clamped on construction.
//! - [`ResizeParams`] — Pixel target for a contain-fit resize.
//! - [`ComposeParams`] — Full pixel layout of a framed canvas.

use image::Rgba;
use std::fmt;

/// Solid fill used for the frame around the photo.
pub const FRAME_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// A width/height pair in logical units (pixels divided by the bitmap scale).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The longest side, `max(width, height)`.
    pub fn max_side(self) -> f64 {
        self.width.max(self.height)
    }

    pub fn aspect_ratio(self) -> f64 {
        self.width / self.height
    }

    /// Both dimensions are finite and strictly positive.
    pub fn is_positive(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// How thick the frame should be, on an abstract 0–30 scale.
///
/// This is not a pixel value; a
/// [`FrameWidthCalculator`](super::frame_width::FrameWidthCalculator)
/// translates it into one relative to the image's longest side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FrameSize(u32);

impl FrameSize {
    pub const MIN: u32 = 0;
    pub const MAX: u32 = 30;

    pub fn new(value: u32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    /// Frame size for a slider position in `0.0..=1.0` over the full range.
    pub fn from_slider(position: f32) -> Self {
        Self::new(SliderRange::default().normalize(position))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for FrameSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Integer range a continuous slider position is mapped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliderRange {
    min: u32,
    max: u32,
}

impl SliderRange {
    pub fn new(min: u32, max: u32) -> Self {
        Self {
            min,
            max: max.max(min),
        }
    }

    pub fn min(self) -> u32 {
        self.min
    }

    pub fn max(self) -> u32 {
        self.max
    }

    /// Map a slider position to an integer in `min..=max`.
    ///
    /// Positions at or below zero (and NaN) give `min`; positions above one
    /// are treated as one. The scaled offset is truncated, not rounded.
    pub fn normalize(self, position: f32) -> u32 {
        if !(position > 0.0) {
            return self.min;
        }
        let span = self.max.saturating_sub(self.min) as f32;
        self.min + (span.round() * position.min(1.0)) as u32
    }
}

impl Default for SliderRange {
    fn default() -> Self {
        Self {
            min: FrameSize::MIN,
            max: FrameSize::MAX,
        }
    }
}

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Parameters for a resize: exact pixel dimensions and the scale to tag the result with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeParams {
    pub width: u32,
    pub height: u32,
    pub scale: f64,
}

/// Parameters for compositing a photo onto a square frame canvas.
///
/// All positions are in output pixels. The inner rectangle always lies
/// entirely inside the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComposeParams {
    /// Side of the square canvas.
    pub canvas_side: u32,
    pub inner_width: u32,
    pub inner_height: u32,
    /// Left edge of the inner image.
    pub x: u32,
    /// Top edge of the inner image.
    pub y: u32,
    pub background: Rgba<u8>,
    pub scale: f64,
    /// Border thickness in logical units, as computed by the calculator.
    pub frame_width: f64,
}
