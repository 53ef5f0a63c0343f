//! Pure calculation functions for frame and resize geometry.
//!
//! All functions here are pure and testable without any I/O or images.
//! Inputs and outputs are in logical units unless a name says otherwise.

use super::params::Size;

/// Scale `source` to fit entirely within `target`, preserving aspect ratio.
///
/// The smaller of the two axis ratios is applied to both axes and each axis
/// is rounded independently. Sources smaller than the target are scaled up.
///
/// # Examples
/// ```
/// # use image_framer::imaging::{Size, fit_within};
/// // 400x300 into a 100x100 box → width-bound, 100x75
/// assert_eq!(fit_within(Size::new(400.0, 300.0), Size::new(100.0, 100.0)), Size::new(100.0, 75.0));
/// ```
pub fn fit_within(source: Size, target: Size) -> Size {
    let width_ratio = target.width / source.width;
    let height_ratio = target.height / source.height;
    let ratio = width_ratio.min(height_ratio);

    Size::new(
        (source.width * ratio).round(),
        (source.height * ratio).round(),
    )
}

/// Placement of a photo inside its square frame canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameLayout {
    /// Border thickness along the longest side.
    pub frame_width: f64,
    /// Side of the square canvas, equal to the source's longest side.
    pub canvas_side: f64,
    /// Size of the photo once inset.
    pub inner: Size,
    pub offset_x: f64,
    pub offset_y: f64,
}

/// Compute where a photo of `source` size lands inside its frame.
///
/// Landscape and square sources lose `2 * frame_width` from their width;
/// portrait sources lose it from their height. The other axis follows the
/// source aspect ratio and the result is centered on a square canvas.
///
/// Returns `None` when the frame width is negative, not finite, or leaves
/// no positive inner area.
pub fn frame_layout(source: Size, frame_width: f64) -> Option<FrameLayout> {
    if !source.is_positive() || !frame_width.is_finite() || frame_width < 0.0 {
        return None;
    }

    let ratio = source.aspect_ratio();
    let inner = if ratio >= 1.0 {
        let width = source.width - 2.0 * frame_width;
        Size::new(width, width / ratio)
    } else {
        let height = source.height - 2.0 * frame_width;
        Size::new(height * ratio, height)
    };

    if !inner.is_positive() {
        return None;
    }

    let canvas_side = source.max_side();
    Some(FrameLayout {
        frame_width,
        canvas_side,
        inner,
        offset_x: (canvas_side - inner.width) / 2.0,
        offset_y: (canvas_side - inner.height) / 2.0,
    })
}

/// Convert a logical length to whole pixels at `scale`.
pub fn to_pixels(logical: f64, scale: f64) -> u32 {
    (logical * scale).round().max(0.0) as u32
}

/// Pixel placement of the inner photo on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub canvas_side: u32,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Convert a layout to output pixels at `scale`.
///
/// Returns `None` when either inner dimension rounds to zero pixels. The
/// inner rectangle is clamped to the canvas and centered with integer offsets.
pub fn inner_pixel_rect(layout: &FrameLayout, scale: f64) -> Option<PixelRect> {
    let canvas_side = to_pixels(layout.canvas_side, scale);
    let width = to_pixels(layout.inner.width, scale).min(canvas_side);
    let height = to_pixels(layout.inner.height, scale).min(canvas_side);
    if width == 0 || height == 0 {
        return None;
    }
    Some(PixelRect {
        canvas_side,
        x: (canvas_side - width) / 2,
        y: (canvas_side - height) / 2,
        width,
        height,
    })
}
