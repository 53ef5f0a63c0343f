//! Image processing — framing and resizing on decoded bitmaps.
//!
//! | Operation | Where |
//! |---|---|
//! | **Frame width** | [`FrameWidthCalculator`] (percentage or fixed-scale policy) |
//! | **Resize** | contain-fit geometry + Lanczos3 resampling |
//! | **Add frame** | square white canvas, photo inset and centered |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for geometry (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Frame width**: The frame width policies and their factory
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: [`ImageProcessor`], combining calculations + backend

pub mod backend;
mod bitmap;
mod calculations;
mod frame_width;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use bitmap::Bitmap;
pub use calculations::{FrameLayout, PixelRect, fit_within, frame_layout, inner_pixel_rect};
pub use frame_width::{
    FixedScaleFrameWidth, FrameWidthCalculator, FrameWidthStrategy, PercentageFrameWidth,
    make_frame_width_calculator,
};
pub use operations::{FrameJob, ImageProcessor, ProcessError};
pub use params::{
    ComposeParams, FRAME_COLOR, FrameSize, Quality, ResizeParams, Size, SliderRange,
};
pub use rust_backend::{RustBackend, load_bitmap, save_bitmap, supported_extensions};
