//! High-level image operations.
//!
//! [`ImageProcessor`] combines the pure calculations with a backend. It
//! decides geometry (contain-fit sizes, frame layout), hands pixel work to
//! the [`ImageBackend`], and offers two entry points for framing:
//!
//! - [`ImageProcessor::compose_frame`] runs on the calling thread.
//! - [`ImageProcessor::add_frame`] runs on the rayon pool and returns a
//!   [`FrameJob`] that delivers the result exactly once.
//!
//! The processor holds no mutable state. Overlapping `add_frame` calls run
//! concurrently and may finish in any order; callers that only care about
//! the newest request discard stale results themselves (see
//! [`FramePreview`](crate::preview::FramePreview)).

use super::backend::{BackendError, ImageBackend};
use super::bitmap::Bitmap;
use super::calculations::{fit_within, frame_layout, inner_pixel_rect, to_pixels};
use super::frame_width::{FrameWidthCalculator, make_frame_width_calculator};
use super::params::{ComposeParams, FRAME_COLOR, FrameSize, ResizeParams, Size};
use super::rust_backend::RustBackend;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Rendering failed: {0}")]
    Backend(#[from] BackendError),
    #[error("Frame width {frame_width} leaves no room for an image with longest side {max_side}")]
    DegenerateFrame { frame_width: f64, max_side: f64 },
    #[error("Invalid target size {width}x{height}")]
    InvalidTarget { width: f64, height: f64 },
    #[error("Source image is empty ({width}x{height} pixels)")]
    EmptySource { width: u32, height: u32 },
    #[error("Background worker exited without delivering a result")]
    WorkerLost,
    #[error("Frame result was already taken")]
    AlreadyDelivered,
}

/// Reject bitmaps with no pixels along either axis.
fn check_source(image: &Bitmap) -> Result<()> {
    if image.width() == 0 || image.height() == 0 {
        return Err(ProcessError::EmptySource {
            width: image.width(),
            height: image.height(),
        });
    }
    Ok(())
}

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, ProcessError>;

/// Resizes and frames bitmaps.
///
/// Cheap to clone: the backend and calculator are shared.
pub struct ImageProcessor<B: ImageBackend + 'static = RustBackend> {
    backend: Arc<B>,
    calculator: Arc<dyn FrameWidthCalculator>,
    output_scale: Option<f64>,
}

impl<B: ImageBackend + 'static> Clone for ImageProcessor<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            calculator: Arc::clone(&self.calculator),
            output_scale: self.output_scale,
        }
    }
}

impl ImageProcessor<RustBackend> {
    /// Processor on the pure Rust backend with the default frame width policy.
    pub fn new() -> Self {
        Self::with_backend(RustBackend::new(), make_frame_width_calculator())
    }
}

impl Default for ImageProcessor<RustBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: ImageBackend + 'static> ImageProcessor<B> {
    pub fn with_backend(backend: B, calculator: impl FrameWidthCalculator + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
            calculator: Arc::new(calculator),
            output_scale: None,
        }
    }

    /// Swap the frame width policy.
    pub fn with_calculator(mut self, calculator: impl FrameWidthCalculator + 'static) -> Self {
        self.calculator = Arc::new(calculator);
        self
    }

    /// Render resized bitmaps at `scale` pixels per logical unit instead of the source's scale.
    pub fn with_output_scale(mut self, scale: f64) -> Self {
        self.output_scale = (scale.is_finite() && scale > 0.0).then_some(scale);
        self
    }

    pub fn calculator(&self) -> &dyn FrameWidthCalculator {
        self.calculator.as_ref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Plan a contain-fit resize without executing it.
    pub fn plan_resize(&self, image: &Bitmap, target: Size) -> Result<ResizeParams> {
        check_source(image)?;
        let invalid_target = || ProcessError::InvalidTarget {
            width: target.width,
            height: target.height,
        };
        if !target.is_positive() {
            return Err(invalid_target());
        }
        let fitted = fit_within(image.size(), target);
        let scale = self.output_scale.unwrap_or(image.scale());

        let width = to_pixels(fitted.width, scale);
        let height = to_pixels(fitted.height, scale);
        if width == 0 || height == 0 {
            return Err(invalid_target());
        }
        Ok(ResizeParams {
            width,
            height,
            scale,
        })
    }

    /// Scale `image` to fit entirely within `target` (logical units), preserving aspect ratio.
    ///
    /// Images smaller than the target are scaled up. Empty sources fail with
    /// [`ProcessError::EmptySource`]; targets so small that either side of the
    /// fitted image rounds to zero pixels fail with [`ProcessError::InvalidTarget`].
    pub fn resize(&self, image: &Bitmap, target: Size) -> Result<Bitmap> {
        let params = self.plan_resize(image, target)?;
        debug!(
            width = params.width,
            height = params.height,
            scale = params.scale,
            "Resizing to fit"
        );
        Ok(self.backend.resize(image, &params)?)
    }

    /// Border width for `frame_size` on `image`, in logical units.
    pub fn frame_width(&self, image: &Bitmap, frame_size: FrameSize) -> f64 {
        self.calculator
            .frame_width(frame_size.value(), image.size().max_side())
    }

    /// Plan a frame composition without executing it.
    pub fn plan_frame(&self, image: &Bitmap, frame_size: FrameSize) -> Result<ComposeParams> {
        check_source(image)?;
        let size = image.size();
        let frame_width = self.frame_width(image, frame_size);
        let degenerate = || ProcessError::DegenerateFrame {
            frame_width,
            max_side: size.max_side(),
        };

        let layout = frame_layout(size, frame_width).ok_or_else(degenerate)?;
        let rect = inner_pixel_rect(&layout, image.scale()).ok_or_else(degenerate)?;

        Ok(ComposeParams {
            canvas_side: rect.canvas_side,
            inner_width: rect.width,
            inner_height: rect.height,
            x: rect.x,
            y: rect.y,
            background: FRAME_COLOR,
            scale: image.scale(),
            frame_width,
        })
    }

    /// Frame `image` on the calling thread.
    ///
    /// The result is a square canvas with side equal to the image's longest
    /// side, filled white, with the photo inset and centered.
    pub fn compose_frame(&self, image: &Bitmap, frame_size: FrameSize) -> Result<Bitmap> {
        let params = self.plan_frame(image, frame_size)?;
        debug!(
            strategy = self.calculator.name(),
            frame_size = frame_size.value(),
            frame_width = params.frame_width,
            canvas = params.canvas_side,
            inner_w = params.inner_width,
            inner_h = params.inner_height,
            "Composing frame"
        );
        Ok(self.backend.compose(image, &params)?)
    }

    /// Frame `image` on the rayon pool.
    ///
    /// Returns immediately; the [`FrameJob`] yields the framed bitmap, or the
    /// error that prevented it, exactly once.
    pub fn add_frame(&self, image: &Bitmap, frame_size: FrameSize) -> FrameJob {
        let (tx, rx) = mpsc::sync_channel(1);
        let processor = self.clone();
        let image = image.clone();

        rayon::spawn(move || {
            let result = processor.compose_frame(&image, frame_size);
            // The caller may have dropped the job; nothing left to deliver to.
            let _ = tx.send(result);
        });

        FrameJob {
            receiver: rx,
            delivered: false,
        }
    }
}

/// Handle to a frame being composed in the background.
pub struct FrameJob {
    receiver: Receiver<Result<Bitmap>>,
    delivered: bool,
}

impl FrameJob {
    /// Block until the frame is ready.
    ///
    /// Fails with [`ProcessError::AlreadyDelivered`] once [`try_wait`](Self::try_wait)
    /// has handed out the result.
    pub fn wait(self) -> Result<Bitmap> {
        if self.delivered {
            return Err(ProcessError::AlreadyDelivered);
        }
        self.receiver
            .recv()
            .unwrap_or(Err(ProcessError::WorkerLost))
    }

    /// Take the result if it is ready, without blocking.
    ///
    /// Returns `Some` exactly once; `None` both while the work is pending and
    /// after the result has been taken (see [`is_delivered`](Self::is_delivered)).
    pub fn try_wait(&mut self) -> Option<Result<Bitmap>> {
        if self.delivered {
            return None;
        }
        let result = match self.receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(ProcessError::WorkerLost),
        };
        self.delivered = true;
        Some(result)
    }

    pub fn is_delivered(&self) -> bool {
        self.delivered
    }
}
