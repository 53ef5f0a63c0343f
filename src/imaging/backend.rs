//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two pixel operations every backend
//! must support: resize and compose. Geometry is decided beforehand by
//! [`operations`](super::operations); a backend only renders what it is told.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend) — pure Rust, built on
//! the `image` crate.

use super::bitmap::Bitmap;
use super::params::{ComposeParams, ResizeParams};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cannot allocate a {width}x{height} rendering surface")]
    SurfaceAllocation { width: u32, height: u32 },
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Trait for image processing backends.
///
/// Implementations must be shareable across threads: frames are composed on
/// background workers.
pub trait ImageBackend: Send + Sync {
    /// Render `image` into a new bitmap of exactly `params.width` x `params.height`.
    fn resize(&self, image: &Bitmap, params: &ResizeParams) -> Result<Bitmap, BackendError>;

    /// Fill a square canvas with the background and draw `image` into the inner rectangle.
    fn compose(&self, image: &Bitmap, params: &ComposeParams) -> Result<Bitmap, BackendError>;
}
