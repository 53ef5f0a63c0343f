//! Pure Rust image processing backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::ImageReader` |
//! | Resize | `image::imageops::resize` with `Lanczos3` filter |
//! | Frame canvas | `image::RgbaImage::from_pixel` + `image::imageops::overlay` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` with configured quality |
//! | Encode → PNG, TIFF, WebP | `image::DynamicImage::save_with_format` |
//!
//! Decoding and encoding are adapters for the command line; the framing core
//! only ever sees decoded [`Bitmap`]s.

use super::backend::{BackendError, ImageBackend};
use super::bitmap::Bitmap;
use super::params::{ComposeParams, Quality, ResizeParams};
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, ImageReader, RgbaImage};
use std::path::Path;
use tracing::debug;

/// Largest surface the backend will allocate, in pixels (16384 x 16384).
pub const DEFAULT_MAX_PIXELS: u64 = 1 << 28;

const FORMATS: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
];

/// Returns the image file extensions that can be read and written.
pub fn supported_extensions() -> Vec<&'static str> {
    FORMATS.iter().map(|(ext, _)| *ext).collect()
}

fn format_for(path: &Path) -> Option<ImageFormat> {
    let ext = path.extension().and_then(|e| e.to_str())?;
    FORMATS
        .iter()
        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(ext))
        .map(|(_, format)| *format)
}

/// Pure Rust backend using the `image` crate.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend {
    max_pixels: u64,
}

impl RustBackend {
    pub fn new() -> Self {
        Self {
            max_pixels: DEFAULT_MAX_PIXELS,
        }
    }

    /// Limit the size of surfaces this backend is willing to allocate.
    pub fn with_max_pixels(max_pixels: u64) -> Self {
        Self { max_pixels }
    }

    /// Refuse empty surfaces and surfaces beyond the pixel budget.
    fn check_surface(&self, width: u32, height: u32) -> Result<(), BackendError> {
        let pixels = u64::from(width) * u64::from(height);
        if pixels == 0 || pixels > self.max_pixels {
            return Err(BackendError::SurfaceAllocation { width, height });
        }
        Ok(())
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBackend for RustBackend {
    fn resize(&self, image: &Bitmap, params: &ResizeParams) -> Result<Bitmap, BackendError> {
        self.check_surface(params.width, params.height)?;
        debug!(
            from_w = image.width(),
            from_h = image.height(),
            to_w = params.width,
            to_h = params.height,
            "Resampling with Lanczos3"
        );
        let resized = imageops::resize(
            image.pixels(),
            params.width,
            params.height,
            FilterType::Lanczos3,
        );
        Ok(Bitmap::new(resized, params.scale))
    }

    fn compose(&self, image: &Bitmap, params: &ComposeParams) -> Result<Bitmap, BackendError> {
        self.check_surface(params.canvas_side, params.canvas_side)?;
        self.check_surface(params.inner_width, params.inner_height)?;

        let mut canvas =
            RgbaImage::from_pixel(params.canvas_side, params.canvas_side, params.background);

        let same_size =
            image.width() == params.inner_width && image.height() == params.inner_height;
        if same_size {
            imageops::overlay(
                &mut canvas,
                image.pixels(),
                i64::from(params.x),
                i64::from(params.y),
            );
        } else {
            let inner = imageops::resize(
                image.pixels(),
                params.inner_width,
                params.inner_height,
                FilterType::Lanczos3,
            );
            imageops::overlay(&mut canvas, &inner, i64::from(params.x), i64::from(params.y));
        }

        Ok(Bitmap::new(canvas, params.scale))
    }
}

/// Load and decode an image from disk.
pub fn load_bitmap(path: &Path, scale: f64) -> Result<Bitmap, BackendError> {
    let decoded = ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })?;
    Ok(Bitmap::from_dynamic(decoded, scale))
}

/// Encode a bitmap to disk, inferring the format from the extension.
///
/// JPEG has no alpha channel, so it is written as RGB.
pub fn save_bitmap(bitmap: &Bitmap, path: &Path, quality: Quality) -> Result<(), BackendError> {
    let format = format_for(path).ok_or_else(|| {
        BackendError::ProcessingFailed(format!(
            "Unsupported output format: {}",
            path.extension()
                .and_then(|e| e.to_str())
                .unwrap_or_default()
        ))
    })?;

    match format {
        ImageFormat::Jpeg => save_jpeg(bitmap, path, quality),
        other => bitmap
            .to_dynamic()
            .save_with_format(path, other)
            .map_err(|e| BackendError::ProcessingFailed(format!("Encode failed: {}", e))),
    }
}

fn save_jpeg(bitmap: &Bitmap, path: &Path, quality: Quality) -> Result<(), BackendError> {
    let file = std::fs::File::create(path).map_err(BackendError::Io)?;
    let writer = std::io::BufWriter::new(file);
    let encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(writer, quality.value() as u8);
    let rgb = DynamicImage::ImageRgb8(bitmap.to_dynamic().into_rgb8());
    rgb.write_with_encoder(encoder)
        .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {}", e)))
}
