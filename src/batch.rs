//! Framing photos straight from disk.
//!
//! Each input is decoded, framed and encoded inside a single rayon task, so
//! at most one photo per worker is in memory at a time. Progress is reported
//! as [`FrameEvent`]s over an optional channel, in completion order; the
//! `index` on each event says which input it belongs to.
//!
//! ```text
//! inputs ──par_iter──► decode ──► compose_frame ──► encode ──► FrameEvent ──► printer
//! ```

use crate::imaging::{
    BackendError, FrameSize, ImageBackend, ImageProcessor, ProcessError, Quality, load_bitmap,
    save_bitmap,
};
use crate::output::{FrameReport, output_path_for};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::{debug, warn};

/// Why one input of a batch could not be framed.
#[derive(Error, Debug)]
pub enum FrameFailure {
    #[error("Decode failed: {0}")]
    Decode(#[source] BackendError),
    #[error("Framing failed: {0}")]
    Frame(#[from] ProcessError),
    #[error("Encode failed: {0}")]
    Encode(#[source] BackendError),
}

/// Settings shared by every input of a batch.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub output_dir: PathBuf,
    pub frame_size: FrameSize,
    /// Pixels per logical unit of the decoded inputs.
    pub scale: f64,
    pub quality: Quality,
}

/// Outcome of one input. `index` is 1-based, in input order.
#[derive(Debug)]
pub enum FrameEvent {
    Framed {
        index: usize,
        report: FrameReport,
    },
    Failed {
        index: usize,
        source: PathBuf,
        error: FrameFailure,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub framed: usize,
    pub failed: usize,
}

/// Decode, frame and encode a single photo into `options.output_dir`.
pub fn frame_file<B: ImageBackend + 'static>(
    processor: &ImageProcessor<B>,
    input: &Path,
    options: &BatchOptions,
) -> Result<FrameReport, FrameFailure> {
    let photo = load_bitmap(input, options.scale).map_err(FrameFailure::Decode)?;
    let plan = processor.plan_frame(&photo, options.frame_size)?;
    let framed = processor.compose_frame(&photo, options.frame_size)?;

    let output = output_path_for(input, &options.output_dir, "framed");
    save_bitmap(&framed, &output, options.quality).map_err(FrameFailure::Encode)?;
    debug!(output = %output.display(), "Framed photo written");

    Ok(FrameReport {
        source: input.to_path_buf(),
        output,
        source_width: photo.width(),
        source_height: photo.height(),
        scale: photo.scale(),
        frame_size: options.frame_size,
        strategy: processor.calculator().name(),
        plan,
    })
}

/// Frame every input on the rayon pool, sending one event per input to `progress`.
///
/// Failures are reported per input and never stop the rest of the batch.
pub fn frame_batch<B: ImageBackend + 'static>(
    processor: &ImageProcessor<B>,
    inputs: &[PathBuf],
    options: &BatchOptions,
    progress: Option<Sender<FrameEvent>>,
) -> BatchSummary {
    let framed = inputs
        .par_iter()
        .enumerate()
        .map(|(i, input)| {
            let index = i + 1;
            let event = match frame_file(processor, input, options) {
                Ok(report) => FrameEvent::Framed { index, report },
                Err(error) => {
                    warn!(input = %input.display(), "{error}");
                    FrameEvent::Failed {
                        index,
                        source: input.clone(),
                        error,
                    }
                }
            };
            let ok = matches!(event, FrameEvent::Framed { .. });
            if let Some(tx) = &progress {
                // A gone receiver only means nobody is listening.
                let _ = tx.send(event);
            }
            ok
        })
        .filter(|ok| *ok)
        .count();

    BatchSummary {
        framed,
        failed: inputs.len() - framed,
    }
}
