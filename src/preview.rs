//! Live frame previews.
//!
//! An editor shows a downscaled copy of the photo and re-frames it every
//! time the frame size changes. Requests can pile up faster than frames are
//! composed, and [`ImageProcessor::add_frame`] makes no promise about the
//! order they finish in. [`FramePreview`] applies the "latest request wins"
//! policy on top:
//!
//! ```text
//! request(5)  ──► job #1 ─────────────┐
//! request(12) ──► job #2 ──┐          │
//!                          ▼          ▼
//! poll()       shows #2             #1 finishes late → discarded
//! ```
//!
//! Only the preview session keeps state; the processor stays stateless.

use crate::imaging::{
    Bitmap, FrameJob, FrameSize, ImageBackend, ImageProcessor, ProcessError, RustBackend, Size,
};
use tracing::debug;

/// A framed preview and the request it answers.
#[derive(Debug, Clone)]
pub struct PreviewFrame {
    pub generation: u64,
    pub frame_size: FrameSize,
    pub image: Bitmap,
}

struct Pending {
    generation: u64,
    frame_size: FrameSize,
    job: FrameJob,
}

/// A preview session for one photo.
pub struct FramePreview<B: ImageBackend + 'static = RustBackend> {
    processor: ImageProcessor<B>,
    source: Bitmap,
    next_generation: u64,
    pending: Vec<Pending>,
    current: Option<PreviewFrame>,
}

impl<B: ImageBackend + 'static> FramePreview<B> {
    /// Downscale `photo` to fit `preview_box` once; every request frames that copy.
    pub fn new(
        processor: ImageProcessor<B>,
        photo: &Bitmap,
        preview_box: Size,
    ) -> Result<Self, ProcessError> {
        let source = processor.resize(photo, preview_box)?;
        debug!(
            width = source.width(),
            height = source.height(),
            "Preview source ready"
        );
        Ok(Self {
            processor,
            source,
            next_generation: 1,
            pending: Vec::new(),
            current: None,
        })
    }

    /// The downscaled photo requests are framed from.
    pub fn source(&self) -> &Bitmap {
        &self.source
    }

    /// Start framing the preview at `frame_size`. Returns the request's generation.
    pub fn request(&mut self, frame_size: FrameSize) -> u64 {
        let generation = self.next_generation;
        self.next_generation += 1;
        let job = self.processor.add_frame(&self.source, frame_size);
        self.pending.push(Pending {
            generation,
            frame_size,
            job,
        });
        generation
    }

    /// Number of requests that have not delivered yet.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// The newest frame accepted so far.
    pub fn current(&self) -> Option<&PreviewFrame> {
        self.current.as_ref()
    }

    /// Collect finished jobs without blocking.
    ///
    /// Returns the current frame if it changed during this call. Results older
    /// than the current frame are dropped; failures of stale requests are
    /// ignored, a failure of the newest finished request is returned.
    pub fn poll(&mut self) -> Result<Option<&PreviewFrame>, ProcessError> {
        let mut newest: Option<(u64, FrameSize, Result<Bitmap, ProcessError>)> = None;
        self.pending.retain_mut(|pending| match pending.job.try_wait() {
            Some(result) => {
                if newest.as_ref().is_none_or(|(g, _, _)| pending.generation > *g) {
                    newest = Some((pending.generation, pending.frame_size, result));
                }
                false
            }
            None => true,
        });

        let Some((generation, frame_size, result)) = newest else {
            return Ok(None);
        };
        if self.is_stale(generation) {
            debug!(generation, "Discarding stale preview");
            return Ok(None);
        }
        self.accept(generation, frame_size, result?);
        Ok(self.current.as_ref())
    }

    /// Block until the newest request delivers and make it current.
    ///
    /// Older pending requests are abandoned. Returns the current frame, which
    /// is unchanged when nothing was pending.
    pub fn wait_latest(&mut self) -> Result<Option<&PreviewFrame>, ProcessError> {
        let Some(latest) = self.pending.pop() else {
            return Ok(self.current.as_ref());
        };
        if !self.pending.is_empty() {
            debug!(abandoned = self.pending.len(), "Abandoning older previews");
        }
        self.pending.clear();

        let image = latest.job.wait()?;
        self.accept(latest.generation, latest.frame_size, image);
        Ok(self.current.as_ref())
    }

    fn is_stale(&self, generation: u64) -> bool {
        self.current
            .as_ref()
            .is_some_and(|current| current.generation >= generation)
    }

    fn accept(&mut self, generation: u64, frame_size: FrameSize, image: Bitmap) {
        // Anything requested before this frame can only be older news.
        self.pending.retain(|pending| pending.generation > generation);
        self.current = Some(PreviewFrame {
            generation,
            frame_size,
            image,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::imaging::make_frame_width_calculator;
    use crate::test_helpers::{assert_square, gradient_bitmap};

    fn mock_preview(width: u32, height: u32) -> FramePreview<MockBackend> {
        let processor =
            ImageProcessor::with_backend(MockBackend::new(), make_frame_width_calculator());
        FramePreview::new(processor, &gradient_bitmap(width, height), Size::new(100.0, 100.0))
            .unwrap()
    }

    /// Poll until at least one pending job has delivered.
    fn poll_until_changed(preview: &mut FramePreview<MockBackend>) -> u64 {
        loop {
            if let Some(frame) = preview.poll().unwrap() {
                return frame.generation;
            }
            std::thread::yield_now();
        }
    }

    #[test]
    fn new_downscales_to_preview_box() {
        let preview = mock_preview(400, 200);
        assert_eq!((preview.source().width(), preview.source().height()), (100, 50));
    }

    #[test]
    fn generations_increase() {
        let mut preview = mock_preview(40, 40);
        assert_eq!(preview.request(FrameSize::new(1)), 1);
        assert_eq!(preview.request(FrameSize::new(2)), 2);
        assert_eq!(preview.request(FrameSize::new(3)), 3);
    }

    #[test]
    fn wait_latest_keeps_newest_request() {
        let mut preview = mock_preview(400, 300);
        preview.request(FrameSize::new(5));
        preview.request(FrameSize::new(20));
        let latest = preview.request(FrameSize::new(12));

        let frame = preview.wait_latest().unwrap().unwrap();
        assert_eq!(frame.generation, latest);
        assert_eq!(frame.frame_size, FrameSize::new(12));
        assert_square(&frame.image, 100);
        assert_eq!(preview.pending(), 0);
    }

    #[test]
    fn wait_latest_without_requests_returns_current() {
        let mut preview = mock_preview(40, 40);
        assert!(preview.wait_latest().unwrap().is_none());
    }

    #[test]
    fn poll_eventually_reaches_latest() {
        let mut preview = mock_preview(300, 400);
        preview.request(FrameSize::new(3));
        let latest = preview.request(FrameSize::new(9));

        while preview.current().map(|f| f.generation) != Some(latest) {
            poll_until_changed(&mut preview);
        }
        assert_eq!(preview.pending(), 0);
        assert_eq!(preview.current().unwrap().frame_size, FrameSize::new(9));
    }

    #[test]
    fn poll_never_goes_backwards() {
        let mut preview = mock_preview(200, 200);
        for size in 0..10 {
            preview.request(FrameSize::new(size));
        }

        let mut seen = Vec::new();
        while preview.pending() > 0 {
            if let Some(frame) = preview.poll().unwrap() {
                seen.push(frame.generation);
            }
            std::thread::yield_now();
        }
        assert!(seen.windows(2).all(|w| w[0] < w[1]), "{seen:?}");
        assert_eq!(preview.current().unwrap().generation, 10);
    }

    #[test]
    fn requests_frame_the_downscaled_copy() {
        let mut preview = mock_preview(1000, 500);
        preview.request(FrameSize::new(10));
        preview.wait_latest().unwrap();

        let ops = preview.processor.backend().get_operations();
        assert!(matches!(&ops[0], RecordedOp::Resize { width: 100, height: 50, .. }));
        assert!(matches!(
            &ops[1],
            RecordedOp::Compose {
                source: (100, 50),
                canvas_side: 100,
                ..
            }
        ));
    }

    #[test]
    fn failed_preview_source_is_reported() {
        let processor =
            ImageProcessor::with_backend(MockBackend::failing(), make_frame_width_calculator());
        let result =
            FramePreview::new(processor, &gradient_bitmap(10, 10), Size::new(5.0, 5.0));
        assert!(result.is_err());
    }
}
