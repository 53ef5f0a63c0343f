//! # Image Framer
//!
//! Puts photos in square white frames. Given a decoded bitmap and a frame
//! size (0–30), it produces a new square bitmap whose side is the photo's
//! longest side, with the photo scaled down to leave a border and centered.
//!
//! # Pipeline
//!
//! ```text
//! decoded photo ──► resize (preview) ──► add_frame ──► framed bitmap
//!                                           │
//!                                           └─ FrameWidthCalculator: size → border width
//! ```
//!
//! Decoding and encoding happen outside the core: the library works on
//! [`imaging::Bitmap`]s and only the command line touches files.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Frame width policies, geometry, the `image`-crate backend, [`imaging::ImageProcessor`] |
//! | [`batch`] | Framing photos from disk on the rayon pool, one event per input |
//! | [`preview`] | Preview sessions where the newest frame request wins |
//! | [`config`] | `framer.toml` loading, merging, and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Two Frame Width Policies
//!
//! The frame size is not a pixel count. The default fixed-scale policy maps
//! each step to 0.53% of the longest side, so the largest size covers about
//! 16% of it; the percentage policy reads the size as a plain percentage.
//! Both live behind [`imaging::FrameWidthCalculator`] and are chosen in
//! config, so nothing that frames a photo knows which one is active.
//!
//! ## Background Framing, Foreground Results
//!
//! Framing a full-resolution photo is slow enough to stall an interactive
//! caller. [`imaging::ImageProcessor::add_frame`] runs the work on the rayon
//! pool and hands back a [`imaging::FrameJob`]; the caller collects the
//! result on its own thread, blocking or polling. The processor keeps no
//! state between calls, so overlapping requests never interfere, and
//! "latest wins" is left to callers such as [`preview::FramePreview`].
//!
//! ## Degenerate Frames Are Errors
//!
//! A frame width that leaves no room for the photo is reported as
//! [`imaging::ProcessError::DegenerateFrame`] rather than clamped. The
//! supported frame sizes never get there; custom calculators might.

pub mod batch;
pub mod config;
pub mod imaging;
pub mod output;
pub mod preview;

#[cfg(test)]
pub(crate) mod test_helpers;
