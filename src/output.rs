//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.
//!
//! ## Frame
//!
//! ```text
//! 001 IMG_0042.jpg (4032x3024 @1x)
//!     Frame: size 10, fixed-scale → 214px
//!     Canvas: 4032x4032
//!     Photo: 3604x2703 at (214, 664)
//!     Output: framed/IMG_0042-framed.jpg
//! ```
//!
//! ## Widths
//!
//! ```text
//! Frame widths for a 1024px side (fixed-scale)
//!  0     0px   0.0%
//!  1     5px   0.5%
//! ...
//! ```

use crate::batch::FrameEvent;
use crate::imaging::{ComposeParams, FrameSize, FrameWidthCalculator, supported_extensions};
use std::path::{Path, PathBuf};

/// Everything worth telling the user about one framed photo.
#[derive(Debug, Clone)]
pub struct FrameReport {
    pub source: PathBuf,
    pub output: PathBuf,
    pub source_width: u32,
    pub source_height: u32,
    pub scale: f64,
    pub frame_size: FrameSize,
    pub strategy: &'static str,
    pub plan: ComposeParams,
}

/// Output path for a framed copy of `input`: `<dir>/<stem>-<suffix>.<ext>`.
///
/// Keeps the input's extension when it can be written; anything else becomes JPEG.
pub fn output_path_for(input: &Path, dir: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    let writable = supported_extensions();
    let ext = input
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .filter(|e| writable.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or_else(|| "jpg".to_string());
    dir.join(format!("{stem}-{suffix}.{ext}"))
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Format the result of framing one photo. `index` is 1-based.
pub fn format_frame_report(index: usize, report: &FrameReport) -> Vec<String> {
    let plan = &report.plan;
    vec![
        format!(
            "{:03} {} ({}x{} @{}x)",
            index,
            file_label(&report.source),
            report.source_width,
            report.source_height,
            report.scale
        ),
        format!(
            "    Frame: size {}, {} → {}px",
            report.frame_size, report.strategy, plan.frame_width
        ),
        format!("    Canvas: {}x{}", plan.canvas_side, plan.canvas_side),
        format!(
            "    Photo: {}x{} at ({}, {})",
            plan.inner_width, plan.inner_height, plan.x, plan.y
        ),
        format!("    Output: {}", report.output.display()),
    ]
}

/// Format a failure to frame one photo.
pub fn format_frame_failure(
    index: usize,
    source: &Path,
    error: &dyn std::fmt::Display,
) -> Vec<String> {
    vec![
        format!("{:03} {}", index, file_label(source)),
        format!("    Failed: {}", error),
    ]
}

/// Format the frame width for every supported frame size on a side of `max_side`.
pub fn format_width_table(calculator: &dyn FrameWidthCalculator, max_side: f64) -> Vec<String> {
    let mut lines = vec![format!(
        "Frame widths for a {}px side ({})",
        max_side,
        calculator.name()
    )];
    for size in FrameSize::MIN..=FrameSize::MAX {
        let width = calculator.frame_width(size, max_side);
        let share = if max_side > 0.0 {
            width / max_side * 100.0
        } else {
            0.0
        };
        lines.push(format!("{:>2} {:>5}px {:>5.1}%", size, width, share));
    }
    lines
}

/// Format one batch event as a report or a failure.
pub fn format_frame_event(event: &FrameEvent) -> Vec<String> {
    match event {
        FrameEvent::Framed { index, report } => format_frame_report(*index, report),
        FrameEvent::Failed {
            index,
            source,
            error,
        } => format_frame_failure(*index, source, error),
    }
}

pub fn print_frame_event(event: &FrameEvent) {
    for line in format_frame_event(event) {
        println!("{}", line);
    }
}

pub fn print_width_table(calculator: &dyn FrameWidthCalculator, max_side: f64) {
    for line in format_width_table(calculator, max_side) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::FrameFailure;
    use crate::imaging::{BackendError, FRAME_COLOR, FixedScaleFrameWidth, PercentageFrameWidth};

    fn sample_report() -> FrameReport {
        FrameReport {
            source: PathBuf::from("/photos/IMG_0042.jpg"),
            output: PathBuf::from("framed/IMG_0042-framed.jpg"),
            source_width: 1024,
            source_height: 768,
            scale: 1.0,
            frame_size: FrameSize::new(10),
            strategy: "fixed-scale",
            plan: ComposeParams {
                canvas_side: 1024,
                inner_width: 916,
                inner_height: 687,
                x: 54,
                y: 168,
                background: FRAME_COLOR,
                scale: 1.0,
                frame_width: 54.0,
            },
        }
    }

    #[test]
    fn frame_report_lines() {
        let lines = format_frame_report(1, &sample_report());
        assert_eq!(
            lines,
            vec![
                "001 IMG_0042.jpg (1024x768 @1x)",
                "    Frame: size 10, fixed-scale → 54px",
                "    Canvas: 1024x1024",
                "    Photo: 916x687 at (54, 168)",
                "    Output: framed/IMG_0042-framed.jpg",
            ]
        );
    }

    #[test]
    fn frame_failure_lines() {
        let lines = format_frame_failure(3, Path::new("/photos/broken.png"), &"decode error");
        assert_eq!(lines, vec!["003 broken.png", "    Failed: decode error"]);
    }

    #[test]
    fn frame_event_picks_report_or_failure() {
        let framed = FrameEvent::Framed {
            index: 1,
            report: sample_report(),
        };
        assert_eq!(format_frame_event(&framed), format_frame_report(1, &sample_report()));

        let failed = FrameEvent::Failed {
            index: 2,
            source: PathBuf::from("/photos/missing.jpg"),
            error: FrameFailure::Decode(BackendError::ProcessingFailed("no such file".into())),
        };
        assert_eq!(
            format_frame_event(&failed),
            vec![
                "002 missing.jpg",
                "    Failed: Decode failed: Processing failed: no such file",
            ]
        );
    }

    #[test]
    fn width_table_covers_supported_range() {
        let lines = format_width_table(&FixedScaleFrameWidth, 1024.0);
        assert_eq!(lines.len(), 32);
        assert_eq!(lines[0], "Frame widths for a 1024px side (fixed-scale)");
        assert_eq!(lines[1], " 0     0px   0.0%");
        assert_eq!(lines[11], "10    54px   5.3%");
    }

    #[test]
    fn width_table_percentage() {
        let lines = format_width_table(&PercentageFrameWidth, 1024.0);
        assert_eq!(lines[11], "10   102px  10.0%");
    }

    #[test]
    fn output_path_keeps_extension() {
        let path = output_path_for(Path::new("/in/IMG_0042.JPG"), Path::new("out"), "framed");
        assert_eq!(path, PathBuf::from("out/IMG_0042-framed.JPG"));
    }

    #[test]
    fn output_path_defaults_to_jpeg() {
        let path = output_path_for(Path::new("/in/scan"), Path::new("out"), "framed");
        assert_eq!(path, PathBuf::from("out/scan-framed.jpg"));
    }

    #[test]
    fn output_path_replaces_unwritable_extension() {
        let path = output_path_for(Path::new("/in/anim.gif"), Path::new("out"), "framed");
        assert_eq!(path, PathBuf::from("out/anim-framed.jpg"));
    }
}
