//! Frame width policies.
//!
//! A [`FrameWidthCalculator`] turns a frame size (0–30) into a border
//! thickness relative to the image's longest side. Two policies exist:
//!
//! | Strategy | Formula |
//! |---|---|
//! | [`PercentageFrameWidth`] | `round(max_side * size / 100)` |
//! | [`FixedScaleFrameWidth`] | `round(max_side * size * 0.0053)` |
//!
//! The fixed scale is tuned so the largest frame size (30) covers about 16%
//! of the longest side. [`make_frame_width_calculator`] picks the policy
//! used by default; callers only ever see the trait.

use serde::{Deserialize, Serialize};

/// Converts a frame size into a border width in the image's logical units.
pub trait FrameWidthCalculator: Send + Sync {
    /// Border width for `frame_size` on an image whose longest side is `image_max_side`.
    ///
    /// Always rounded to a whole number, half away from zero.
    fn frame_width(&self, frame_size: u32, image_max_side: f64) -> f64;

    /// Short identifier for logs and reports.
    fn name(&self) -> &'static str;
}

/// Frame size read as a percentage of the longest side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PercentageFrameWidth;

impl FrameWidthCalculator for PercentageFrameWidth {
    fn frame_width(&self, frame_size: u32, image_max_side: f64) -> f64 {
        (image_max_side * f64::from(frame_size) / 100.0).round()
    }

    fn name(&self) -> &'static str {
        "percentage"
    }
}

/// Frame size read on a fixed linear scale of 0.53% of the longest side per step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedScaleFrameWidth;

impl FixedScaleFrameWidth {
    pub const STEP: f64 = 0.0053;
}

impl FrameWidthCalculator for FixedScaleFrameWidth {
    fn frame_width(&self, frame_size: u32, image_max_side: f64) -> f64 {
        (image_max_side * f64::from(frame_size) * Self::STEP).round()
    }

    fn name(&self) -> &'static str {
        "fixed-scale"
    }
}

/// Selectable frame width policy, as named in config files and on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FrameWidthStrategy {
    Percentage,
    #[default]
    FixedScale,
}

impl FrameWidthCalculator for FrameWidthStrategy {
    fn frame_width(&self, frame_size: u32, image_max_side: f64) -> f64 {
        match self {
            Self::Percentage => PercentageFrameWidth.frame_width(frame_size, image_max_side),
            Self::FixedScale => FixedScaleFrameWidth.frame_width(frame_size, image_max_side),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Percentage => PercentageFrameWidth.name(),
            Self::FixedScale => FixedScaleFrameWidth.name(),
        }
    }
}

/// The frame width policy used when nothing else is configured.
pub fn make_frame_width_calculator() -> FrameWidthStrategy {
    FrameWidthStrategy::FixedScale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_rounds_to_nearest_pixel() {
        let calculator = PercentageFrameWidth;
        assert_eq!(calculator.frame_width(10, 1024.0), 102.0);
        assert_eq!(calculator.frame_width(10, 1026.0), 103.0);
    }

    #[test]
    fn fixed_scale_rounds_to_nearest_pixel() {
        let calculator = FixedScaleFrameWidth;
        assert_eq!(calculator.frame_width(10, 1024.0), 54.0);
        assert_eq!(calculator.frame_width(10, 1030.0), 55.0);
    }

    #[test]
    fn zero_frame_size_gives_zero_width() {
        assert_eq!(PercentageFrameWidth.frame_width(0, 4032.0), 0.0);
        assert_eq!(FixedScaleFrameWidth.frame_width(0, 4032.0), 0.0);
    }

    #[test]
    fn percentage_matches_formula_across_range() {
        for size in 0..=30 {
            for side in [1.0, 17.0, 640.0, 1023.0, 4032.0] {
                let expected = (side * f64::from(size) / 100.0).round();
                assert_eq!(PercentageFrameWidth.frame_width(size, side), expected);
            }
        }
    }

    #[test]
    fn fixed_scale_is_strictly_increasing_over_supported_range() {
        let widths: Vec<f64> = (1..=30)
            .map(|size| FixedScaleFrameWidth.frame_width(size, 1024.0))
            .collect();
        assert!(widths.windows(2).all(|w| w[0] < w[1]), "{widths:?}");
    }

    #[test]
    fn supported_range_stays_below_half_the_side() {
        for size in 0..=30 {
            let width = FixedScaleFrameWidth.frame_width(size, 1000.0);
            assert!((0.0..500.0).contains(&width));
            let width = PercentageFrameWidth.frame_width(size, 1000.0);
            assert!((0.0..500.0).contains(&width));
        }
    }

    #[test]
    fn factory_returns_fixed_scale() {
        let calculator = make_frame_width_calculator();
        assert_eq!(calculator, FrameWidthStrategy::FixedScale);
        assert_eq!(calculator.name(), "fixed-scale");
    }

    #[test]
    fn strategy_delegates_to_variant() {
        assert_eq!(
            FrameWidthStrategy::Percentage.frame_width(10, 1024.0),
            PercentageFrameWidth.frame_width(10, 1024.0)
        );
        assert_eq!(
            FrameWidthStrategy::FixedScale.frame_width(10, 1024.0),
            FixedScaleFrameWidth.frame_width(10, 1024.0)
        );
    }

    #[test]
    fn strategy_default_matches_factory() {
        assert_eq!(FrameWidthStrategy::default(), make_frame_width_calculator());
    }
}
