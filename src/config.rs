use crate::error::ConfigError;
use crate::gesture::{FingerParams, PoseRules};
use crate::segmentation::BackgroundParams;
use std::f64::consts::FRAC_PI_2;
use std::ops::RangeInclusive;

/// Tunable constants of the per-frame pipeline.
///
/// The defaults reproduce the hand-tuned values the heuristic was built
/// around; none of them are derived, so every one is exposed on the
/// command line.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Background history window in frames
    pub history: u32,
    /// Squared Mahalanobis distance below which a pixel matches the background
    pub var_threshold: f32,
    pub detect_shadows: bool,
    /// Passes of 3x3 erosion over the raw foreground mask
    pub erode_iterations: u8,
    /// Gaussian kernel width, odd
    pub blur_size: u32,
    /// Binarization threshold applied after blurring
    pub threshold: u8,
    /// Defects at or below this angle (radians) count as a gap between fingers
    pub max_finger_angle: f64,
    /// Defects no deeper than this many pixels are ignored; 0 keeps them all
    pub min_defect_depth: f64,
    pub fist_gaps: usize,
    pub spread_gaps: RangeInclusive<usize>,
    /// Bilateral smoothing of the raw frame
    pub smoothing: bool,
    /// Mirror the frame horizontally
    pub mirror: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            history: 2000,
            var_threshold: 16.0,
            detect_shadows: false,
            erode_iterations: 1,
            blur_size: 61,
            threshold: 30,
            max_finger_angle: FRAC_PI_2,
            min_defect_depth: 0.0,
            fist_gaps: 0,
            spread_gaps: 4..=5,
            smoothing: true,
            mirror: true,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.blur_size < 3 || self.blur_size % 2 == 0 {
            return Err(ConfigError::BlurSize(self.blur_size));
        }
        if self.history == 0 {
            return Err(ConfigError::EmptyHistory);
        }
        if !(self.var_threshold > 0.0) {
            return Err(ConfigError::VarThreshold(self.var_threshold));
        }
        if self.detect_shadows {
            return Err(ConfigError::ShadowDetection);
        }
        if !(self.max_finger_angle > 0.0 && self.max_finger_angle <= std::f64::consts::PI) {
            return Err(ConfigError::FingerAngle(self.max_finger_angle));
        }
        if !(self.min_defect_depth.is_finite() && self.min_defect_depth >= 0.0) {
            return Err(ConfigError::DefectDepth(self.min_defect_depth));
        }
        if self.spread_gaps.is_empty() {
            return Err(ConfigError::SpreadRange {
                min: *self.spread_gaps.start(),
                max: *self.spread_gaps.end(),
            });
        }
        Ok(())
    }

    pub fn background_params(&self) -> BackgroundParams {
        BackgroundParams {
            history: self.history,
            var_threshold: self.var_threshold,
            detect_shadows: self.detect_shadows,
        }
    }

    pub fn finger_params(&self) -> FingerParams {
        FingerParams {
            max_angle: self.max_finger_angle,
            min_defect_depth: self.min_defect_depth,
        }
    }

    pub fn pose_rules(&self) -> PoseRules {
        PoseRules {
            fist_gaps: self.fist_gaps,
            spread_gaps: self.spread_gaps.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = PipelineConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.history, 2000);
        assert_eq!(config.var_threshold, 16.0);
        assert_eq!(config.blur_size, 61);
        assert_eq!(config.threshold, 30);
        assert_eq!(config.finger_params(), FingerParams::default());
        assert_eq!(config.min_defect_depth, 0.0);
    }

    #[test]
    fn rejects_even_blur() {
        let config = PipelineConfig {
            blur_size: 60,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::BlurSize(60)));

        let config = PipelineConfig {
            blur_size: 1,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::BlurSize(1)));
    }

    #[test]
    fn rejects_shadows_and_bad_ranges() {
        let config = PipelineConfig {
            detect_shadows: true,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ShadowDetection));

        #[allow(clippy::reversed_empty_ranges)]
        let config = PipelineConfig {
            spread_gaps: 5..=4,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::SpreadRange { min: 5, max: 4 })
        );

        let config = PipelineConfig {
            max_finger_angle: 0.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::FingerAngle(_))));
    }
}
