use super::types::{BackgroundSubtractor, Mask};
use crate::cv::{gray_from_mat, mat_from_rgb};
use crate::error::PipelineError;
use image::RgbImage;
use opencv::core::{Mat, Ptr};
use opencv::video::{self, BackgroundSubtractorMOG2, BackgroundSubtractorTrait};

/// Let the subtractor derive the rate from its frame count and history
const AUTO_LEARNING_RATE: f64 = -1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundParams {
    /// Number of frames the model effectively remembers
    pub history: u32,
    /// Squared Mahalanobis distance below which a pixel matches a background mode
    pub var_threshold: f32,
    pub detect_shadows: bool,
}

impl Default for BackgroundParams {
    fn default() -> Self {
        Self {
            history: 2000,
            var_threshold: 16.0,
            detect_shadows: false,
        }
    }
}

/// Adaptive per-pixel Gaussian mixture background model (OpenCV MOG2).
///
/// Every pixel keeps up to five weighted Gaussians; the heaviest modes that
/// together hold 90% of the weight describe the background. The learning
/// rate starts high and settles at `1 / history`, so a static scene is
/// learned within a couple of frames while slow changes are absorbed over
/// the full history window.
///
/// The statistics accumulate for the lifetime of the model and are never
/// reset.
pub struct BackgroundModel {
    params: BackgroundParams,
    subtractor: Ptr<BackgroundSubtractorMOG2>,
    size: Option<(u32, u32)>,
    frames_seen: u64,
}

impl BackgroundModel {
    pub fn new(params: BackgroundParams) -> Result<Self, PipelineError> {
        tracing::info!(
            "Background model: history={}, var_threshold={}, shadows={}",
            params.history,
            params.var_threshold,
            params.detect_shadows
        );

        let subtractor = video::create_background_subtractor_mog2(
            i32::try_from(params.history).unwrap_or(i32::MAX),
            f64::from(params.var_threshold),
            params.detect_shadows,
        )?;

        Ok(Self {
            params,
            subtractor,
            size: None,
            frames_seen: 0,
        })
    }

    /// Learning rate the next frame will be absorbed with
    pub fn learning_rate(&self) -> f32 {
        learning_rate(self.frames_seen + 1, self.params.history)
    }
}

/// Automatic MOG2 rate: `1 / min(2n, history)` for the n-th frame
fn learning_rate(frame_number: u64, history: u32) -> f32 {
    let span = (2 * frame_number).min(history as u64).max(1);
    1.0 / span as f32
}

impl BackgroundSubtractor for BackgroundModel {
    fn apply(&mut self, frame: &RgbImage) -> Result<Mask, PipelineError> {
        let _span = tracing::debug_span!("background_apply").entered();

        let (width, height) = frame.dimensions();
        if width == 0 || height == 0 {
            return Err(PipelineError::EmptyFrame);
        }
        // MOG2 silently restarts on a new frame size
        match self.size {
            None => {
                tracing::debug!("Background model sized to {}x{}", width, height);
                self.size = Some((width, height));
            }
            Some(expected) if expected != (width, height) => {
                return Err(PipelineError::FrameSizeChanged {
                    expected,
                    actual: (width, height),
                });
            }
            Some(_) => {}
        }

        let input = mat_from_rgb(frame)?;
        let mut mask = Mat::default();
        BackgroundSubtractorTrait::apply(
            &mut self.subtractor,
            &input,
            &mut mask,
            AUTO_LEARNING_RATE,
        )?;
        self.frames_seen += 1;

        gray_from_mat(&mask)
    }

    fn frames_seen(&self) -> u64 {
        self.frames_seen
    }
}
