use crate::error::PipelineError;
use image::{GrayImage, RgbImage};

/// Foreground mask: 255 where the pixel belongs to the foreground, 0 elsewhere.
/// Dimensions match the input frame.
pub type Mask = GrayImage;

/// Trait for background subtractors
/// Allows swapping the statistical model for a fixed or scripted one in tests
pub trait BackgroundSubtractor {
    /// Classify every pixel of `frame` and fold it into the model
    fn apply(&mut self, frame: &RgbImage) -> Result<Mask, PipelineError>;

    /// Number of frames the model has absorbed so far
    fn frames_seen(&self) -> u64;
}
