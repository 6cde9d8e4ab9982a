use crate::cv::{mat_from_rgb, rgb_from_mat};
use crate::error::PipelineError;
use image::{imageops, RgbImage};
use opencv::core::{Mat, BORDER_DEFAULT};
use opencv::imgproc;

/// Bilateral window diameter
const SMOOTH_DIAMETER: i32 = 5;
const SIGMA_COLOR: f64 = 50.0;
const SIGMA_SPACE: f64 = 100.0;

/// Conditions raw camera frames before background subtraction
pub struct Preprocessor {
    smoothing: bool,
    mirror: bool,
}

impl Preprocessor {
    pub fn new(smoothing: bool, mirror: bool) -> Self {
        Self { smoothing, mirror }
    }

    /// Smooth (edge-preserving) and mirror a frame
    pub fn prepare(&self, frame: &RgbImage) -> Result<RgbImage, PipelineError> {
        let _span = tracing::debug_span!("preprocess").entered();

        let smoothed = if self.smoothing {
            bilateral(frame)?
        } else {
            frame.clone()
        };

        Ok(if self.mirror {
            imageops::flip_horizontal(&smoothed)
        } else {
            smoothed
        })
    }
}

fn bilateral(frame: &RgbImage) -> Result<RgbImage, PipelineError> {
    let input = mat_from_rgb(frame)?;
    let mut smoothed = Mat::default();
    imgproc::bilateral_filter(
        &input,
        &mut smoothed,
        SMOOTH_DIAMETER,
        SIGMA_COLOR,
        SIGMA_SPACE,
        BORDER_DEFAULT,
    )?;
    rgb_from_mat(&smoothed)
}
