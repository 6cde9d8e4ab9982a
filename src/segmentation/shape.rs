use crate::cv::{gray_from_mat, mat_from_rgb};
use crate::error::PipelineError;
use image::{GrayImage, RgbImage};
use opencv::core::{Mat, Size, BORDER_DEFAULT};
use opencv::imgproc;

/// Silhouette of the foreground, plus the blurred intensity it was cut from
pub struct Shape {
    pub blurred: GrayImage,
    pub mask: GrayImage,
}

/// Gaussian sigma for an odd kernel width, covering three sigmas on each side
pub fn blur_sigma(blur_size: u32) -> f64 {
    (blur_size.saturating_sub(1)) as f64 / 6.0
}

/// Turn a foreground image into a binary silhouette.
///
/// The heavy blur rounds off the ragged outline left by background
/// subtraction before the image is cut at `level`: pixels brighter than
/// `level` become 255, the rest 0.
pub fn extract_shape(
    foreground: &RgbImage,
    blur_size: u32,
    level: u8,
) -> Result<Shape, PipelineError> {
    let _span = tracing::debug_span!("extract_shape").entered();

    let input = mat_from_rgb(foreground)?;
    let mut gray = Mat::default();
    imgproc::cvt_color(&input, &mut gray, imgproc::COLOR_RGB2GRAY, 0)?;

    let kernel = blur_size as i32;
    let sigma = blur_sigma(blur_size);
    let mut blurred = Mat::default();
    imgproc::gaussian_blur(
        &gray,
        &mut blurred,
        Size::new(kernel, kernel),
        sigma,
        sigma,
        BORDER_DEFAULT,
    )?;

    let mut mask = Mat::default();
    imgproc::threshold(
        &blurred,
        &mut mask,
        f64::from(level),
        255.0,
        imgproc::THRESH_BINARY,
    )?;

    Ok(Shape {
        blurred: gray_from_mat(&blurred)?,
        mask: gray_from_mat(&mask)?,
    })
}
