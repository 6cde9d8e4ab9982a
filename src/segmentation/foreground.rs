use super::types::{BackgroundSubtractor, Mask};
use crate::error::PipelineError;
use image::{Rgb, RgbImage};
use imageproc::distance_transform::Norm;
use imageproc::morphology::erode;

/// Frame with everything but the moving foreground blacked out
pub struct Foreground {
    pub mask: Mask,
    pub image: RgbImage,
}

/// Subtract the background, erode the mask with a 3x3 square to knock out
/// isolated pixels, and keep the frame's colour only under the mask.
pub fn extract_foreground<B>(
    frame: &RgbImage,
    model: &mut B,
    erode_iterations: u8,
) -> Result<Foreground, PipelineError>
where
    B: BackgroundSubtractor + ?Sized,
{
    let _span = tracing::debug_span!("extract_foreground").entered();

    let raw = model.apply(frame)?;
    let mask = (0..erode_iterations).fold(raw, |mask, _| erode(&mask, Norm::LInf, 1));

    let image = RgbImage::from_fn(frame.width(), frame.height(), |x, y| {
        if mask.get_pixel(x, y).0[0] > 0 {
            *frame.get_pixel(x, y)
        } else {
            Rgb([0, 0, 0])
        }
    });

    Ok(Foreground { mask, image })
}
