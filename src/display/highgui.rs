use super::{DisplaySink, View, WINDOW_BLUR, WINDOW_FOREGROUND, WINDOW_MASK, WINDOW_ORIGINAL};
use crate::cv::{mat_from_gray, mat_from_rgb};
use anyhow::{Context, Result};
use opencv::core::Mat;
use opencv::{highgui, imgproc};
use std::time::Duration;

/// Debug windows through OpenCV highgui
pub struct HighGuiDisplay;

impl HighGuiDisplay {
    pub fn new() -> Result<Self> {
        for window in [WINDOW_ORIGINAL, WINDOW_BLUR, WINDOW_MASK, WINDOW_FOREGROUND] {
            highgui::named_window(window, highgui::WINDOW_AUTOSIZE)
                .with_context(|| format!("Failed to create window {window}"))?;
        }
        tracing::info!("Debug windows opened, press ESC or 'q' to quit");
        Ok(Self)
    }
}

fn to_mat(view: View<'_>) -> opencv::Result<Mat> {
    match view {
        View::Color(image) => {
            // highgui expects BGR
            let mut bgr = Mat::default();
            imgproc::cvt_color(&mat_from_rgb(image)?, &mut bgr, imgproc::COLOR_RGB2BGR, 0)?;
            Ok(bgr)
        }
        View::Gray(image) => mat_from_gray(image),
    }
}

impl DisplaySink for HighGuiDisplay {
    fn show(&mut self, window: &str, view: View<'_>) -> Result<()> {
        let mat = to_mat(view).context("Failed to convert image for display")?;
        highgui::imshow(window, &mat).with_context(|| format!("Failed to show {window}"))?;
        Ok(())
    }

    fn wait_key(&mut self, delay: Duration) -> Result<Option<i32>> {
        let delay_ms = delay.as_millis().clamp(1, i32::MAX as u128) as i32;
        let key = highgui::wait_key(delay_ms).context("Failed to wait for key")?;
        Ok((key >= 0).then_some(key))
    }
}

impl Drop for HighGuiDisplay {
    fn drop(&mut self) {
        let _ = highgui::destroy_all_windows();
    }
}
