mod annotate;
mod headless;
#[cfg(feature = "highgui")]
mod highgui;

pub use annotate::annotate;
pub use headless::HeadlessDisplay;
#[cfg(feature = "highgui")]
pub use highgui::HighGuiDisplay;

use anyhow::Result;
use image::{GrayImage, RgbImage};
use std::time::Duration;

pub const WINDOW_ORIGINAL: &str = "original";
pub const WINDOW_BLUR: &str = "blur";
pub const WINDOW_MASK: &str = "extractedMask";
pub const WINDOW_FOREGROUND: &str = "foregroundImage";

const KEY_ESC: i32 = 27;
const KEY_Q: i32 = b'q' as i32;

/// Image handed to a debug window
#[derive(Clone, Copy)]
pub enum View<'a> {
    Color(&'a RgbImage),
    Gray(&'a GrayImage),
}

/// Trait for debug display destinations
pub trait DisplaySink {
    /// Show an image in the named window
    fn show(&mut self, window: &str, view: View<'_>) -> Result<()>;

    /// Wait up to `delay` for a key press, returning its code
    fn wait_key(&mut self, delay: Duration) -> Result<Option<i32>>;
}

/// Escape or 'q' ends the session
pub fn is_exit_key(key: i32) -> bool {
    let key = key & 0xFF;
    key == KEY_ESC || key == KEY_Q
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_keys() {
        assert!(is_exit_key(27));
        assert!(is_exit_key('q' as i32));
        assert!(is_exit_key(0x10_0000 | 'q' as i32));
        assert!(!is_exit_key('Q' as i32));
        assert!(!is_exit_key(' ' as i32));
    }
}
