use super::{DisplaySink, View};
use anyhow::Result;
use std::time::Duration;

/// Display that shows nothing and never sees a key press.
/// Stop the program with Ctrl+C.
#[derive(Debug, Default)]
pub struct HeadlessDisplay;

impl DisplaySink for HeadlessDisplay {
    fn show(&mut self, _window: &str, _view: View<'_>) -> Result<()> {
        Ok(())
    }

    fn wait_key(&mut self, delay: Duration) -> Result<Option<i32>> {
        std::thread::sleep(delay);
        Ok(None)
    }
}
