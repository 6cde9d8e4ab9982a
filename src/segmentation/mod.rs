mod background;
mod foreground;
mod preprocess;
mod shape;
pub mod types;

pub use background::{BackgroundModel, BackgroundParams};
pub use foreground::{extract_foreground, Foreground};
pub use preprocess::Preprocessor;
pub use shape::{extract_shape, Shape};
pub use types::BackgroundSubtractor;
