pub use display::{frame_to_rgb, window_size, Display};
pub use error::DisplayError;

mod display;
mod error;
