use sdl2::render::TextureValueError;
use sdl2::video::WindowBuildError;
use sdl2::IntegerOrSdlError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("SDL error: {0}")]
    Sdl(String),
    #[error("unable to create window: {0}")]
    Window(#[from] WindowBuildError),
    #[error("unable to create canvas: {0}")]
    Canvas(#[from] IntegerOrSdlError),
    #[error("unable to create texture: {0}")]
    Texture(#[from] TextureValueError),
    #[error("{width}x{height} display scaled by {scale} is too large for a window")]
    TooLarge { width: u32, height: u32, scale: u32 },
}

impl From<String> for DisplayError {
    fn from(message: String) -> Self {
        DisplayError::Sdl(message)
    }
}
