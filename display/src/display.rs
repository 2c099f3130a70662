use log::debug;
use sdl2::pixels::{Color, PixelFormatEnum};

use chip8_core::config::rgba;
use chip8_core::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use chip8_core::{Config, FrameBuffer};

use crate::error::DisplayError;

/// # Display
/// The Chip-8 display is composed of 64x32 monochrome pixels.
/// On pixels are drawn in the foreground colour and off pixels in the background colour,
/// each scaled up by an integer factor.
pub struct Display {
    canvas: sdl2::render::WindowCanvas,
    foreground: [u8; 3],
    background: [u8; 3],
}

impl Display {
    /// Creates a new display object bound to an sdl2 context.
    ///
    /// # Arguments
    /// * `sdl` an sdl2 context with which to draw
    /// * `config` colours and the size multiplier for each pixel
    pub fn new(sdl: &sdl2::Sdl, config: &Config) -> Result<Self, DisplayError> {
        let (width, height) = window_size(config)?;
        let video_subsystem = sdl.video()?;
        let window = video_subsystem
            .window("Chip-8", width, height)
            .position_centered()
            .resizable()
            .build()?;
        let mut canvas = window.into_canvas().build()?;

        let [r, g, b, a] = rgba(config.background);
        canvas.set_draw_color(Color::RGBA(r, g, b, a));
        canvas.clear();
        canvas.present();
        debug!("opened {}x{} window", width, height);

        Ok(Display {
            canvas,
            foreground: rgb(config.foreground),
            background: rgb(config.background),
        })
    }

    /// Formats the Chip-8 FrameBuffer as an SDL2 RGB24 texture and renders it,
    /// stretched over the whole window.
    ///
    /// # Arguments
    /// * `frame` a Chip-8 FrameBuffer
    pub fn render(&mut self, frame: &FrameBuffer) -> Result<(), DisplayError> {
        let texture_creator = self.canvas.texture_creator();

        let mut texture = texture_creator.create_texture_streaming(
            PixelFormatEnum::RGB24,
            DISPLAY_WIDTH as u32,
            DISPLAY_HEIGHT as u32,
        )?;

        let pixels = frame_to_rgb(frame, self.foreground, self.background);
        texture.with_lock(None, |buffer: &mut [u8], pitch: usize| {
            for (row, line) in pixels.chunks(DISPLAY_WIDTH * 3).enumerate() {
                buffer[row * pitch..row * pitch + line.len()].copy_from_slice(line);
            }
        })?;

        self.canvas.copy(&texture, None, None)?;
        self.canvas.present();
        Ok(())
    }
}

/// The window's pixel dimensions: the display size times the scale
pub fn window_size(config: &Config) -> Result<(u32, u32), DisplayError> {
    let too_large = || DisplayError::TooLarge {
        width: config.width,
        height: config.height,
        scale: config.scale,
    };
    let width = config.width.checked_mul(config.scale).ok_or_else(too_large)?;
    let height = config.height.checked_mul(config.scale).ok_or_else(too_large)?;
    Ok((width, height))
}

/// Drops the alpha channel of a packed `0xRRGGBBAA` colour
fn rgb(color: u32) -> [u8; 3] {
    let [r, g, b, _] = rgba(color);
    [r, g, b]
}

/// Formats a Chip-8 FrameBuffer for rendering as an SDL2 texture.
///
/// An SDL2 RGB24 texture is a 1D array of bytes that represent concatenated rows of RGB pixels.
///
/// This creates a two colour rendering by:
/// - Flattening the 2D frame buffer into a 1D array by concatenating its rows
/// - Replacing each pixel with the three channels of the foreground or background colour
///
/// # Arguments
/// * `frame` a Chip-8 FrameBuffer
/// * `foreground` the colour of on pixels
/// * `background` the colour of off pixels
pub fn frame_to_rgb(frame: &FrameBuffer, foreground: [u8; 3], background: [u8; 3]) -> Vec<u8> {
    frame
        .iter()
        .flat_map(|row| row.iter())
        .flat_map(|&on| {
            let color = if on { foreground } else { background };
            color.to_vec()
        })
        .collect()
}
