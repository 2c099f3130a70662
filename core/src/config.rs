use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// # Config
/// Presentation and pacing settings, fixed for the life of the emulator.
///
/// Colours are packed `0xRRGGBBAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub width: u32,
    pub height: u32,
    pub scale: u32,
    pub foreground: u32,
    pub background: u32,
    pub instructions_per_second: u32,
}

pub const DEFAULT_SCALE: u32 = 20;
pub const MAX_SCALE: u32 = 100;
pub const DEFAULT_FOREGROUND: u32 = 0xFFFF_FFFF;
pub const DEFAULT_BACKGROUND: u32 = 0x0000_00FF;
pub const DEFAULT_INSTRUCTIONS_PER_SECOND: u32 = 700;

impl Default for Config {
    fn default() -> Self {
        Config {
            width: DISPLAY_WIDTH as u32,
            height: DISPLAY_HEIGHT as u32,
            scale: DEFAULT_SCALE,
            foreground: DEFAULT_FOREGROUND,
            background: DEFAULT_BACKGROUND,
            instructions_per_second: DEFAULT_INSTRUCTIONS_PER_SECOND,
        }
    }
}

/// Splits a packed `0xRRGGBBAA` colour into `[r, g, b, a]`
pub fn rgba(color: u32) -> [u8; 4] {
    color.to_be_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!((config.width, config.height), (64, 32));
        assert_eq!(config.scale, 20);
        assert_eq!(config.instructions_per_second, 700);
        assert_eq!(rgba(config.foreground), [0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(rgba(config.background), [0x00, 0x00, 0x00, 0xFF]);
    }

    #[test]
    fn test_rgba_channel_order() {
        assert_eq!(rgba(0x1234_56FF), [0x12, 0x34, 0x56, 0xFF]);
    }
}
