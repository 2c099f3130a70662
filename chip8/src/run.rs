use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{anyhow, Context};
use log::info;

use chip8_core::{Chip8, Config};
use chip8_display::Display;

use crate::audio::Beeper;
use crate::frontend::SdlFrontend;

/// Loads `rom`, opens the window and audio device, and runs until the user quits
pub fn run(rom: &Path, config: Config) -> anyhow::Result<()> {
    // Load ROM
    let file = File::open(rom).with_context(|| format!("unable to open {}", rom.display()))?;
    let mut reader = BufReader::new(file);
    let mut chip8 =
        Chip8::load_rom(&mut reader).with_context(|| format!("unable to load {}", rom.display()))?;

    // Get SDL2 context
    let sdl: sdl2::Sdl = sdl2::init().map_err(|e| anyhow!("failed to initialize SDL: {}", e))?;
    let display = Display::new(&sdl, &config).context("failed to initialize display")?;
    let events = sdl
        .event_pump()
        .map_err(|e| anyhow!("failed to initialize input: {}", e))?;
    let beeper = Beeper::new(&sdl).map_err(|e| anyhow!("failed to initialize audio: {}", e))?;
    let mut frontend = SdlFrontend::new(display, events, beeper);

    chip8_core::run(&mut chip8, &mut frontend, &config).context("failed to render frame")?;
    info!("emulator quit");
    Ok(())
}
