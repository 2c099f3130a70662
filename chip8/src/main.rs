use std::path::PathBuf;
use std::process;

use clap::error::ErrorKind;
use clap::Parser;
use log::{debug, error};

use chip8_core::config::{
    DEFAULT_BACKGROUND, DEFAULT_FOREGROUND, DEFAULT_INSTRUCTIONS_PER_SECOND, DEFAULT_SCALE,
    MAX_SCALE,
};
use chip8_core::Config;

mod audio;
mod frontend;
mod keymap;
mod run;

/// Chip-8 interpreter
///
/// Keypad: 1234 / QWER / ASDF / ZXCV. Space pauses, Escape quits.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to the ROM file to run
    rom: PathBuf,

    /// Window pixels per Chip-8 pixel
    #[arg(long, default_value_t = DEFAULT_SCALE, value_parser = clap::value_parser!(u32).range(1..=MAX_SCALE as i64))]
    scale: u32,

    /// Instructions per second
    #[arg(long, default_value_t = DEFAULT_INSTRUCTIONS_PER_SECOND, value_parser = clap::value_parser!(u32).range(1..))]
    ips: u32,

    /// Colour of on pixels as RRGGBBAA hex
    #[arg(long, default_value = "FFFFFFFF", value_parser = parse_color)]
    foreground: u32,

    /// Colour of off pixels as RRGGBBAA hex
    #[arg(long, default_value = "000000FF", value_parser = parse_color)]
    background: u32,
}

impl From<&Args> for Config {
    fn from(args: &Args) -> Self {
        Config {
            scale: args.scale,
            foreground: args.foreground,
            background: args.background,
            instructions_per_second: args.ips,
            ..Config::default()
        }
    }
}

/// The line written to stderr for a fatal error, including its context chain
fn fatal_message(e: &anyhow::Error) -> String {
    format!("error: {:#}", e)
}

/// Parses `RRGGBBAA`, optionally prefixed with `#` or `0x`
fn parse_color(s: &str) -> Result<u32, String> {
    let hex = s.trim_start_matches('#').trim_start_matches("0x");
    if hex.len() != 8 {
        return Err(format!("expected 8 hex digits (RRGGBBAA), got {:?}", s));
    }
    u32::from_str_radix(hex, 16).map_err(|e| e.to_string())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            // usage errors (e.g. no ROM) exit with 1 rather than clap's 2
            if let Err(io_err) = e.print() {
                error!("unable to print usage: {}", io_err);
            }
            process::exit(1);
        }
    };
    let config = Config::from(&args);
    debug!("{:?}", config);

    if let Err(e) = run::run(&args.rom, config) {
        error!("{:#}", e);
        eprintln!("{}", fatal_message(&e));
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("FFFFFFFF"), Ok(DEFAULT_FOREGROUND));
        assert_eq!(parse_color("#000000ff"), Ok(DEFAULT_BACKGROUND));
        assert_eq!(parse_color("0x33FF66FF"), Ok(0x33FF_66FF));
        assert!(parse_color("FFF").is_err());
        assert!(parse_color("GGGGGGGG").is_err());
    }

    #[test]
    fn test_defaults_match_config() {
        let args = Args::try_parse_from(["chip8", "game.ch8"]).unwrap();
        assert_eq!(args.rom, PathBuf::from("game.ch8"));
        assert_eq!(Config::from(&args), Config::default());
    }

    #[test]
    fn test_overrides() {
        let args = Args::try_parse_from([
            "chip8",
            "--scale",
            "10",
            "--ips",
            "1000",
            "--foreground",
            "33FF66FF",
            "game.ch8",
        ])
        .unwrap();
        let config = Config::from(&args);
        assert_eq!(config.scale, 10);
        assert_eq!(config.instructions_per_second, 1000);
        assert_eq!(config.foreground, 0x33FF_66FF);
        assert_eq!(config.background, DEFAULT_BACKGROUND);
    }

    #[test]
    fn test_rom_is_required() {
        let err = Args::try_parse_from(["chip8"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_zero_rate_is_rejected() {
        assert!(Args::try_parse_from(["chip8", "--ips", "0", "game.ch8"]).is_err());
    }

    #[test]
    fn test_fatal_message_keeps_context() {
        let e = anyhow::anyhow!("ROM is empty").context("unable to load game.ch8");
        assert_eq!(
            fatal_message(&e),
            "error: unable to load game.ch8: ROM is empty"
        );
    }

    #[test]
    fn test_scale_is_bounded() {
        let args = Args::try_parse_from(["chip8", "--scale", "100", "game.ch8"]).unwrap();
        assert_eq!(args.scale, MAX_SCALE);
        let err = Args::try_parse_from(["chip8", "--scale", "100000000", "game.ch8"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
        assert!(Args::try_parse_from(["chip8", "--scale", "0", "game.ch8"]).is_err());
    }
}
