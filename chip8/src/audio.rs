use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use sdl2::audio::{AudioCallback, AudioDevice, AudioSpecDesired};

const SAMPLE_RATE: i32 = 44_100;
const TONE_HZ: f32 = 440.0;
const VOLUME: f32 = 0.25;

/// A square wave that is silent unless `playing` is set.
///
/// Runs on SDL's audio thread; `playing` is the only state it shares with the run loop.
struct SquareWave {
    phase_inc: f32,
    phase: f32,
    volume: f32,
    playing: Arc<AtomicBool>,
}

impl AudioCallback for SquareWave {
    type Channel = f32;

    fn callback(&mut self, out: &mut [f32]) {
        if !self.playing.load(Ordering::Relaxed) {
            out.iter_mut().for_each(|sample| *sample = 0.0);
            return;
        }
        for sample in out.iter_mut() {
            *sample = if self.phase < 0.5 {
                self.volume
            } else {
                -self.volume
            };
            self.phase = (self.phase + self.phase_inc) % 1.0;
        }
    }
}

/// # Beeper
/// Plays the Chip-8 tone while switched on.
pub struct Beeper {
    _device: AudioDevice<SquareWave>,
    playing: Arc<AtomicBool>,
}

impl Beeper {
    pub fn new(sdl: &sdl2::Sdl) -> Result<Self, String> {
        let audio_subsystem = sdl.audio()?;
        let desired = AudioSpecDesired {
            freq: Some(SAMPLE_RATE),
            channels: Some(1),
            samples: None,
        };
        let playing = Arc::new(AtomicBool::new(false));

        let wave_flag = Arc::clone(&playing);
        let device = audio_subsystem.open_playback(None, &desired, |spec| SquareWave {
            phase_inc: TONE_HZ / spec.freq as f32,
            phase: 0.0,
            volume: VOLUME,
            playing: wave_flag,
        })?;
        device.resume();

        Ok(Beeper {
            _device: device,
            playing,
        })
    }

    pub fn set(&self, on: bool) {
        self.playing.store(on, Ordering::Relaxed);
    }
}
