use std::collections::VecDeque;
use std::convert::Infallible;
use std::time::{Duration, Instant};

use chip8_core::{run, Chip8, Config, FrameBuffer, Frontend, InputEvent, RunState};

/// Replays one batch of events per poll and quits once the script runs out
/// (or, with a deadline, once the deadline passes)
struct ScriptedFrontend {
    script: VecDeque<Vec<InputEvent>>,
    deadline: Option<Instant>,
    frames: Vec<FrameBuffer>,
    tones: Vec<bool>,
}

impl ScriptedFrontend {
    fn new(script: Vec<Vec<InputEvent>>) -> Self {
        ScriptedFrontend {
            script: script.into(),
            deadline: None,
            frames: Vec::new(),
            tones: Vec::new(),
        }
    }

    fn until(deadline: Duration) -> Self {
        ScriptedFrontend {
            script: VecDeque::new(),
            deadline: Some(Instant::now() + deadline),
            frames: Vec::new(),
            tones: Vec::new(),
        }
    }
}

impl Frontend for ScriptedFrontend {
    type Error = Infallible;

    fn poll(&mut self) -> Vec<InputEvent> {
        match self.deadline {
            Some(deadline) if Instant::now() < deadline => Vec::new(),
            Some(_) => vec![InputEvent::Quit],
            None => self
                .script
                .pop_front()
                .unwrap_or_else(|| vec![InputEvent::Quit]),
        }
    }

    fn present(&mut self, frame: &FrameBuffer) -> Result<(), Infallible> {
        self.frames.push(*frame);
        Ok(())
    }

    fn set_tone(&mut self, on: bool) {
        self.tones.push(on);
    }
}

fn fast_config() -> Config {
    Config {
        instructions_per_second: 100_000,
        ..Config::default()
    }
}

#[test]
fn load_add_then_spin() {
    // LD V0, 5; ADD V0, 3; JP 204
    let mut chip8 = Chip8::new(&[0x60, 0x05, 0x70, 0x03, 0x12, 0x04]).unwrap();
    let mut frontend = ScriptedFrontend::new(vec![Vec::new(); 2]);
    run(&mut chip8, &mut frontend, &fast_config()).unwrap();
    assert_eq!(chip8.state().v[0x0], 8);
    assert_eq!(chip8.state().pc, 0x204);
    assert_eq!(chip8.run_state(), RunState::Quit);
}

#[test]
fn paused_frame_stays_visible() {
    // LD I, 050; DRW V0, V0, 5; JP 204
    let mut chip8 = Chip8::new(&[0xA0, 0x50, 0xD0, 0x05, 0x12, 0x04]).unwrap();
    let mut frontend = ScriptedFrontend::new(vec![
        Vec::new(),
        Vec::new(),
        Vec::new(),
        vec![InputEvent::TogglePause],
    ]);
    run(&mut chip8, &mut frontend, &fast_config()).unwrap();

    let last = frontend.frames.last().expect("paused frame was presented");
    assert_eq!(last[0][0..5], [true, true, true, true, false]);
    assert_eq!(last[1][0..5], [true, false, false, true, false]);
    assert_eq!(frontend.tones.last(), Some(&false));
}

#[test]
fn fault_pauses_instead_of_crashing() {
    // RET with nothing to return to
    let mut chip8 = Chip8::new(&[0x00, 0xEE]).unwrap();
    let mut frontend = ScriptedFrontend::new(vec![Vec::new(), Vec::new()]);
    run(&mut chip8, &mut frontend, &fast_config()).unwrap();
    assert_eq!(chip8.state().pc, 0x200);
    assert!(!frontend.frames.is_empty());
}

#[test]
fn resume_after_pause() {
    // LD V1, 1; ADD V1, 1; JP 204
    let mut chip8 = Chip8::new(&[0x61, 0x01, 0x71, 0x01, 0x12, 0x04]).unwrap();
    let mut frontend = ScriptedFrontend::new(vec![
        vec![InputEvent::TogglePause],
        vec![InputEvent::TogglePause],
        Vec::new(),
    ]);
    run(&mut chip8, &mut frontend, &fast_config()).unwrap();
    assert_eq!(chip8.state().v[0x1], 2);
}

#[test]
fn keys_reach_the_program() {
    // LD V0, 7; SKP V0; JP 202 (spin until key 7 is down); LD V1, 1; JP 208
    let rom = [0x60, 0x07, 0xE0, 0x9E, 0x12, 0x02, 0x61, 0x01, 0x12, 0x08];
    let mut chip8 = Chip8::new(&rom).unwrap();
    let mut frontend = ScriptedFrontend::new(vec![
        Vec::new(),
        Vec::new(),
        Vec::new(),
        vec![InputEvent::KeyDown(0x7)],
        Vec::new(),
        Vec::new(),
        Vec::new(),
    ]);
    run(&mut chip8, &mut frontend, &fast_config()).unwrap();
    assert_eq!(chip8.state().v[0x1], 1);
}

#[test]
fn timers_count_down_at_sixty_hertz() {
    // LD V0, FF; LD DT, V0; LD ST, V0; JP 206
    let rom = [0x60, 0xFF, 0xF0, 0x15, 0xF0, 0x18, 0x12, 0x06];
    let mut chip8 = Chip8::new(&rom).unwrap();
    let mut frontend = ScriptedFrontend::until(Duration::from_millis(120));
    let config = Config {
        instructions_per_second: 10_000,
        ..Config::default()
    };
    run(&mut chip8, &mut frontend, &config).unwrap();

    let state = chip8.state();
    assert!(state.delay_timer < 0xFF);
    assert!(state.delay_timer > 0xFF - 20);
    assert_eq!(state.delay_timer, state.sound_timer);
    assert!(frontend.tones.contains(&true));
    assert!(!frontend.frames.is_empty());
    // the tone is silenced on the way out
    assert_eq!(frontend.tones.last(), Some(&false));
}
