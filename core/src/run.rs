use std::time::{Duration, Instant};

use log::debug;

use crate::chip8::{Chip8, RunState};
use crate::config::Config;
use crate::constants::{PAUSED_SLEEP_MS, TIMER_HZ};
use crate::state::FrameBuffer;

/// What a frontend can ask of the emulator between instructions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(u8),
    KeyUp(u8),
    TogglePause,
    Quit,
}

/// # Frontend
/// Everything the run loop needs from the outside world: input, a screen and a beeper.
pub trait Frontend {
    type Error;

    /// Drain pending input
    fn poll(&mut self) -> Vec<InputEvent>;

    /// Show a frame
    fn present(&mut self, frame: &FrameBuffer) -> Result<(), Self::Error>;

    /// Start or stop the tone
    fn set_tone(&mut self, on: bool);
}

/// # Scheduler
/// Paces the run loop.
///
/// - `instruction_period` is the wall-clock budget for a single instruction
/// - `tick_period` is the 60Hz interval for timers and presentation
///
/// Overrunning the budget is not compensated for later.
#[derive(Debug, Clone, Copy)]
pub struct Scheduler {
    instruction_period: Duration,
    tick_period: Duration,
    last_tick: Instant,
}

impl Scheduler {
    pub fn new(instructions_per_second: u32, now: Instant) -> Self {
        Scheduler {
            instruction_period: Duration::from_secs(1) / instructions_per_second.max(1),
            tick_period: Duration::from_secs(1) / TIMER_HZ,
            last_tick: now,
        }
    }

    pub fn instruction_period(&self) -> Duration {
        self.instruction_period
    }

    /// Whether a 60Hz tick is due at `now`; a due tick becomes the new reference
    pub fn tick_due(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_tick) >= self.tick_period {
            self.last_tick = now;
            true
        } else {
            false
        }
    }

    /// Move the tick reference to `now` so no backlog of ticks builds up
    pub fn reset_tick(&mut self, now: Instant) {
        self.last_tick = now;
    }

    /// How long to sleep after a cycle that started at `cycle_start`
    pub fn slack(&self, cycle_start: Instant, now: Instant) -> Option<Duration> {
        self.instruction_period
            .checked_sub(now.saturating_duration_since(cycle_start))
            .filter(|slack| !slack.is_zero())
    }
}

fn handle_input(chip8: &mut Chip8, events: Vec<InputEvent>) {
    for event in events {
        match event {
            InputEvent::KeyDown(key) => chip8.key_press(key),
            InputEvent::KeyUp(key) => chip8.key_release(key),
            InputEvent::TogglePause => chip8.toggle_pause(),
            InputEvent::Quit => chip8.quit(),
        }
    }
}

/// Runs `chip8` until it quits.
///
/// While running each iteration polls input, executes one instruction and on every
/// 60Hz tick decrements the timers, updates the tone and presents the frame.
/// While paused the frame is still presented, the tone is silenced and the loop
/// idles without building up ticks to catch up on.
pub fn run<F: Frontend>(
    chip8: &mut Chip8,
    frontend: &mut F,
    config: &Config,
) -> Result<(), F::Error> {
    let mut scheduler = Scheduler::new(config.instructions_per_second, Instant::now());
    debug!(
        "running at {} instructions per second ({:?} per instruction)",
        config.instructions_per_second,
        scheduler.instruction_period()
    );

    loop {
        let cycle_start = Instant::now();

        handle_input(chip8, frontend.poll());

        match chip8.run_state() {
            RunState::Quit => break,
            RunState::Paused => {
                frontend.set_tone(false);
                frontend.present(chip8.frame())?;
                std::thread::sleep(Duration::from_millis(PAUSED_SLEEP_MS));
                scheduler.reset_tick(Instant::now());
                continue;
            }
            RunState::Running => {}
        }

        // A fault has already paused the machine
        if chip8.advance_cpu().is_err() {
            continue;
        }

        if scheduler.tick_due(Instant::now()) {
            chip8.advance_timers();
            frontend.set_tone(chip8.sound_active());
            frontend.present(chip8.frame())?;
        }

        if let Some(slack) = scheduler.slack(cycle_start, Instant::now()) {
            std::thread::sleep(slack);
        }
    }

    frontend.set_tone(false);
    Ok(())
}
