use sdl2::event::Event;
use sdl2::keyboard::Scancode;
use sdl2::EventPump;

use chip8_core::{FrameBuffer, Frontend, InputEvent};
use chip8_display::{Display, DisplayError};

use crate::audio::Beeper;
use crate::keymap::keymap;

/// The SDL2 window, keyboard and speaker
pub struct SdlFrontend {
    display: Display,
    events: EventPump,
    beeper: Beeper,
}

impl SdlFrontend {
    pub fn new(display: Display, events: EventPump, beeper: Beeper) -> Self {
        SdlFrontend {
            display,
            events,
            beeper,
        }
    }
}

/// Translates an SDL event into what the emulator cares about
///
/// - Escape or closing the window quits
/// - Space toggles pause; held-key repeats are ignored
/// - mapped keys press and release keypad keys
fn translate(event: Event) -> Option<InputEvent> {
    match event {
        Event::Quit { .. } => Some(InputEvent::Quit),
        Event::KeyDown {
            scancode: Some(Scancode::Escape),
            ..
        } => Some(InputEvent::Quit),
        Event::KeyDown {
            scancode: Some(Scancode::Space),
            repeat: false,
            ..
        } => Some(InputEvent::TogglePause),
        Event::KeyDown {
            scancode: Some(key),
            ..
        } => keymap(key).map(InputEvent::KeyDown),
        Event::KeyUp {
            scancode: Some(key),
            ..
        } => keymap(key).map(InputEvent::KeyUp),
        _ => None,
    }
}

impl Frontend for SdlFrontend {
    type Error = DisplayError;

    fn poll(&mut self) -> Vec<InputEvent> {
        self.events.poll_iter().filter_map(translate).collect()
    }

    fn present(&mut self, frame: &FrameBuffer) -> Result<(), DisplayError> {
        self.display.render(frame)
    }

    fn set_tone(&mut self, on: bool) {
        self.beeper.set(on);
    }
}
