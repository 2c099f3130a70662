use std::io::Read;

use log::{info, trace, warn};

use crate::constants::PROGRAM_START;
use crate::error::{Fault, LoadError};
use crate::instruction::execute;
use crate::state::{FrameBuffer, Keypad, State};

/// Whether the run loop should execute instructions, idle, or exit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Paused,
    Quit,
}

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - `pressed_keys` with public interfaces for manipulating them
///  - `run_state`, which faults and user input move between running and paused
///
/// Supplies interfaces for:
/// - loading roms
/// - pressing and releasing keys
/// - pausing, resuming and quitting
/// - advancing the CPU and its timers
/// - inspecting its frame buffer for rendering by some display
pub struct Chip8 {
    state: State,
    pressed_keys: Keypad,
    run_state: RunState,
}

impl Chip8 {
    /// Builds a running machine with `rom` loaded at 0x200
    pub fn new(rom: &[u8]) -> Result<Self, LoadError> {
        let state = State::with_rom(rom)?;
        info!("loaded {} byte ROM at {:#05X}", rom.len(), PROGRAM_START);
        Ok(Chip8 {
            state,
            pressed_keys: [false; 16],
            run_state: RunState::Running,
        })
    }

    /// Load a rom from a source file
    ///
    /// # Arguments
    /// * `reader` a file reader that contains a ROM
    pub fn load_rom(reader: &mut dyn Read) -> Result<Self, LoadError> {
        let mut rom = Vec::new();
        reader.read_to_end(&mut rom)?;
        Chip8::new(&rom)
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// The current frame; renderers get a read-only view
    pub fn frame(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    /// Whether the sound timer wants a tone played
    pub fn sound_active(&self) -> bool {
        self.state.sound_timer > 0
    }

    pub fn pressed_keys(&self) -> &Keypad {
        &self.pressed_keys
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the index 0x0..=0xF of the key that was pressed
    pub fn key_press(&mut self, key: u8) {
        let key = key & 0xF;
        self.pressed_keys[usize::from(key)] = true;
        if let Some(register) = self.state.register_needing_key.take() {
            self.state.v[usize::from(register)] = key;
        }
    }

    /// Unset the pressed status of key
    ///
    /// # Arguments
    /// * `key` the index 0x0..=0xF of the key that was released
    pub fn key_release(&mut self, key: u8) {
        self.pressed_keys[usize::from(key & 0xF)] = false;
    }

    pub fn pause(&mut self) {
        if self.run_state == RunState::Running {
            self.run_state = RunState::Paused;
            info!("emulator paused");
        }
    }

    pub fn resume(&mut self) {
        if self.run_state == RunState::Paused {
            self.run_state = RunState::Running;
            info!("emulator resumed");
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.run_state {
            RunState::Running => self.pause(),
            RunState::Paused => self.resume(),
            RunState::Quit => {}
        }
    }

    /// Quitting is terminal
    pub fn quit(&mut self) {
        self.run_state = RunState::Quit;
    }

    /// Advances the CPU by a single cycle
    /// - does nothing unless running
    /// - breaks if awaiting a keypress
    /// - gets and executes the next opcode
    ///
    /// A fault leaves the state as it was before the fetch and pauses the machine.
    pub fn advance_cpu(&mut self) -> Result<(), Fault> {
        if self.run_state != RunState::Running || self.state.register_needing_key.is_some() {
            return Ok(());
        }

        match self.step() {
            Ok(state) => {
                self.state = state;
                Ok(())
            }
            Err(fault) => {
                warn!("{} at pc {:#05X}", fault, self.state.pc);
                self.run_state = RunState::Paused;
                Err(fault)
            }
        }
    }

    /// Fetch, decode and execute the instruction at pc without committing the result
    fn step(&self) -> Result<State, Fault> {
        let word = self
            .state
            .word_at_pc()
            .ok_or(Fault::PcOutOfBounds(self.state.pc))?;
        trace!(
            "{:04X} v{:02X?} i{:04X} pc{:04X}",
            word,
            self.state.v,
            self.state.i,
            self.state.pc
        );
        let fetched = State {
            pc: self.state.pc + 0x2,
            ..self.state
        };
        execute(word, &fetched, &self.pressed_keys)
    }

    /// Decrements the nonzero delay and sound timers; call at 60Hz
    pub fn advance_timers(&mut self) {
        self.state.delay_timer = self.state.delay_timer.saturating_sub(1);
        self.state.sound_timer = self.state.sound_timer.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine(rom: &[u8]) -> Chip8 {
        Chip8::new(rom).unwrap()
    }

    #[test]
    fn test_load_rom_from_reader() {
        let mut rom: &[u8] = &[0x00, 0xE0];
        let chip8 = Chip8::load_rom(&mut rom).unwrap();
        assert_eq!(chip8.state.memory[0x200..0x202], [0x00, 0xE0]);
        assert_eq!(chip8.run_state(), RunState::Running);
    }

    #[test]
    fn test_load_empty_rom_from_reader_fails() {
        let mut rom: &[u8] = &[];
        assert!(matches!(Chip8::load_rom(&mut rom), Err(LoadError::EmptyRom)));
    }

    #[test]
    fn test_cycles_while_no_register_needs_key() {
        let mut chip8 = machine(&[0x00, 0xE0]);
        chip8.advance_cpu().unwrap();
        assert_eq!(chip8.state.pc, 0x202);
    }

    #[test]
    fn test_captures_key_presses() {
        let mut chip8 = machine(&[0xF1, 0x0A]);
        chip8.advance_cpu().unwrap();
        assert_eq!(chip8.state.register_needing_key, Some(0x1));
        chip8.key_press(0xE);
        assert_eq!(chip8.state.register_needing_key, None);
        assert_eq!(chip8.state.v[0x1], 0xE);
        assert!(chip8.pressed_keys()[0xE]);
    }

    #[test]
    fn test_doesnt_cycle_while_register_needs_key() {
        let mut chip8 = machine(&[0x00, 0xE0]);
        chip8.state.register_needing_key = Some(0x1);
        chip8.advance_cpu().unwrap();
        assert_eq!(chip8.state.pc, 0x200);
    }

    #[test]
    fn test_key_release() {
        let mut chip8 = machine(&[0x00, 0xE0]);
        chip8.key_press(0x3);
        chip8.key_release(0x3);
        assert_eq!(chip8.pressed_keys(), &[false; 16]);
    }

    #[test]
    fn test_skip_advances_pc_by_four() {
        // V0 == 0, so 3000 skips and 4000 doesn't
        let mut chip8 = machine(&[0x30, 0x00, 0x00, 0x00, 0x40, 0x00]);
        chip8.advance_cpu().unwrap();
        assert_eq!(chip8.state.pc, 0x204);
        chip8.advance_cpu().unwrap();
        assert_eq!(chip8.state.pc, 0x206);
    }

    #[test]
    fn test_ret_with_empty_stack_pauses() {
        let mut chip8 = machine(&[0x00, 0xEE]);
        assert_eq!(chip8.advance_cpu(), Err(Fault::StackUnderflow));
        assert_eq!(chip8.run_state(), RunState::Paused);
        assert_eq!(chip8.state.pc, 0x200);
    }

    #[test]
    fn test_call_then_ret_returns_after_call() {
        // 200: CALL 206; 202: -; 204: -; 206: RET
        let mut chip8 = machine(&[0x22, 0x06, 0x00, 0x00, 0x00, 0x00, 0x00, 0xEE]);
        chip8.advance_cpu().unwrap();
        assert_eq!(chip8.state.pc, 0x206);
        chip8.advance_cpu().unwrap();
        assert_eq!(chip8.state.pc, 0x202);
        assert!(chip8.state.stack.is_empty());
    }

    #[test]
    fn test_recursive_call_overflows_and_pauses() {
        // 200: CALL 200
        let mut chip8 = machine(&[0x22, 0x00]);
        for _ in 0..12 {
            chip8.advance_cpu().unwrap();
        }
        assert_eq!(chip8.advance_cpu(), Err(Fault::StackOverflow));
        assert_eq!(chip8.run_state(), RunState::Paused);
        assert_eq!(chip8.state.stack.len(), 12);
    }

    #[test]
    fn test_pc_out_of_bounds_pauses() {
        // 200: JP FFF
        let mut chip8 = machine(&[0x1F, 0xFF]);
        chip8.advance_cpu().unwrap();
        assert_eq!(chip8.advance_cpu(), Err(Fault::PcOutOfBounds(0xFFF)));
        assert_eq!(chip8.run_state(), RunState::Paused);
    }

    #[test]
    fn test_paused_machine_doesnt_cycle() {
        let mut chip8 = machine(&[0x60, 0x05]);
        chip8.pause();
        chip8.advance_cpu().unwrap();
        assert_eq!(chip8.state.pc, 0x200);
        chip8.resume();
        chip8.advance_cpu().unwrap();
        assert_eq!(chip8.state.v[0x0], 0x05);
    }

    #[test]
    fn test_run_state_transitions() {
        let mut chip8 = machine(&[0x00, 0xE0]);
        chip8.toggle_pause();
        assert_eq!(chip8.run_state(), RunState::Paused);
        chip8.toggle_pause();
        assert_eq!(chip8.run_state(), RunState::Running);
        chip8.quit();
        chip8.toggle_pause();
        chip8.resume();
        assert_eq!(chip8.run_state(), RunState::Quit);
    }

    #[test]
    fn test_load_add_loop() {
        // LD V0, 5; ADD V0, 3; JP 204
        let mut chip8 = machine(&[0x60, 0x05, 0x70, 0x03, 0x12, 0x04]);
        chip8.advance_cpu().unwrap();
        chip8.advance_cpu().unwrap();
        assert_eq!(chip8.state.v[0x0], 8);
        assert_eq!(chip8.run_state(), RunState::Running);
        for _ in 0..10 {
            chip8.advance_cpu().unwrap();
        }
        assert_eq!(chip8.state.pc, 0x204);
    }

    #[test]
    fn test_advance_timers() {
        let mut chip8 = machine(&[0x00, 0xE0]);
        chip8.state.delay_timer = 2;
        chip8.state.sound_timer = 1;
        assert!(chip8.sound_active());
        chip8.advance_timers();
        assert_eq!(chip8.state.delay_timer, 1);
        assert!(!chip8.sound_active());
        chip8.advance_timers();
        chip8.advance_timers();
        assert_eq!((chip8.state.delay_timer, chip8.state.sound_timer), (0, 0));
    }
}
