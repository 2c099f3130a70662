use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, FONT, FONT_START, MAX_ROM_SIZE, MEMORY_SIZE, PROGRAM_START,
};
use crate::error::LoadError;
use crate::stack::CallStack;

/// The FrameBuffer is indexed as [y][x]; `true` is an "on" pixel
pub type FrameBuffer = [[bool; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// Pressed status of the keys 0..F
pub type Keypad = [bool; 16];

/// A snapshot of the Chip8 internal state
///
/// ## CPU
/// Registers
/// - (v) 16 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is the carry/collision flag
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter
///
/// Timers
/// - 2 8-bit timers (delay & sound), counting down at 60Hz
/// - A beep plays while the sound timer is nonzero
///
/// ## Memory
/// - a 12 slot call stack of return addresses
/// - 4096 bytes of addressable memory
///     - 0x050..0x0A0 holds the font
///     - 0x200.. holds the ROM
/// - 32x64 frame buffer
///
/// ## Input
/// - Emulation halts until a key's value is written to `register_needing_key`
#[derive(Copy, Clone)]
pub struct State {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub stack: CallStack,
    pub memory: [u8; MEMORY_SIZE],
    pub frame_buffer: FrameBuffer,
    pub register_needing_key: Option<u8>,
}

impl State {
    /// A zeroed machine with only the font loaded
    pub fn new() -> Self {
        let mut memory = [0; MEMORY_SIZE];
        let font_start = FONT_START as usize;
        memory[font_start..font_start + FONT.len()].copy_from_slice(&FONT);

        State {
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            delay_timer: 0,
            sound_timer: 0,
            stack: CallStack::new(),
            memory,
            frame_buffer: [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            register_needing_key: None,
        }
    }

    /// A zeroed machine with the font loaded and `rom` copied to `PROGRAM_START`
    ///
    /// # Arguments
    /// * `rom` the program bytes; must be non-empty and fit in memory
    pub fn with_rom(rom: &[u8]) -> Result<Self, LoadError> {
        if rom.is_empty() {
            return Err(LoadError::EmptyRom);
        }
        if rom.len() > MAX_ROM_SIZE {
            return Err(LoadError::too_large(rom.len()));
        }

        let mut state = State::new();
        let start = PROGRAM_START as usize;
        state.memory[start..start + rom.len()].copy_from_slice(rom);
        Ok(state)
    }

    /// The big-endian word at the program counter, or `None` if it runs off the end of memory
    pub fn word_at_pc(&self) -> Option<u16> {
        let pc = usize::from(self.pc);
        match (self.memory.get(pc), self.memory.get(pc + 1)) {
            (Some(&hi), Some(&lo)) => Some(u16::from(hi) << 8 | u16::from(lo)),
            _ => None,
        }
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}
