use crate::opcode::Opcode;
use crate::operations::*;
use crate::state::{Keypad, State};

/// An instruction's semantics over (opcode, state with pc advanced, keypad)
pub type Operation = fn(op: &Opcode, state: &State, keys: &Keypad) -> Outcome;

/// Selects the correct Operation for a given Opcode
///
/// Class 0x0 is selected by its low byte alone. Words that match no instruction decode to `nop`.
pub fn from_op(op: &Opcode) -> Operation {
    match op.nibbles() {
        (0x0, ..) => match op.nn {
            0xE0 => cls,
            0xEE => ret,
            _ => nop,
        },
        (0x1, ..) => jump,
        (0x2, ..) => call,
        (0x3, ..) => skip_eq,
        (0x4, ..) => skip_ne,
        (0x5, ..) => skip_reg_eq,
        (0x6, ..) => load,
        (0x7, ..) => add,
        (0x8, .., 0x0) => mv,
        (0x8, .., 0x1) => or,
        (0x8, .., 0x2) => and,
        (0x8, .., 0x3) => xor,
        (0x8, .., 0x4) => add_reg,
        (0x8, .., 0x5) => sub,
        (0x8, .., 0x6) => shr,
        (0x8, .., 0x7) => subn,
        (0x8, .., 0xE) => shl,
        (0x9, ..) => skip_reg_ne,
        (0xA, ..) => load_i,
        (0xB, ..) => jump_v0,
        (0xC, ..) => rand,
        (0xD, ..) => draw,
        (0xE, _, 0x9, 0xE) => skip_pressed,
        (0xE, _, 0xA, 0x1) => skip_released,
        (0xF, _, 0x0, 0x7) => load_delay,
        (0xF, _, 0x0, 0xA) => await_key,
        (0xF, _, 0x1, 0x5) => set_delay,
        (0xF, _, 0x1, 0x8) => set_sound,
        (0xF, _, 0x1, 0xE) => add_i,
        (0xF, _, 0x2, 0x9) => load_glyph,
        (0xF, _, 0x3, 0x3) => bcd,
        (0xF, _, 0x5, 0x5) => store,
        (0xF, _, 0x6, 0x5) => read,
        _ => nop,
    }
}

/// Executes a single word against a state whose pc already points past it
pub fn execute(word: u16, state: &State, keys: &Keypad) -> Outcome {
    let op = Opcode::decode(word);
    from_op(&op)(&op, state, keys)
}
