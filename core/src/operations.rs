//! One function per instruction.
//!
//! Each receives the decoded opcode, the state with the program counter
//! already advanced past the instruction, and the keypad. It returns the
//! resulting state or the `Fault` that should pause the machine.

use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, FONT_GLYPH_SIZE, FONT_START, MEMORY_SIZE};
use crate::error::Fault;
use crate::opcode::Opcode;
use crate::state::{Keypad, State};

pub type Outcome = Result<State, Fault>;

/// Advance past the next instruction when `condition` holds
fn skip_if(condition: bool, state: &State) -> Outcome {
    let pc = if condition { state.pc + 0x2 } else { state.pc };
    Ok(State { pc, ..*state })
}

/// Vx = value, leaving everything else as-is
fn set_vx(op: &Opcode, state: &State, value: u8) -> Outcome {
    let mut v = state.v;
    v[op.vx()] = value;
    Ok(State { v, ..*state })
}

/// Vx = value; VF = flag. The flag is written last so it wins when x is F.
fn set_vx_flag(op: &Opcode, state: &State, value: u8, flag: bool) -> Outcome {
    let mut v = state.v;
    v[op.vx()] = value;
    v[0xF] = u8::from(flag);
    Ok(State { v, ..*state })
}

/// Memory range `i..i + len`, or the first address that falls outside of memory
fn memory_range(state: &State, len: usize) -> Result<std::ops::Range<usize>, Fault> {
    let start = usize::from(state.i);
    let end = start + len;
    if end > MEMORY_SIZE {
        return Err(Fault::MemoryOutOfBounds(MEMORY_SIZE.max(start) as u16));
    }
    Ok(start..end)
}

/// unsupported machine code routine or unknown sub-opcode
pub fn nop(_op: &Opcode, state: &State, _keys: &Keypad) -> Outcome {
    Ok(*state)
}

/// clear
pub fn cls(_op: &Opcode, state: &State, _keys: &Keypad) -> Outcome {
    Ok(State {
        frame_buffer: [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
        ..*state
    })
}

/// PC = STACK.pop()
pub fn ret(_op: &Opcode, state: &State, _keys: &Keypad) -> Outcome {
    let mut stack = state.stack;
    let pc = stack.pop()?;
    Ok(State { pc, stack, ..*state })
}

/// PC = nnn
pub fn jump(op: &Opcode, state: &State, _keys: &Keypad) -> Outcome {
    Ok(State { pc: op.nnn, ..*state })
}

/// STACK.push(PC); PC = nnn
pub fn call(op: &Opcode, state: &State, _keys: &Keypad) -> Outcome {
    let mut stack = state.stack;
    stack.push(state.pc)?;
    Ok(State {
        pc: op.nnn,
        stack,
        ..*state
    })
}

/// if Vx == nn then skip
pub fn skip_eq(op: &Opcode, state: &State, _keys: &Keypad) -> Outcome {
    skip_if(state.v[op.vx()] == op.nn, state)
}

/// if Vx != nn then skip
pub fn skip_ne(op: &Opcode, state: &State, _keys: &Keypad) -> Outcome {
    skip_if(state.v[op.vx()] != op.nn, state)
}

/// if Vx == Vy then skip
pub fn skip_reg_eq(op: &Opcode, state: &State, _keys: &Keypad) -> Outcome {
    skip_if(state.v[op.vx()] == state.v[op.vy()], state)
}

/// if Vx != Vy then skip
pub fn skip_reg_ne(op: &Opcode, state: &State, _keys: &Keypad) -> Outcome {
    skip_if(state.v[op.vx()] != state.v[op.vy()], state)
}

/// Vx = nn
pub fn load(op: &Opcode, state: &State, _keys: &Keypad) -> Outcome {
    set_vx(op, state, op.nn)
}

/// Vx += nn
/// Allow for overflow but drop it; VF is untouched
pub fn add(op: &Opcode, state: &State, _keys: &Keypad) -> Outcome {
    set_vx(op, state, state.v[op.vx()].wrapping_add(op.nn))
}

/// Vx = Vy
pub fn mv(op: &Opcode, state: &State, _keys: &Keypad) -> Outcome {
    set_vx(op, state, state.v[op.vy()])
}

/// Vx |= Vy
pub fn or(op: &Opcode, state: &State, _keys: &Keypad) -> Outcome {
    set_vx(op, state, state.v[op.vx()] | state.v[op.vy()])
}

/// Vx &= Vy
pub fn and(op: &Opcode, state: &State, _keys: &Keypad) -> Outcome {
    set_vx(op, state, state.v[op.vx()] & state.v[op.vy()])
}

/// Vx ^= Vy
pub fn xor(op: &Opcode, state: &State, _keys: &Keypad) -> Outcome {
    set_vx(op, state, state.v[op.vx()] ^ state.v[op.vy()])
}

/// Vx += Vy; VF = overflow
pub fn add_reg(op: &Opcode, state: &State, _keys: &Keypad) -> Outcome {
    let (res, over) = state.v[op.vx()].overflowing_add(state.v[op.vy()]);
    set_vx_flag(op, state, res, over)
}

/// Vx -= Vy; VF = !underflow
pub fn sub(op: &Opcode, state: &State, _keys: &Keypad) -> Outcome {
    let (res, under) = state.v[op.vx()].overflowing_sub(state.v[op.vy()]);
    set_vx_flag(op, state, res, !under)
}

/// Vx >>= 1; VF = shifted out bit
pub fn shr(op: &Opcode, state: &State, _keys: &Keypad) -> Outcome {
    let vx = state.v[op.vx()];
    set_vx_flag(op, state, vx >> 1, vx & 0x1 == 0x1)
}

/// Vx = Vy - Vx; VF = !underflow
pub fn subn(op: &Opcode, state: &State, _keys: &Keypad) -> Outcome {
    let (res, under) = state.v[op.vy()].overflowing_sub(state.v[op.vx()]);
    set_vx_flag(op, state, res, !under)
}

/// Vx <<= 1; VF = shifted out bit
pub fn shl(op: &Opcode, state: &State, _keys: &Keypad) -> Outcome {
    let vx = state.v[op.vx()];
    set_vx_flag(op, state, vx << 1, vx & 0x80 == 0x80)
}

/// I = nnn
pub fn load_i(op: &Opcode, state: &State, _keys: &Keypad) -> Outcome {
    Ok(State { i: op.nnn, ..*state })
}

/// PC = V0 + nnn
pub fn jump_v0(op: &Opcode, state: &State, _keys: &Keypad) -> Outcome {
    Ok(State {
        pc: u16::from(state.v[0x0]) + op.nnn,
        ..*state
    })
}

/// Vx = rand_byte & nn
pub fn rand(op: &Opcode, state: &State, _keys: &Keypad) -> Outcome {
    let rand_byte: u8 = rand::random();
    set_vx(op, state, rand_byte & op.nn)
}

/// draw_sprite(x=Vx y=Vy height=n)
/// XORs the sprite at memory i..i+n onto the FrameBuffer at (Vx mod 64, Vy mod 32).
///
/// Sprites are clipped, not wrapped: columns past the right edge and rows past the
/// bottom edge are dropped, as are rows whose sprite byte would lie outside memory.
/// VF is set if any pixel was turned off.
pub fn draw(op: &Opcode, state: &State, _keys: &Keypad) -> Outcome {
    let mut v = state.v;
    let mut frame_buffer = state.frame_buffer;

    let origin_x = usize::from(state.v[op.vx()]) % DISPLAY_WIDTH;
    let origin_y = usize::from(state.v[op.vy()]) % DISPLAY_HEIGHT;

    // Reset the carry flag (used for collision detection)
    v[0xF] = 0x0;

    for row in 0..usize::from(op.n) {
        let addr = usize::from(state.i) + row;
        let y = origin_y + row;
        if addr >= MEMORY_SIZE || y >= DISPLAY_HEIGHT {
            break;
        }

        let sprite_byte = state.memory[addr];
        for col in 0..8 {
            let x = origin_x + col;
            if x >= DISPLAY_WIDTH {
                break;
            }
            if sprite_byte & (0x80 >> col) != 0 {
                if frame_buffer[y][x] {
                    v[0xF] = 0x1;
                }
                frame_buffer[y][x] ^= true;
            }
        }
    }

    Ok(State {
        v,
        frame_buffer,
        ..*state
    })
}

/// if Vx.pressed then skip
pub fn skip_pressed(op: &Opcode, state: &State, keys: &Keypad) -> Outcome {
    skip_if(keys[usize::from(state.v[op.vx()] & 0xF)], state)
}

/// if !Vx.pressed then skip
pub fn skip_released(op: &Opcode, state: &State, keys: &Keypad) -> Outcome {
    skip_if(!keys[usize::from(state.v[op.vx()] & 0xF)], state)
}

/// Vx = DT
pub fn load_delay(op: &Opcode, state: &State, _keys: &Keypad) -> Outcome {
    set_vx(op, state, state.delay_timer)
}

/// await keypress for Vx
pub fn await_key(op: &Opcode, state: &State, _keys: &Keypad) -> Outcome {
    Ok(State {
        register_needing_key: Some(op.x),
        ..*state
    })
}

/// DT = Vx
pub fn set_delay(op: &Opcode, state: &State, _keys: &Keypad) -> Outcome {
    Ok(State {
        delay_timer: state.v[op.vx()],
        ..*state
    })
}

/// ST = Vx
pub fn set_sound(op: &Opcode, state: &State, _keys: &Keypad) -> Outcome {
    Ok(State {
        sound_timer: state.v[op.vx()],
        ..*state
    })
}

/// I += Vx
pub fn add_i(op: &Opcode, state: &State, _keys: &Keypad) -> Outcome {
    Ok(State {
        i: state.i.wrapping_add(u16::from(state.v[op.vx()])),
        ..*state
    })
}

/// I = address of the font glyph for the low nibble of Vx
pub fn load_glyph(op: &Opcode, state: &State, _keys: &Keypad) -> Outcome {
    Ok(State {
        i: FONT_START + u16::from(state.v[op.vx()] & 0xF) * FONT_GLYPH_SIZE,
        ..*state
    })
}

/// mem[I..I+3] = bcd(Vx)
pub fn bcd(op: &Opcode, state: &State, _keys: &Keypad) -> Outcome {
    let vx = state.v[op.vx()];
    let range = memory_range(state, 3)?;
    let mut memory = state.memory;
    memory[range].copy_from_slice(&[vx / 100, vx / 10 % 10, vx % 10]);
    Ok(State { memory, ..*state })
}

/// mem[I..=I+x] = V0..=Vx
pub fn store(op: &Opcode, state: &State, _keys: &Keypad) -> Outcome {
    let range = memory_range(state, op.vx() + 1)?;
    let mut memory = state.memory;
    memory[range].copy_from_slice(&state.v[..=op.vx()]);
    Ok(State { memory, ..*state })
}

/// V0..=Vx = mem[I..=I+x]
pub fn read(op: &Opcode, state: &State, _keys: &Keypad) -> Outcome {
    let range = memory_range(state, op.vx() + 1)?;
    let mut v = state.v;
    v[..=op.vx()].copy_from_slice(&state.memory[range]);
    Ok(State { v, ..*state })
}
