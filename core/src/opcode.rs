/// # Opcodes
///
/// Chip-8 opcodes are 16 bits each. Their behavior is cased on some combination of:
/// - `(n, _, _, _)` the opcode class; applies to all opcodes
/// - `(_, _, _, n)` specific behavior within a class
/// - `(_, _, n, n)` more specific behavior within a class
///
/// Nibbles not used to determine the operation often (but not always) carry important data.
/// - `(_, n, n, n)` `nnn`, a 12-bit address
/// - `(_, _, n, n)` `nn`, a byte that is assigned to and/or compared with Vx
/// - `(_, n, _, _)` `x`, either the register Vx or the range of registers V0..=Vx
/// - `(_, _, n, _)` `y`, the register Vy
/// - `(_, _, _, n)` `n`, a 4-bit immediate (e.g. sprite height)
///
/// Decoding never fails; every 16-bit word has a decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub word: u16,
    pub class: u8,
    pub x: u8,
    pub y: u8,
    pub n: u8,
    pub nn: u8,
    pub nnn: u16,
}

impl Opcode {
    pub fn decode(word: u16) -> Self {
        Opcode {
            word,
            class: ((word & 0xF000) >> 12) as u8,
            x: ((word & 0x0F00) >> 8) as u8,
            y: ((word & 0x00F0) >> 4) as u8,
            n: (word & 0x000F) as u8,
            nn: (word & 0x00FF) as u8,
            nnn: word & 0x0FFF,
        }
    }

    /// Returns the Opcode's component nibbles.
    pub fn nibbles(&self) -> (u8, u8, u8, u8) {
        (self.class, self.x, self.y, self.n)
    }

    /// Index of register Vx
    pub fn vx(&self) -> usize {
        usize::from(self.x)
    }

    /// Index of register Vy
    pub fn vy(&self) -> usize {
        usize::from(self.y)
    }
}

impl From<u16> for Opcode {
    fn from(word: u16) -> Self {
        Opcode::decode(word)
    }
}
