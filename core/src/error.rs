use thiserror::Error;

use crate::constants::MAX_ROM_SIZE;

/// Reasons a machine can't be constructed from a ROM
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("ROM is empty")]
    EmptyRom,
    #[error("ROM is {size} bytes but at most {max} fit in memory")]
    RomTooLarge { size: usize, max: usize },
    #[error("unable to read ROM: {0}")]
    Io(#[from] std::io::Error),
}

impl LoadError {
    pub(crate) fn too_large(size: usize) -> Self {
        LoadError::RomTooLarge {
            size,
            max: MAX_ROM_SIZE,
        }
    }
}

/// Recoverable runtime faults; the machine pauses instead of executing them
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    #[error("call stack overflow")]
    StackOverflow,
    #[error("return with an empty call stack")]
    StackUnderflow,
    #[error("program counter {0:#05X} is outside of memory")]
    PcOutOfBounds(u16),
    #[error("memory access at {0:#05X} is outside of memory")]
    MemoryOutOfBounds(u16),
}
