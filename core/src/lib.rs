pub use chip8::{Chip8, RunState};
pub use config::Config;
pub use error::{Fault, LoadError};
pub use opcode::Opcode;
pub use run::{run, Frontend, InputEvent, Scheduler};
pub use stack::CallStack;
pub use state::{FrameBuffer, Keypad, State};

mod chip8;
pub mod config;
pub mod constants;
mod error;
mod instruction;
mod opcode;
mod operations;
mod run;
mod stack;
pub mod state;
