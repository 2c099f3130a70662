use crate::constants::STACK_CAPACITY;
use crate::error::Fault;

/// # Call Stack
/// Fixed-capacity storage for subroutine return addresses.
///
/// `len` is the number of occupied slots and never exceeds `STACK_CAPACITY`;
/// pushing onto a full stack or popping an empty one is reported as a `Fault`
/// and leaves the stack untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallStack {
    slots: [u16; STACK_CAPACITY],
    len: usize,
}

impl CallStack {
    pub fn new() -> Self {
        CallStack {
            slots: [0; STACK_CAPACITY],
            len: 0,
        }
    }

    pub fn push(&mut self, addr: u16) -> Result<(), Fault> {
        if self.len == STACK_CAPACITY {
            return Err(Fault::StackOverflow);
        }
        self.slots[self.len] = addr;
        self.len += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16, Fault> {
        if self.len == 0 {
            return Err(Fault::StackUnderflow);
        }
        self.len -= 1;
        Ok(self.slots[self.len])
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The most recently pushed return address
    pub fn peek(&self) -> Option<u16> {
        self.len.checked_sub(1).map(|top| self.slots[top])
    }
}

impl Default for CallStack {
    fn default() -> Self {
        Self::new()
    }
}
