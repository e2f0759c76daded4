/*!
 * Register Names
 * Calling-convention slots of the simulated MIPS register file
 */

use crate::core::limits::NUM_TOTAL_REGS;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Raw index with no slot in the register file
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("register index {0} is outside the register file")]
pub struct InvalidRegister(pub usize);

/// Index of one slot in the register file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct Register(usize);

impl Register {
    /// Syscall number on entry
    pub const CALL_NUMBER: Register = Register(2);
    /// Syscall result on exit (shares the call-number slot)
    pub const RESULT: Register = Register(2);
    pub const ARG1: Register = Register(4);
    pub const ARG2: Register = Register(5);
    pub const ARG3: Register = Register(6);
    pub const ARG4: Register = Register(7);
    /// Current program counter
    pub const PC: Register = Register(34);
    /// Next program counter, for branch-delay semantics
    pub const NEXT_PC: Register = Register(35);
    /// Previous program counter (debugging only)
    pub const PREV_PC: Register = Register(36);

    /// Argument slots in call order
    pub const ARGS: [Register; 4] = [Self::ARG1, Self::ARG2, Self::ARG3, Self::ARG4];

    /// Build a register from a raw index, if the CPU has that slot
    pub const fn new(index: usize) -> Option<Self> {
        if index < NUM_TOTAL_REGS {
            Some(Self(index))
        } else {
            None
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl TryFrom<usize> for Register {
    type Error = InvalidRegister;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::new(index).ok_or(InvalidRegister(index))
    }
}

impl From<Register> for usize {
    fn from(reg: Register) -> Self {
        reg.0
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::PC => write!(f, "pc"),
            Self::NEXT_PC => write!(f, "next_pc"),
            Self::PREV_PC => write!(f, "prev_pc"),
            Self(n) => write!(f, "r{}", n),
        }
    }
}
