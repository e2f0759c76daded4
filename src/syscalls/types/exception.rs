/*!
 * Exception Kinds
 * Reasons the simulated CPU transfers control into the kernel
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Trap cause reported by the CPU simulator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ExceptionType {
    /// Informational; control returns to the kernel
    NoException = 0,
    /// Explicit system call
    Syscall = 1,
    /// No valid translation found
    PageFault = 2,
    /// Write to a read-only page
    ReadOnly = 3,
    /// Translation produced an invalid physical address
    BusError = 4,
    /// Unaligned or out-of-range reference
    AddressError = 5,
    /// Integer overflow in add or sub
    Overflow = 6,
    /// Unimplemented or reserved instruction
    IllegalInstr = 7,
    /// Sentinel past the last real kind
    NumExceptionTypes = 8,
}

impl ExceptionType {
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Decode the simulator's numeric cause
    pub const fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => Self::NoException,
            1 => Self::Syscall,
            2 => Self::PageFault,
            3 => Self::ReadOnly,
            4 => Self::BusError,
            5 => Self::AddressError,
            6 => Self::Overflow,
            7 => Self::IllegalInstr,
            8 => Self::NumExceptionTypes,
            _ => return None,
        })
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::NoException => "no_exception",
            Self::Syscall => "syscall",
            Self::PageFault => "page_fault",
            Self::ReadOnly => "read_only",
            Self::BusError => "bus_error",
            Self::AddressError => "address_error",
            Self::Overflow => "overflow",
            Self::IllegalInstr => "illegal_instr",
            Self::NumExceptionTypes => "num_exception_types",
        }
    }
}

impl fmt::Display for ExceptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
