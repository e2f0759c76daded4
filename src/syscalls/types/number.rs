/*!
 * Syscall Numbers
 * Closed set of call numbers recognized at the trap boundary
 */

use crate::core::types::Word;
use serde::{Deserialize, Serialize};
use std::fmt;

/// System calls the kernel implements
///
/// Numbers follow the user library's `syscall.h`. Anything else is an
/// unrecognized call and halts the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum SyscallNumber {
    Halt = 0,
    Open = 6,
    Read = 7,
    Close = 10,
    Add = 42,
    ReadNum = 43,
    PrintNum = 44,
    RandomNum = 45,
    ReadChar = 46,
    PrintChar = 47,
    ReadString = 48,
    PrintString = 49,
}

impl SyscallNumber {
    pub const ALL: [SyscallNumber; 12] = [
        Self::Halt,
        Self::Open,
        Self::Read,
        Self::Close,
        Self::Add,
        Self::ReadNum,
        Self::PrintNum,
        Self::RandomNum,
        Self::ReadChar,
        Self::PrintChar,
        Self::ReadString,
        Self::PrintString,
    ];

    #[inline]
    pub const fn code(self) -> Word {
        self as Word
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Halt => "halt",
            Self::Open => "open",
            Self::Read => "read",
            Self::Close => "close",
            Self::Add => "add",
            Self::ReadNum => "read_num",
            Self::PrintNum => "print_num",
            Self::RandomNum => "random_num",
            Self::ReadChar => "read_char",
            Self::PrintChar => "print_char",
            Self::ReadString => "read_string",
            Self::PrintString => "print_string",
        }
    }
}

impl TryFrom<Word> for SyscallNumber {
    /// The unrecognized number
    type Error = Word;

    fn try_from(code: Word) -> Result<Self, Self::Error> {
        Self::ALL
            .iter()
            .copied()
            .find(|n| n.code() == code)
            .ok_or(code)
    }
}

impl fmt::Display for SyscallNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.code())
    }
}
