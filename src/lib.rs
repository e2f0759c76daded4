/*!
 * Trap Kernel Library
 * Exception dispatch and system call services for a simulated MIPS machine
 */

pub mod codec;
pub mod config;
pub mod console;
pub mod core;
pub mod machine;
pub mod marshal;
pub mod monitoring;
pub mod script;
pub mod syscalls;
pub mod vfs;

// Re-exports
pub use codec::{format_decimal, parse_decimal, ParseError, ParsedNumber};
pub use config::KernelConfig;
pub use console::{BufferConsole, Console, StdConsole};
pub use crate::core::errors::*;
pub use crate::core::types::*;
pub use machine::{FlatMachine, Machine, Register};
pub use monitoring::{init_tracing, TrapStats};
pub use script::{ScriptReport, TrapScript};
pub use syscalls::{
    advance_program_counter, ExceptionType, FdTable, HaltReason, Kernel, KernelBuilder,
    SyscallNumber, TrapOutcome,
};
pub use vfs::{FileSystem, LocalFS, MemFS, OpenFile};
