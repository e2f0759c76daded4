/*!
 * Syscalls Module
 * Trap dispatch, syscall handlers and the descriptor table
 */

mod fd;
mod handlers;
mod kernel;
mod kernel_builder;
mod types;

// Re-export public API
pub use fd::{FdError, FdTable};
pub use kernel::{advance_program_counter, Kernel};
pub use kernel_builder::KernelBuilder;
pub use types::{DispatchState, ExceptionType, HaltReason, HandlerResult, SyscallNumber, TrapOutcome};
