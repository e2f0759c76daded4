/*!
 * Syscall Types Module
 * Call numbers, exception kinds, dispatch states and trap outcomes
 */

mod exception;
mod number;
mod results;

// Re-export all public types
pub use exception::ExceptionType;
pub use number::SyscallNumber;
pub use results::{DispatchState, HaltReason, HandlerResult, TrapOutcome};
