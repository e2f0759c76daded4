/*!
 * Error Types
 * Centralized error handling with thiserror and miette support
 */

use miette::Diagnostic;
use thiserror::Error;

pub use crate::codec::ParseError;
pub use crate::config::ConfigError;
pub use crate::machine::MachineError;
pub use crate::marshal::MarshalError;
pub use crate::script::ScriptError;
pub use crate::syscalls::FdError;
pub use crate::vfs::VfsError;

/// Unified kernel error type with miette diagnostics
#[derive(Error, Debug, Diagnostic)]
pub enum KernelError {
    #[error("Machine error: {0}")]
    #[diagnostic(
        code(kernel::machine),
        help("The simulated CPU rejected a register or memory access.")
    )]
    Machine(#[from] MachineError),

    #[error("Marshaling error: {0}")]
    #[diagnostic(
        code(kernel::marshal),
        help("A user pointer was invalid or a user string had no terminator within the limit.")
    )]
    Marshal(#[from] MarshalError),

    #[error("Number parse error: {0}")]
    #[diagnostic(
        code(kernel::parse),
        help("Numbers are decimal, optionally prefixed with '-', with no leading zeros.")
    )]
    Parse(#[from] ParseError),

    #[error("File descriptor error: {0}")]
    #[diagnostic(code(kernel::fd))]
    Fd(#[from] FdError),

    #[error("Filesystem error: {0}")]
    #[diagnostic(code(kernel::vfs))]
    Vfs(#[from] VfsError),

    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(kernel::config),
        help("Check KERNEL_* environment variables and the config file.")
    )]
    Config(#[from] ConfigError),

    #[error("Trap script error: {0}")]
    #[diagnostic(code(kernel::script))]
    Script(#[from] ScriptError),

    #[error("Internal error: {0}")]
    #[diagnostic(code(kernel::internal))]
    Internal(String),
}

impl KernelError {
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
