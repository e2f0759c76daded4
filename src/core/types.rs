/*!
 * Core Types
 * Common types used across the trap boundary
 */

/// Raw contents of one simulated CPU register
pub type Word = i32;

/// Byte address inside the user memory image
pub type Address = usize;

/// Open file identifier handed to user programs
pub type FileId = i32;

/// Common result type for kernel operations
pub type KernelResult<T> = Result<T, super::errors::KernelError>;
