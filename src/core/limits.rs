/*!
 * System Limits and Constants
 *
 * Centralized location for the trap boundary's fixed sizes, sentinels and
 * calling-convention numbers. Values the operator may tune at runtime have a
 * `DEFAULT_` prefix and are overridden through `KernelConfig`.
 */

use super::types::{FileId, Word};

// =============================================================================
// MACHINE LAYOUT
// =============================================================================

/// Every instruction is one 4-byte word
pub const INSTRUCTION_WIDTH: Word = 4;

/// Number of register slots exposed by the simulated CPU
pub const NUM_TOTAL_REGS: usize = 40;

/// Default size of the user memory image used by `FlatMachine` (64KB)
pub const DEFAULT_MEMORY_SIZE: usize = 64 * 1024;

// =============================================================================
// MARSHALING LIMITS
// =============================================================================

/// Maximum bytes scanned when copying a C string out of user memory (4KB)
/// [SECURITY] The address comes from an untrusted program
pub const DEFAULT_MAX_USER_STRING: usize = 4096;

/// Ceiling on the `maxLen` argument of ReadString
/// Requests above this halt the machine
pub const MAX_READ_STRING_LENGTH: i32 = 255;

/// Maximum bytes a single Read syscall may request (64KB)
/// [SECURITY] Bounds the kernel scratch buffer
pub const DEFAULT_MAX_READ_SIZE: usize = 64 * 1024;

// =============================================================================
// NUMERIC CODEC
// =============================================================================

/// Longest canonical decimal `i32` token, sign included ("-2147483648")
pub const MAX_NUMBER_TOKEN: usize = 11;

/// Literal text of `i32::MIN`; its magnitude has no positive `i32`
pub const MIN_I32_TEXT: &str = "-2147483648";

// =============================================================================
// FILE DESCRIPTORS
// =============================================================================

/// Default descriptor table capacity (one live handle)
pub const DEFAULT_MAX_OPEN_FILES: usize = 1;

/// Id reported for every failed Open/Close/Read; never a valid id
pub const FD_ERROR: FileId = -1;

/// Result written by Close on success
pub const CLOSE_OK: Word = 0;

// =============================================================================
// CONSOLE
// =============================================================================

/// Result written by ReadChar when the console has no more input
pub const READ_CHAR_EOF: Word = -1;

/// Result written by ReadNum for any malformed token
pub const READ_NUM_DEFAULT: Word = 0;

/// Default host directory backing Open/Read
pub const DEFAULT_STORAGE_PATH: &str = "/tmp/trap-kernel-storage";
