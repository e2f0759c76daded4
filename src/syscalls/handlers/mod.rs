/*!
 * Syscall Handlers Module
 * Per-category syscall implementations on `Kernel`
 */

mod console_handler;
mod fd_handler;
mod system_handler;
