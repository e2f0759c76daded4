/*!
 * File Descriptor Syscall Handler
 * Open, Close and Read through the descriptor table
 */

use tracing::debug;

use crate::core::limits::{CLOSE_OK, FD_ERROR};
use crate::core::types::Word;
use crate::machine::{Machine, Register};
use crate::marshal::{copy_from_user, copy_to_user, user_address, MarshalError};
use crate::syscalls::kernel::Kernel;
use crate::syscalls::types::{HaltReason, HandlerResult, SyscallNumber};

impl Kernel {
    pub(in crate::syscalls) fn sys_open(&mut self, machine: &mut dyn Machine) -> HandlerResult {
        let addr = user_address(machine.read_register(Register::ARG1)).map_err(HaltReason::MemoryFault)?;

        let name = match copy_from_user(machine, addr, self.config.max_user_string) {
            Ok(bytes) => String::from_utf8(bytes),
            Err(e @ MarshalError::LengthExceeded { .. }) => {
                self.recoverable(SyscallNumber::Open, e);
                machine.write_register(Register::RESULT, FD_ERROR);
                return Ok(());
            }
            Err(e) => return Err(HaltReason::MemoryFault(e)),
        };
        let name = match name {
            Ok(name) => name,
            Err(e) => {
                self.recoverable(SyscallNumber::Open, e);
                machine.write_register(Register::RESULT, FD_ERROR);
                return Ok(());
            }
        };

        let result = match self.fds.open(self.filesystem.as_ref(), &name) {
            Ok(id) => {
                debug!(id, name = %name, "Open file complete");
                id
            }
            Err(e) => {
                self.recoverable(SyscallNumber::Open, e);
                FD_ERROR
            }
        };
        machine.write_register(Register::RESULT, result);
        Ok(())
    }

    pub(in crate::syscalls) fn sys_close(&mut self, machine: &mut dyn Machine) -> HandlerResult {
        let id = machine.read_register(Register::ARG1);

        let result = match self.fds.close(id) {
            Ok(()) => CLOSE_OK,
            Err(e) => {
                self.recoverable(SyscallNumber::Close, e);
                FD_ERROR
            }
        };
        machine.write_register(Register::RESULT, result);
        Ok(())
    }

    pub(in crate::syscalls) fn sys_read(&mut self, machine: &mut dyn Machine) -> HandlerResult {
        let buf_word = machine.read_register(Register::ARG1);
        let size = machine.read_register(Register::ARG2);
        let id = machine.read_register(Register::ARG3);

        let result = self.read_into_user(machine, buf_word, size, id)?;
        machine.write_register(Register::RESULT, result);
        Ok(())
    }

    /// Bytes read into user memory, or `FD_ERROR` for a recoverable failure
    fn read_into_user(
        &mut self,
        machine: &mut dyn Machine,
        buf_word: Word,
        size: Word,
        id: Word,
    ) -> Result<Word, HaltReason> {
        if !self.fds.is_open(id) {
            self.recoverable(SyscallNumber::Read, format_args!("file id {} is not open", id));
            return Ok(FD_ERROR);
        }
        let max_read_size = self.config.max_read_size;
        let size = match usize::try_from(size) {
            Ok(size) if size <= max_read_size => size,
            _ => {
                self.recoverable(
                    SyscallNumber::Read,
                    format_args!("size {} outside 0..={}", size, max_read_size),
                );
                return Ok(FD_ERROR);
            }
        };
        let addr = user_address(buf_word).map_err(HaltReason::MemoryFault)?;

        let bytes = match self.fds.read(id, size) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.recoverable(SyscallNumber::Read, e);
                return Ok(FD_ERROR);
            }
        };
        let written = copy_to_user(machine, &bytes, addr, Some(bytes.len())).map_err(HaltReason::MemoryFault)?;

        debug!(id, requested = size, read = written, "Read from file");
        // written <= size <= max_read_size, which came from a Word
        Ok(written as Word)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::config::KernelConfig;
    use crate::console::BufferConsole;
    use crate::machine::{FlatMachine, Machine, Register};
    use crate::syscalls::{ExceptionType, Kernel, SyscallNumber, TrapOutcome};
    use crate::vfs::MemFS;

    fn setup(max_open_files: usize) -> (Kernel, FlatMachine) {
        let fs = MemFS::new();
        fs.insert("notes.txt", "line one\nline two\n");
        fs.insert("other.txt", "xyz");
        let kernel = Kernel::builder()
            .with_console(BufferConsole::new())
            .with_filesystem(Arc::new(fs))
            .with_config(KernelConfig::default().with_max_open_files(max_open_files).with_max_read_size(64))
            .build()
            .unwrap();
        let mut machine = FlatMachine::with_memory(512);
        machine.load_bytes(0, b"notes.txt\0").unwrap();
        machine.load_bytes(16, b"other.txt\0").unwrap();
        machine.load_bytes(32, b"missing.txt\0").unwrap();
        (kernel, machine)
    }

    fn call(kernel: &mut Kernel, machine: &mut FlatMachine, number: SyscallNumber, args: &[i32]) -> i32 {
        machine.load_syscall(number.code(), args);
        assert_eq!(kernel.handle_trap(machine, ExceptionType::Syscall), TrapOutcome::Resumed);
        machine.read_register(Register::RESULT)
    }

    #[test]
    fn test_open_read_close_cycle() {
        let (mut kernel, mut machine) = setup(1);

        let id = call(&mut kernel, &mut machine, SyscallNumber::Open, &[0]);
        assert_eq!(id, 0);
        assert_eq!(kernel.fds().len(), 1);

        let n = call(&mut kernel, &mut machine, SyscallNumber::Read, &[200, 8, id]);
        assert_eq!(n, 8);
        assert_eq!(machine.c_string(200).unwrap(), "line one");

        let n = call(&mut kernel, &mut machine, SyscallNumber::Read, &[200, 64, id]);
        assert_eq!(n, 10);
        assert_eq!(machine.c_string(200).unwrap(), "\nline two\n");

        assert_eq!(call(&mut kernel, &mut machine, SyscallNumber::Read, &[200, 64, id]), 0);

        assert_eq!(call(&mut kernel, &mut machine, SyscallNumber::Close, &[id]), 0);
        assert!(kernel.fds().is_empty());
        assert_eq!(call(&mut kernel, &mut machine, SyscallNumber::Read, &[200, 8, id]), -1);
    }

    #[test]
    fn test_open_missing_leaves_table_unchanged() {
        let (mut kernel, mut machine) = setup(1);
        assert_eq!(call(&mut kernel, &mut machine, SyscallNumber::Open, &[32]), -1);
        assert!(kernel.fds().is_empty());
    }

    #[test]
    fn test_open_when_full() {
        let (mut kernel, mut machine) = setup(1);
        assert_eq!(call(&mut kernel, &mut machine, SyscallNumber::Open, &[0]), 0);
        assert_eq!(call(&mut kernel, &mut machine, SyscallNumber::Open, &[16]), -1);
        assert_eq!(kernel.fds().name_of(0), Some("notes.txt"));
    }

    #[test]
    fn test_multiple_open_files() {
        let (mut kernel, mut machine) = setup(2);
        assert_eq!(call(&mut kernel, &mut machine, SyscallNumber::Open, &[0]), 0);
        assert_eq!(call(&mut kernel, &mut machine, SyscallNumber::Open, &[16]), 1);

        assert_eq!(call(&mut kernel, &mut machine, SyscallNumber::Read, &[300, 3, 1]), 3);
        assert_eq!(machine.c_string(300).unwrap(), "xyz");
    }

    #[test]
    fn test_close_never_opened() {
        let (mut kernel, mut machine) = setup(1);
        assert_eq!(call(&mut kernel, &mut machine, SyscallNumber::Close, &[0]), -1);
        assert_eq!(call(&mut kernel, &mut machine, SyscallNumber::Close, &[-1]), -1);
    }

    #[test]
    fn test_read_rejects_bad_size() {
        let (mut kernel, mut machine) = setup(1);
        call(&mut kernel, &mut machine, SyscallNumber::Open, &[0]);

        assert_eq!(call(&mut kernel, &mut machine, SyscallNumber::Read, &[200, -1, 0]), -1);
        assert_eq!(call(&mut kernel, &mut machine, SyscallNumber::Read, &[200, 65, 0]), -1);
        assert_eq!(kernel.stats().recoverable_errors, 2);
    }

    #[test]
    fn test_read_writes_exactly_bytes_read() {
        let (mut kernel, mut machine) = setup(1);
        call(&mut kernel, &mut machine, SyscallNumber::Open, &[16]);
        machine.load_bytes(400, &[0xAA; 8]).unwrap();

        assert_eq!(call(&mut kernel, &mut machine, SyscallNumber::Read, &[400, 8, 0]), 3);
        assert_eq!(machine.bytes(400, 5).unwrap(), b"xyz\0\xAA");
    }

    #[test]
    fn test_read_size_limit_is_inclusive() {
        let (mut kernel, mut machine) = setup(1);
        call(&mut kernel, &mut machine, SyscallNumber::Open, &[0]);

        assert_eq!(call(&mut kernel, &mut machine, SyscallNumber::Read, &[200, 64, 0]), 18);
        assert_eq!(machine.c_string(200).unwrap(), "line one\nline two\n");
        assert_eq!(call(&mut kernel, &mut machine, SyscallNumber::Read, &[200, 65, 0]), -1);
        assert_eq!(kernel.stats().recoverable_errors, 1);
    }
}
