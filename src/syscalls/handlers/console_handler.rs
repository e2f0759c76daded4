/*!
 * Console Syscall Handler
 * Number, character and string I/O between user programs and the console
 */

use tracing::{debug, error};

use crate::codec::{read_decimal, write_decimal};
use crate::core::limits::{MAX_READ_STRING_LENGTH, READ_CHAR_EOF, READ_NUM_DEFAULT};
use crate::core::types::Word;
use crate::machine::{Machine, Register};
use crate::marshal::{copy_from_user, copy_to_user, user_address, MarshalError};
use crate::syscalls::kernel::Kernel;
use crate::syscalls::types::{HaltReason, HandlerResult, SyscallNumber};

impl Kernel {
    pub(in crate::syscalls) fn sys_read_num(&mut self, machine: &mut dyn Machine) -> HandlerResult {
        let value = match read_decimal(self.console.as_mut()) {
            Ok(number) => number.value(),
            Err(e) => {
                self.recoverable(SyscallNumber::ReadNum, e);
                READ_NUM_DEFAULT
            }
        };

        debug!(value, "Number read from console");
        machine.write_register(Register::RESULT, value);
        Ok(())
    }

    pub(in crate::syscalls) fn sys_print_num(&mut self, machine: &mut dyn Machine) -> HandlerResult {
        let value = machine.read_register(Register::ARG1);
        debug!(value, "Number to print to console");
        write_decimal(self.console.as_mut(), value);
        Ok(())
    }

    pub(in crate::syscalls) fn sys_read_char(&mut self, machine: &mut dyn Machine) -> HandlerResult {
        let c = self.console.get_char();
        debug!(?c, "Char read from console");
        machine.write_register(Register::RESULT, c.map_or(READ_CHAR_EOF, Word::from));
        Ok(())
    }

    pub(in crate::syscalls) fn sys_print_char(&mut self, machine: &mut dyn Machine) -> HandlerResult {
        // Only the low byte carries the character
        let c = machine.read_register(Register::ARG1) as u8;
        debug!(c, "Char to print to console");
        self.console.put_char(c);
        Ok(())
    }

    pub(in crate::syscalls) fn sys_read_string(&mut self, machine: &mut dyn Machine) -> HandlerResult {
        let addr_word = machine.read_register(Register::ARG1);
        let max_len = machine.read_register(Register::ARG2);

        if max_len > MAX_READ_STRING_LENGTH {
            error!(max_len, limit = MAX_READ_STRING_LENGTH, "String length exceeds limit");
            return Err(HaltReason::StringTooLong { requested: max_len });
        }
        let addr = user_address(addr_word).map_err(HaltReason::MemoryFault)?;
        if max_len < 1 {
            self.recoverable(
                SyscallNumber::ReadString,
                format_args!("no room for terminator (max_len {})", max_len),
            );
            return Ok(());
        }

        // Room for max_len - 1 bytes plus the terminator
        let line = self.read_line(max_len as usize - 1);
        debug!(line = %String::from_utf8_lossy(&line), "String read from console");
        copy_to_user(machine, &line, addr, None).map_err(HaltReason::MemoryFault)?;
        Ok(())
    }

    pub(in crate::syscalls) fn sys_print_string(&mut self, machine: &mut dyn Machine) -> HandlerResult {
        let addr = user_address(machine.read_register(Register::ARG1)).map_err(HaltReason::MemoryFault)?;

        match copy_from_user(machine, addr, self.config.max_user_string) {
            Ok(buffer) => {
                debug!(text = %String::from_utf8_lossy(&buffer), "String to print to console");
                self.console.put_bytes(&buffer);
                Ok(())
            }
            Err(e @ MarshalError::LengthExceeded { .. }) => {
                self.recoverable(SyscallNumber::PrintString, e);
                Ok(())
            }
            Err(e) => Err(HaltReason::MemoryFault(e)),
        }
    }

    /// Consume one console line, keeping at most `cap` bytes of it
    ///
    /// The terminating newline is consumed but not kept.
    fn read_line(&mut self, cap: usize) -> Vec<u8> {
        let mut line = Vec::with_capacity(cap);
        while let Some(c) = self.console.get_char() {
            if c == b'\n' {
                break;
            }
            if line.len() < cap {
                line.push(c);
            }
        }
        line
    }
}
