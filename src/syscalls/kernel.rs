/*!
 * Trap Dispatcher
 * Routes CPU traps to syscall handlers and resumes or halts the machine
 *
 * Handling is synchronous and non-reentrant: `handle_trap` borrows the
 * kernel and the machine mutably, so one trap runs to completion (resume
 * or halt) before another can be delivered.
 */

use std::fmt;
use std::sync::Arc;

use rand::rngs::StdRng;
use tracing::{debug, error, warn};

use super::fd::FdTable;
use super::kernel_builder::KernelBuilder;
use super::types::{DispatchState, ExceptionType, HaltReason, HandlerResult, SyscallNumber, TrapOutcome};
use crate::config::KernelConfig;
use crate::console::Console;
use crate::core::limits::INSTRUCTION_WIDTH;
use crate::machine::{Machine, Register};
use crate::monitoring::{TrapSpan, TrapStats};
use crate::vfs::FileSystem;

/// Kernel-side state of the trap boundary for one execution
pub struct Kernel {
    pub(super) config: KernelConfig,
    pub(super) console: Box<dyn Console>,
    pub(super) filesystem: Arc<dyn FileSystem>,
    pub(super) fds: FdTable,
    pub(super) rng: StdRng,
    pub(super) state: DispatchState,
    pub(super) halt_reason: Option<HaltReason>,
    pub(super) next_trap_id: u64,
    pub(super) stats: TrapStats,
}

impl Kernel {
    pub fn builder() -> KernelBuilder {
        KernelBuilder::new()
    }

    /// Entry point for every transfer from user mode into the kernel
    pub fn handle_trap(&mut self, machine: &mut dyn Machine, which: ExceptionType) -> TrapOutcome {
        self.stats.record_trap();

        if self.state == DispatchState::Halted {
            warn!(exception = %which, "Trap delivered after halt, ignoring");
            return TrapOutcome::Halted(HaltReason::AlreadyHalted);
        }

        let call_number = machine.read_register(Register::CALL_NUMBER);
        let trap_id = self.next_trap_id;
        self.next_trap_id += 1;

        let span = TrapSpan::new(trap_id, which.name(), call_number);
        let outcome = {
            let _entered = span.enter();
            self.dispatch(machine, which, call_number, &span)
        };
        span.finish(outcome.label());
        outcome
    }

    fn dispatch(
        &mut self,
        machine: &mut dyn Machine,
        which: ExceptionType,
        call_number: i32,
        span: &TrapSpan,
    ) -> TrapOutcome {
        self.transition(DispatchState::Dispatching);
        debug!(exception = %which, call_number, "Received exception");

        let result = match which {
            ExceptionType::NoException => {
                machine.enter_system_mode();
                debug!("Switch to system mode");
                self.transition(DispatchState::Idle);
                return TrapOutcome::Returned;
            }
            ExceptionType::Syscall => match SyscallNumber::try_from(call_number) {
                Ok(number) => {
                    span.record_syscall(number.name());
                    self.stats.record_syscall(number.name());
                    self.transition(DispatchState::Handling);
                    self.handle_syscall(machine, number)
                }
                Err(unknown) => {
                    error!(call_number = unknown, "Unexpected system call {}", unknown);
                    Err(HaltReason::UnknownSyscall(unknown))
                }
            },
            ExceptionType::PageFault
            | ExceptionType::ReadOnly
            | ExceptionType::BusError
            | ExceptionType::AddressError
            | ExceptionType::Overflow
            | ExceptionType::IllegalInstr
            | ExceptionType::NumExceptionTypes => {
                self.stats.record_exception();
                error!(exception = %which, code = which.code(), "Error {} occurs", which.code());
                Err(HaltReason::Exception(which))
            }
        };

        match result {
            Ok(()) => {
                self.transition(DispatchState::Resuming);
                advance_program_counter(machine);
                self.stats.record_completed();
                self.transition(DispatchState::Idle);
                TrapOutcome::Resumed
            }
            Err(reason) => self.halt(machine, reason),
        }
    }

    fn handle_syscall(&mut self, machine: &mut dyn Machine, number: SyscallNumber) -> HandlerResult {
        match number {
            SyscallNumber::Halt => self.sys_halt(),
            SyscallNumber::Add => self.sys_add(machine),
            SyscallNumber::RandomNum => self.sys_random_num(machine),
            SyscallNumber::ReadNum => self.sys_read_num(machine),
            SyscallNumber::PrintNum => self.sys_print_num(machine),
            SyscallNumber::ReadChar => self.sys_read_char(machine),
            SyscallNumber::PrintChar => self.sys_print_char(machine),
            SyscallNumber::ReadString => self.sys_read_string(machine),
            SyscallNumber::PrintString => self.sys_print_string(machine),
            SyscallNumber::Open => self.sys_open(machine),
            SyscallNumber::Close => self.sys_close(machine),
            SyscallNumber::Read => self.sys_read(machine),
        }
    }

    fn halt(&mut self, machine: &mut dyn Machine, reason: HaltReason) -> TrapOutcome {
        self.transition(DispatchState::Halted);
        self.halt_reason = Some(reason);
        self.stats.record_halt();
        machine.halt();
        debug!(%reason, "Machine halted");
        TrapOutcome::Halted(reason)
    }

    fn transition(&mut self, next: DispatchState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal dispatch transition {:?} -> {:?}",
            self.state,
            next
        );
        self.state = next;
    }

    /// Log a syscall-local failure that resumes with a sentinel result
    pub(super) fn recoverable(&mut self, number: SyscallNumber, err: impl fmt::Display) {
        self.stats.record_recoverable();
        warn!(syscall = number.name(), error = %err, "Syscall failed, resuming with sentinel");
    }

    /// Start a new execution: clear the halt and close every file
    pub fn reset(&mut self) {
        self.state = DispatchState::Idle;
        self.halt_reason = None;
        self.fds.clear();
    }

    pub fn state(&self) -> DispatchState {
        self.state
    }

    pub fn halt_reason(&self) -> Option<HaltReason> {
        self.halt_reason
    }

    pub fn is_halted(&self) -> bool {
        self.state == DispatchState::Halted
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    pub fn fds(&self) -> &FdTable {
        &self.fds
    }

    pub fn stats(&self) -> &TrapStats {
        &self.stats
    }
}

impl fmt::Debug for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Kernel")
            .field("state", &self.state)
            .field("halt_reason", &self.halt_reason)
            .field("fds", &self.fds)
            .field("filesystem", &self.filesystem.name())
            .field("stats", &self.stats)
            .finish()
    }
}

/// Move the resumption point one instruction forward
///
/// Records the instruction just executed, the next one, and the one after
/// it for branch-delay semantics.
pub fn advance_program_counter(machine: &mut dyn Machine) {
    let prev = machine.read_register(Register::PC);
    let pc = prev.wrapping_add(INSTRUCTION_WIDTH);
    let next = pc.wrapping_add(INSTRUCTION_WIDTH);

    machine.write_register(Register::PREV_PC, prev);
    machine.write_register(Register::PC, pc);
    machine.write_register(Register::NEXT_PC, next);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::BufferConsole;
    use crate::machine::FlatMachine;

    fn kernel() -> Kernel {
        Kernel::builder()
            .with_console(BufferConsole::new())
            .with_config(KernelConfig::default().with_random_seed(1))
            .build()
            .unwrap()
    }

    #[test]
    fn test_advance_program_counter() {
        let mut machine = FlatMachine::with_memory(16);
        machine.set_pc(0x100);
        advance_program_counter(&mut machine);
        assert_eq!(machine.read_register(Register::PREV_PC), 0x100);
        assert_eq!(machine.read_register(Register::PC), 0x104);
        assert_eq!(machine.read_register(Register::NEXT_PC), 0x108);
    }

    #[test]
    fn test_no_exception_returns_without_resume() {
        let mut kernel = kernel();
        let mut machine = FlatMachine::with_memory(16);
        machine.set_pc(8);

        let outcome = kernel.handle_trap(&mut machine, ExceptionType::NoException);
        assert_eq!(outcome, TrapOutcome::Returned);
        assert_eq!(machine.read_register(Register::PC), 8);
        assert!(machine.in_system_mode());
        assert_eq!(kernel.state(), DispatchState::Idle);
    }

    #[test]
    fn test_hardware_exception_halts() {
        let mut kernel = kernel();
        let mut machine = FlatMachine::with_memory(16);
        machine.set_pc(8);

        let outcome = kernel.handle_trap(&mut machine, ExceptionType::PageFault);
        assert_eq!(
            outcome,
            TrapOutcome::Halted(HaltReason::Exception(ExceptionType::PageFault))
        );
        assert!(machine.is_halted());
        assert_eq!(machine.read_register(Register::PC), 8);
        assert_eq!(kernel.stats().exceptions, 1);
    }

    #[test]
    fn test_halted_is_terminal_until_reset() {
        let mut kernel = kernel();
        let mut machine = FlatMachine::with_memory(16);
        machine.load_syscall(999, &[]);

        assert_eq!(
            kernel.handle_trap(&mut machine, ExceptionType::Syscall),
            TrapOutcome::Halted(HaltReason::UnknownSyscall(999))
        );

        machine.load_syscall(SyscallNumber::Add.code(), &[1, 2]);
        assert_eq!(
            kernel.handle_trap(&mut machine, ExceptionType::Syscall),
            TrapOutcome::Halted(HaltReason::AlreadyHalted)
        );
        assert_eq!(kernel.halt_reason(), Some(HaltReason::UnknownSyscall(999)));

        kernel.reset();
        assert_eq!(
            kernel.handle_trap(&mut machine, ExceptionType::Syscall),
            TrapOutcome::Resumed
        );
        assert_eq!(machine.read_register(Register::RESULT), 3);
    }
}
