/*!
 * System Syscall Handler
 * Halt, Add and RandomNum
 */

use rand::Rng;
use tracing::{debug, info};

use crate::machine::{Machine, Register};
use crate::syscalls::kernel::Kernel;
use crate::syscalls::types::{HaltReason, HandlerResult};

impl Kernel {
    pub(in crate::syscalls) fn sys_halt(&mut self) -> HandlerResult {
        info!("Shutdown, initiated by user program");
        Err(HaltReason::UserHalt)
    }

    pub(in crate::syscalls) fn sys_add(&mut self, machine: &mut dyn Machine) -> HandlerResult {
        let a = machine.read_register(Register::ARG1);
        let b = machine.read_register(Register::ARG2);
        let sum = a.wrapping_add(b);

        debug!(a, b, sum, "Add");
        machine.write_register(Register::RESULT, sum);
        Ok(())
    }

    pub(in crate::syscalls) fn sys_random_num(&mut self, machine: &mut dyn Machine) -> HandlerResult {
        let value = self.rng.gen_range(1..=i32::MAX);

        debug!(value, "RandomNum");
        machine.write_register(Register::RESULT, value);
        Ok(())
    }
}
