/*!
 * Trap Statistics
 * Counters for traps handled by one kernel instance
 */

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Running counts, serializable for end-of-run summaries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrapStats {
    /// Every trap delivered, including ones refused after a halt
    pub traps: u64,
    /// Syscalls that resumed user execution
    pub syscalls_completed: u64,
    /// Invocations per syscall name
    pub by_syscall: BTreeMap<String, u64>,
    /// Syscalls that resumed with a sentinel result
    pub recoverable_errors: u64,
    /// Hardware exceptions other than the informational one
    pub exceptions: u64,
    /// Times the machine was halted
    pub halts: u64,
}

impl TrapStats {
    pub fn record_trap(&mut self) {
        self.traps += 1;
    }

    pub fn record_syscall(&mut self, name: &str) {
        *self.by_syscall.entry(name.to_string()).or_insert(0) += 1;
    }

    pub fn record_completed(&mut self) {
        self.syscalls_completed += 1;
    }

    pub fn record_recoverable(&mut self) {
        self.recoverable_errors += 1;
    }

    pub fn record_exception(&mut self) {
        self.exceptions += 1;
    }

    pub fn record_halt(&mut self) {
        self.halts += 1;
    }

    /// Invocations of one syscall
    pub fn count(&self, name: &str) -> u64 {
        self.by_syscall.get(name).copied().unwrap_or(0)
    }
}
