/*!
 * Trap Scripts
 * JSON descriptions of a trap sequence, replayed against a `FlatMachine`
 *
 * A script stands in for a user program: it preloads user memory and
 * lists the traps the program would raise, in order.
 */

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

use crate::core::limits::DEFAULT_MEMORY_SIZE;
use crate::core::types::{Address, Word};
use crate::machine::{FlatMachine, Machine, MachineError, Register};
use crate::monitoring::TrapStats;
use crate::syscalls::{ExceptionType, HaltReason, Kernel, SyscallNumber, TrapOutcome};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("failed to read {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("invalid trap script: {0}")]
    Parse(String),

    #[error("trap {index} has {count} arguments, at most 4 fit in registers")]
    TooManyArgs { index: usize, count: usize },

    #[error("trap {index} names neither a call nor a number")]
    MissingCall { index: usize },

    #[error("preload at {addr:#x} failed: {source}")]
    Preload {
        addr: Address,
        #[source]
        source: MachineError,
    },
}

/// Bytes placed in user memory before the first trap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preload {
    pub addr: Address,
    /// Stored with a trailing NUL
    #[serde(default)]
    pub text: Option<String>,
    /// Stored as-is
    #[serde(default)]
    pub bytes: Option<Vec<u8>>,
}

impl Preload {
    fn payload(&self) -> Vec<u8> {
        let mut payload = Vec::new();
        if let Some(text) = &self.text {
            payload.extend_from_slice(text.as_bytes());
            payload.push(0);
        }
        if let Some(bytes) = &self.bytes {
            payload.extend_from_slice(bytes);
        }
        payload
    }
}

/// One trap raised by the scripted program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedTrap {
    #[serde(default = "default_exception")]
    pub exception: ExceptionType,
    /// Named syscall; takes precedence over `number`
    #[serde(default)]
    pub call: Option<SyscallNumber>,
    /// Raw call number, for exercising unknown calls
    #[serde(default)]
    pub number: Option<Word>,
    #[serde(default)]
    pub args: Vec<Word>,
}

fn default_exception() -> ExceptionType {
    ExceptionType::Syscall
}

fn default_memory_size() -> usize {
    DEFAULT_MEMORY_SIZE
}

/// A complete script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrapScript {
    #[serde(default = "default_memory_size")]
    pub memory_size: usize,
    #[serde(default)]
    pub initial_pc: Word,
    #[serde(default)]
    pub memory: Vec<Preload>,
    pub traps: Vec<ScriptedTrap>,
}

/// What happened to one scripted trap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrapRecord {
    pub index: usize,
    pub exception: ExceptionType,
    pub call_number: Word,
    pub outcome: TrapOutcome,
    /// Result register after the trap
    pub result: Word,
    pub pc: Word,
}

/// Summary of a script run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptReport {
    pub records: Vec<TrapRecord>,
    pub halted: Option<HaltReason>,
    pub stats: TrapStats,
}

impl TrapScript {
    pub fn from_json(text: &str) -> Result<Self, ScriptError> {
        let script: Self = serde_json::from_str(text).map_err(|e| ScriptError::Parse(e.to_string()))?;
        script.validate()?;
        Ok(script)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ScriptError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<(), ScriptError> {
        for (index, trap) in self.traps.iter().enumerate() {
            if trap.args.len() > Register::ARGS.len() {
                return Err(ScriptError::TooManyArgs {
                    index,
                    count: trap.args.len(),
                });
            }
            if trap.exception == ExceptionType::Syscall && trap.call.is_none() && trap.number.is_none() {
                return Err(ScriptError::MissingCall { index });
            }
        }
        Ok(())
    }

    /// Build the machine image described by the script
    pub fn machine(&self) -> Result<FlatMachine, ScriptError> {
        let mut machine = FlatMachine::with_memory(self.memory_size);
        machine.set_pc(self.initial_pc);
        for preload in &self.memory {
            machine
                .load_bytes(preload.addr, &preload.payload())
                .map_err(|source| ScriptError::Preload {
                    addr: preload.addr,
                    source,
                })?;
        }
        Ok(machine)
    }

    /// Deliver every trap in order, stopping at the first halt
    pub fn run(&self, kernel: &mut Kernel) -> Result<(ScriptReport, FlatMachine), ScriptError> {
        self.validate()?;
        let mut machine = self.machine()?;
        let mut records = Vec::with_capacity(self.traps.len());

        info!(traps = self.traps.len(), memory_size = self.memory_size, "Running trap script");

        for (index, trap) in self.traps.iter().enumerate() {
            let call_number = trap
                .call
                .map(SyscallNumber::code)
                .or(trap.number)
                .unwrap_or_default();
            machine.load_syscall(call_number, &trap.args);

            let outcome = kernel.handle_trap(&mut machine, trap.exception);
            debug!(index, ?outcome, "Scripted trap delivered");
            records.push(TrapRecord {
                index,
                exception: trap.exception,
                call_number,
                outcome,
                result: machine.read_register(Register::RESULT),
                pc: machine.read_register(Register::PC),
            });

            if outcome.is_halted() {
                break;
            }
        }

        let report = ScriptReport {
            records,
            halted: kernel.halt_reason(),
            stats: kernel.stats().clone(),
        };
        Ok((report, machine))
    }
}
