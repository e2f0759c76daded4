/*!
 * Machine Traits
 * Contract the trap boundary expects from the CPU simulator
 */

use super::registers::Register;
use crate::core::types::{Address, Word};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Gateway failures reported by the simulator
#[derive(Error, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "error", content = "details")]
pub enum MachineError {
    #[error("address {addr:#x} is outside user memory ({size} bytes)")]
    AddressOutOfRange { addr: Address, size: usize },
}

pub type MachineResult<T> = Result<T, MachineError>;

/// Typed access to the simulated CPU
///
/// The trap boundary never holds a reference into user memory; every
/// access goes through an explicit address and one byte at a time.
pub trait Machine {
    /// Read a general or special register
    fn read_register(&self, reg: Register) -> Word;

    /// Overwrite a register
    fn write_register(&mut self, reg: Register, value: Word);

    /// Read one byte of user memory
    fn read_byte(&self, addr: Address) -> MachineResult<u8>;

    /// Write one byte of user memory
    fn write_byte(&mut self, addr: Address, value: u8) -> MachineResult<()>;

    /// Stop the machine; no further user instructions run
    fn halt(&mut self);

    /// Whether `halt` has been called
    fn is_halted(&self) -> bool;

    /// Switch the interrupt controller back to kernel mode
    fn enter_system_mode(&mut self) {}
}
