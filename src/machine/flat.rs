/*!
 * Flat Machine
 * Minimal register file plus flat byte array standing in for the simulator
 */

use super::registers::Register;
use super::traits::{Machine, MachineError, MachineResult};
use crate::core::limits::{DEFAULT_MEMORY_SIZE, NUM_TOTAL_REGS};
use crate::core::types::{Address, Word};

/// Flat-memory implementation of [`Machine`]
///
/// Used by the binary and by tests; it performs no address translation.
#[derive(Debug, Clone)]
pub struct FlatMachine {
    registers: [Word; NUM_TOTAL_REGS],
    memory: Vec<u8>,
    halted: bool,
    system_mode: bool,
}

impl FlatMachine {
    pub fn new() -> Self {
        Self::with_memory(DEFAULT_MEMORY_SIZE)
    }

    /// Create a machine with `size` bytes of zeroed user memory
    pub fn with_memory(size: usize) -> Self {
        Self {
            registers: [0; NUM_TOTAL_REGS],
            memory: vec![0; size],
            halted: false,
            system_mode: false,
        }
    }

    /// Set PC, next PC and previous PC as the loader would
    pub fn set_pc(&mut self, pc: Word) {
        self.registers[Register::PREV_PC.index()] = pc.wrapping_sub(4);
        self.registers[Register::PC.index()] = pc;
        self.registers[Register::NEXT_PC.index()] = pc.wrapping_add(4);
    }

    /// Place a syscall number and its arguments in the calling-convention registers
    pub fn load_syscall(&mut self, number: Word, args: &[Word]) {
        self.registers[Register::CALL_NUMBER.index()] = number;
        for (reg, value) in Register::ARGS.iter().zip(args) {
            self.registers[reg.index()] = *value;
        }
    }

    /// Copy `bytes` into memory starting at `addr`
    pub fn load_bytes(&mut self, addr: Address, bytes: &[u8]) -> MachineResult<()> {
        let end = addr
            .checked_add(bytes.len())
            .filter(|end| *end <= self.memory.len())
            .ok_or(MachineError::AddressOutOfRange {
                addr,
                size: self.memory.len(),
            })?;
        self.memory[addr..end].copy_from_slice(bytes);
        Ok(())
    }

    /// Borrow `len` bytes of memory starting at `addr`
    pub fn bytes(&self, addr: Address, len: usize) -> MachineResult<&[u8]> {
        addr.checked_add(len)
            .and_then(|end| self.memory.get(addr..end))
            .ok_or(MachineError::AddressOutOfRange {
                addr,
                size: self.memory.len(),
            })
    }

    /// Read the NUL-terminated string at `addr` (lossy UTF-8)
    pub fn c_string(&self, addr: Address) -> MachineResult<String> {
        let tail = self.memory.get(addr..).ok_or(MachineError::AddressOutOfRange {
            addr,
            size: self.memory.len(),
        })?;
        let len = tail.iter().position(|b| *b == 0).unwrap_or(tail.len());
        Ok(String::from_utf8_lossy(&tail[..len]).into_owned())
    }

    pub fn memory_size(&self) -> usize {
        self.memory.len()
    }

    pub fn in_system_mode(&self) -> bool {
        self.system_mode
    }

    fn check(&self, addr: Address) -> MachineResult<()> {
        if addr < self.memory.len() {
            Ok(())
        } else {
            Err(MachineError::AddressOutOfRange {
                addr,
                size: self.memory.len(),
            })
        }
    }
}

impl Default for FlatMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine for FlatMachine {
    #[inline]
    fn read_register(&self, reg: Register) -> Word {
        self.registers[reg.index()]
    }

    #[inline]
    fn write_register(&mut self, reg: Register, value: Word) {
        self.registers[reg.index()] = value;
    }

    fn read_byte(&self, addr: Address) -> MachineResult<u8> {
        self.check(addr)?;
        Ok(self.memory[addr])
    }

    fn write_byte(&mut self, addr: Address, value: u8) -> MachineResult<()> {
        self.check(addr)?;
        self.memory[addr] = value;
        Ok(())
    }

    fn halt(&mut self) {
        self.halted = true;
    }

    fn is_halted(&self) -> bool {
        self.halted
    }

    fn enter_system_mode(&mut self) {
        self.system_mode = true;
    }
}
