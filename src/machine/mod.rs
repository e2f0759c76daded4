/*!
 * Machine Module
 * Register/Memory gateway consumed by the trap boundary
 */

mod flat;
mod registers;
mod traits;

pub use flat::FlatMachine;
pub use registers::{InvalidRegister, Register};
pub use traits::{Machine, MachineError, MachineResult};
