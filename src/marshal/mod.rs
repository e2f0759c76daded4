/*!
 * Marshaling Layer
 * Copies NUL-terminated data across the user/kernel boundary
 *
 * Every access goes through the `Machine` gateway one byte at a time; the
 * kernel never borrows user memory directly. Scans from user memory are
 * bounded because the address comes from an untrusted program.
 */

use crate::core::types::{Address, Word};
use crate::machine::{Machine, MachineError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

/// Failures while moving data across the boundary
#[derive(Error, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "error", content = "details")]
pub enum MarshalError {
    /// The register value cannot be a user address
    #[error("invalid user address {0}")]
    BadAddress(Word),

    /// No terminator within the scan limit
    #[error("user string exceeds {limit} bytes")]
    LengthExceeded { limit: usize },

    /// The gateway rejected an access
    #[error("memory fault: {0}")]
    Fault(#[from] MachineError),
}

pub type MarshalResult<T> = Result<T, MarshalError>;

/// Interpret a raw register value as a user address
pub fn user_address(word: Word) -> MarshalResult<Address> {
    Address::try_from(word).map_err(|_| MarshalError::BadAddress(word))
}

/// Copy the C string at `addr` into a kernel buffer
///
/// Scans at most `limit` bytes for the terminator and returns exactly the
/// bytes before it.
pub fn copy_from_user(
    machine: &dyn Machine,
    addr: Address,
    limit: usize,
) -> MarshalResult<Vec<u8>> {
    let mut len = 0usize;
    loop {
        if len == limit {
            return Err(MarshalError::LengthExceeded { limit });
        }
        let at = addr
            .checked_add(len)
            .ok_or(MarshalError::LengthExceeded { limit })?;
        if machine.read_byte(at)? == 0 {
            break;
        }
        len += 1;
    }

    let mut buf = Vec::with_capacity(len);
    for i in 0..len {
        buf.push(machine.read_byte(addr + i)?);
    }

    trace!(addr, len, "copied string from user");
    Ok(buf)
}

/// Copy `bytes` to user memory at `addr` and terminate it
///
/// Writes `min(bytes.len(), max_len)` bytes followed by one zero byte and
/// returns the number of payload bytes written.
pub fn copy_to_user(
    machine: &mut dyn Machine,
    bytes: &[u8],
    addr: Address,
    max_len: Option<usize>,
) -> MarshalResult<usize> {
    let len = max_len.map_or(bytes.len(), |max| max.min(bytes.len()));
    let end = addr
        .checked_add(len)
        .ok_or(MarshalError::Fault(MachineError::AddressOutOfRange {
            addr,
            size: len,
        }))?;

    for (i, &b) in bytes[..len].iter().enumerate() {
        machine.write_byte(addr + i, b)?;
    }
    machine.write_byte(end, 0)?;

    trace!(addr, len, "copied string to user");
    Ok(len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::FlatMachine;

    #[test]
    fn test_copy_from_user_exact_length() {
        let mut machine = FlatMachine::with_memory(64);
        machine.load_bytes(10, b"hello\0junk").unwrap();

        let bytes = copy_from_user(&machine, 10, 64).unwrap();
        assert_eq!(bytes, b"hello");
        assert_eq!(bytes.capacity(), 5);
    }

    #[test]
    fn test_copy_from_user_empty_string() {
        let machine = FlatMachine::with_memory(8);
        assert!(copy_from_user(&machine, 0, 8).unwrap().is_empty());
    }

    #[test]
    fn test_copy_from_user_limit() {
        let mut machine = FlatMachine::with_memory(64);
        machine.load_bytes(0, b"abcdef\0").unwrap();

        assert_eq!(
            copy_from_user(&machine, 0, 6),
            Err(MarshalError::LengthExceeded { limit: 6 })
        );
        assert_eq!(copy_from_user(&machine, 0, 7).unwrap(), b"abcdef");
    }

    #[test]
    fn test_copy_from_user_runs_off_memory() {
        let mut machine = FlatMachine::with_memory(4);
        machine.load_bytes(0, b"abcd").unwrap();
        assert!(matches!(
            copy_from_user(&machine, 0, 100),
            Err(MarshalError::Fault(_))
        ));
    }

    #[test]
    fn test_copy_to_user_terminates() {
        let mut machine = FlatMachine::with_memory(32);
        machine.load_bytes(0, &[0xFF; 32]).unwrap();

        let written = copy_to_user(&mut machine, b"abc", 4, None).unwrap();
        assert_eq!(written, 3);
        assert_eq!(machine.bytes(4, 4).unwrap(), b"abc\0");
        assert_eq!(machine.read_byte(3).unwrap(), 0xFF);
        assert_eq!(machine.read_byte(8).unwrap(), 0xFF);
    }

    #[test]
    fn test_copy_to_user_respects_max_len() {
        let mut machine = FlatMachine::with_memory(32);
        machine.load_bytes(0, &[0xFF; 32]).unwrap();

        let written = copy_to_user(&mut machine, b"abcdefgh", 0, Some(3)).unwrap();
        assert_eq!(written, 3);
        assert_eq!(machine.bytes(0, 4).unwrap(), b"abc\0");
        // Nothing past requested length + 1
        assert!(machine.bytes(4, 28).unwrap().iter().all(|b| *b == 0xFF));
    }

    #[test]
    fn test_user_address() {
        assert_eq!(user_address(16), Ok(16));
        assert_eq!(user_address(-4), Err(MarshalError::BadAddress(-4)));
    }
}
