/*!
 * Marshaling Tests
 * Bounded copies across the user/kernel boundary
 */

use pretty_assertions::assert_eq;
use trap_kernel::machine::{FlatMachine, MachineError};
use trap_kernel::marshal::{copy_from_user, copy_to_user, user_address, MarshalError};

#[test]
fn test_copy_from_user_stops_at_terminator() {
    let mut machine = FlatMachine::with_memory(32);
    machine.load_bytes(4, b"abc\0def\0").unwrap();

    assert_eq!(copy_from_user(&machine, 4, 16).unwrap(), b"abc");
    assert_eq!(copy_from_user(&machine, 8, 16).unwrap(), b"def");
    assert_eq!(copy_from_user(&machine, 3, 16).unwrap(), b"");
}

#[test]
fn test_copy_from_user_runs_off_memory() {
    let mut machine = FlatMachine::with_memory(4);
    machine.load_bytes(0, b"abcd").unwrap();

    assert_eq!(
        copy_from_user(&machine, 0, 100),
        Err(MarshalError::Fault(MachineError::AddressOutOfRange { addr: 4, size: 4 }))
    );
}

#[test]
fn test_copy_to_user_terminates() {
    let mut machine = FlatMachine::with_memory(16);
    machine.load_bytes(0, &[0xff; 16]).unwrap();

    assert_eq!(copy_to_user(&mut machine, b"hello", 2, Some(3)).unwrap(), 3);
    assert_eq!(machine.bytes(2, 4).unwrap(), b"hel\0");
    assert_eq!(machine.bytes(6, 1).unwrap(), &[0xff]);

    assert_eq!(copy_to_user(&mut machine, b"hi", 10, None).unwrap(), 2);
    assert_eq!(machine.c_string(10).unwrap(), "hi");
}

#[test]
fn test_user_address() {
    assert_eq!(user_address(12), Ok(12));
    assert_eq!(user_address(-1), Err(MarshalError::BadAddress(-1)));
}
