/*!
 * Codec Tests
 * Decimal parsing and formatting through the console
 */

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use trap_kernel::codec::{format_decimal, parse_decimal, read_decimal, write_decimal, ParseError};
use trap_kernel::BufferConsole;

#[test]
fn test_rejections() {
    assert_eq!(parse_decimal(b""), Err(ParseError::Empty));
    assert_eq!(parse_decimal(b"-"), Err(ParseError::Empty));
    assert_eq!(parse_decimal(b"007"), Err(ParseError::MalformedLeadingZero));
    assert_eq!(parse_decimal(b"-0"), Err(ParseError::MalformedLeadingZero));
    assert_eq!(parse_decimal(b"12a"), Err(ParseError::InvalidDigit(b'a')));
    assert_eq!(parse_decimal(b"2147483648"), Err(ParseError::OutOfRange));
    assert_eq!(parse_decimal(b"-2147483649"), Err(ParseError::OutOfRange));
}

#[test]
fn test_console_tokens() {
    let mut console = BufferConsole::with_input("12\t-5 99999999999999 3");

    assert_eq!(read_decimal(&mut console).map(i32::from), Ok(12));
    assert_eq!(read_decimal(&mut console).map(i32::from), Ok(-5));
    assert_eq!(read_decimal(&mut console), Err(ParseError::OutOfRange));
}

#[test]
fn test_write_to_console() {
    let console = BufferConsole::new();
    let mut writer = console.clone();
    write_decimal(&mut writer, -907);
    write_decimal(&mut writer, i32::MIN);
    assert_eq!(console.output_string(), "-907-2147483648");
}

proptest! {
    #[test]
    fn prop_format_matches_std(value in any::<i32>()) {
        prop_assert_eq!(format_decimal(value), value.to_string());
    }

    #[test]
    fn prop_parse_inverts_format(value in any::<i32>()) {
        let text = format_decimal(value);
        prop_assert_eq!(parse_decimal(text.as_bytes()).map(i32::from), Ok(value));
    }

    #[test]
    fn prop_console_reads_printed_numbers(values in proptest::collection::vec(any::<i32>(), 1..8)) {
        let mut reader = BufferConsole::new();
        for v in &values {
            reader.push_input(format!("{} ", format_decimal(*v)));
        }
        for v in &values {
            prop_assert_eq!(read_decimal(&mut reader).map(i32::from), Ok(*v));
        }
    }
}
