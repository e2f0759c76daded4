/*!
 * Decimal Formatting
 */

use super::parse::{Magnitude, ParsedNumber};
use crate::console::Console;
use crate::core::limits::{MAX_NUMBER_TOKEN, MIN_I32_TEXT};

/// Format an `i32` as canonical decimal text
///
/// `i32::MIN` is emitted from its literal text; negating it would overflow.
pub fn format_decimal(value: i32) -> String {
    if value == i32::MIN {
        return MIN_I32_TEXT.to_string();
    }
    render(value < 0, value.abs() as u32)
}

/// Format a parse result, using its minimum-value tag directly
pub fn format_parsed(number: &ParsedNumber) -> String {
    match number.magnitude() {
        Magnitude::Minimum => MIN_I32_TEXT.to_string(),
        Magnitude::Ordinary(m) => render(number.is_negative() && m != 0, m),
    }
}

/// Write `format_decimal(value)` to the console
pub fn write_decimal(console: &mut dyn Console, value: i32) {
    console.put_bytes(format_decimal(value).as_bytes());
}

fn render(negative: bool, mut magnitude: u32) -> String {
    if magnitude == 0 {
        return "0".to_string();
    }

    // Least significant digit first, reversed on output
    let mut digits = [0u8; MAX_NUMBER_TOKEN];
    let mut n = 0;
    while magnitude > 0 {
        digits[n] = b'0' + (magnitude % 10) as u8;
        magnitude /= 10;
        n += 1;
    }

    let mut out = String::with_capacity(n + 1);
    if negative {
        out.push('-');
    }
    out.extend(digits[..n].iter().rev().map(|&d| d as char));
    out
}
