/*!
 * Numeric Codec
 * Decimal `i32` parsing from console input and formatting back to text
 */

mod format;
mod parse;

pub use format::{format_decimal, format_parsed, write_decimal};
pub use parse::{parse_decimal, read_decimal, Magnitude, ParseError, ParsedNumber};
