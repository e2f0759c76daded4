/*!
 * Decimal Parsing
 *
 * `i32::MIN` has no positive counterpart, so its magnitude is carried as a
 * distinct tag on the parse result instead of being rebuilt by negation.
 */

use crate::console::Console;
use crate::core::limits::{MAX_NUMBER_TOKEN, MIN_I32_TEXT};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a token is not a canonical decimal `i32`
#[derive(Error, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "error", content = "details")]
pub enum ParseError {
    #[error("no digits")]
    Empty,

    #[error("leading zero")]
    MalformedLeadingZero,

    #[error("invalid digit {0:#04x}")]
    InvalidDigit(u8),

    #[error("out of i32 range")]
    OutOfRange,
}

/// Absolute value of a parsed number
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Magnitude {
    /// Any magnitude that fits in a positive `i32`
    Ordinary(u32),
    /// 2147483648, only reachable with a leading `-`
    Minimum,
}

/// Sign and magnitude of a successfully parsed token
///
/// Deserialized values are checked the same way parsed ones are: ordinary
/// magnitudes fit in a positive `i32`, the minimum tag is negative, and
/// zero has no sign.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "RawParsedNumber")]
pub struct ParsedNumber {
    negative: bool,
    magnitude: Magnitude,
}

/// Unchecked wire form of [`ParsedNumber`]
#[derive(Deserialize)]
struct RawParsedNumber {
    negative: bool,
    magnitude: Magnitude,
}

impl TryFrom<RawParsedNumber> for ParsedNumber {
    type Error = ParseError;

    fn try_from(raw: RawParsedNumber) -> Result<Self, Self::Error> {
        match raw.magnitude {
            Magnitude::Minimum if raw.negative => Ok(Self::MIN),
            Magnitude::Minimum => Err(ParseError::OutOfRange),
            Magnitude::Ordinary(m) if m > i32::MAX.unsigned_abs() => Err(ParseError::OutOfRange),
            Magnitude::Ordinary(0) if raw.negative => Err(ParseError::MalformedLeadingZero),
            Magnitude::Ordinary(_) => Ok(Self {
                negative: raw.negative,
                magnitude: raw.magnitude,
            }),
        }
    }
}

impl ParsedNumber {
    pub const MIN: ParsedNumber = ParsedNumber {
        negative: true,
        magnitude: Magnitude::Minimum,
    };

    /// Tag an `i32` the way the parser would
    pub fn from_value(value: i32) -> Self {
        if value == i32::MIN {
            return Self::MIN;
        }
        Self {
            negative: value < 0,
            magnitude: Magnitude::Ordinary(value.unsigned_abs()),
        }
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.negative
    }

    #[inline]
    pub const fn magnitude(&self) -> Magnitude {
        self.magnitude
    }

    /// Whether this is `i32::MIN`
    #[inline]
    pub const fn is_minimum(&self) -> bool {
        matches!(self.magnitude, Magnitude::Minimum)
    }

    /// The signed value
    pub fn value(&self) -> i32 {
        match self.magnitude {
            Magnitude::Minimum => i32::MIN,
            // Ordinary magnitudes never exceed i32::MAX
            Magnitude::Ordinary(m) => {
                let m = m as i32;
                if self.negative {
                    -m
                } else {
                    m
                }
            }
        }
    }
}

impl From<ParsedNumber> for i32 {
    fn from(n: ParsedNumber) -> Self {
        n.value()
    }
}

/// Token separators that end a number on the console
#[inline]
fn is_separator(c: u8) -> bool {
    matches!(c, b'\n' | b'\r' | b'\t' | b' ')
}

/// Parse a canonical decimal `i32`
///
/// Checks run in order: empty or whitespace-led input, leading zeros
/// (including `-0`), non-digit bytes, then range.
pub fn parse_decimal(raw: &[u8]) -> Result<ParsedNumber, ParseError> {
    let first = match raw.first() {
        None => return Err(ParseError::Empty),
        Some(&c) if is_separator(c) || c.is_ascii_control() => return Err(ParseError::Empty),
        Some(&c) => c,
    };

    let negative = first == b'-';
    let digits = if negative { &raw[1..] } else { raw };
    if digits.is_empty() {
        return Err(ParseError::Empty);
    }

    if digits[0] == b'0' && (negative || digits.get(1).is_some_and(u8::is_ascii_digit)) {
        return Err(ParseError::MalformedLeadingZero);
    }

    if let Some(&bad) = digits.iter().find(|c| !c.is_ascii_digit()) {
        return Err(ParseError::InvalidDigit(bad));
    }

    if negative && raw == MIN_I32_TEXT.as_bytes() {
        return Ok(ParsedNumber::MIN);
    }

    let mut acc: i32 = 0;
    for &d in digits {
        acc = acc
            .checked_mul(10)
            .and_then(|v| v.checked_add(i32::from(d - b'0')))
            .ok_or(ParseError::OutOfRange)?;
    }

    Ok(ParsedNumber {
        negative,
        magnitude: Magnitude::Ordinary(acc as u32),
    })
}

/// Read one token from the console and parse it
///
/// Bytes are taken until a separator, end of input, or one byte past the
/// longest valid token; an over-long token fails as out of range. Input
/// after the cut-off is left for the next read.
pub fn read_decimal(console: &mut dyn Console) -> Result<ParsedNumber, ParseError> {
    let mut token = Vec::with_capacity(MAX_NUMBER_TOKEN + 1);

    while let Some(c) = console.get_char() {
        if is_separator(c) {
            break;
        }
        token.push(c);
        if token.len() > MAX_NUMBER_TOKEN {
            break;
        }
    }

    parse_decimal(&token)
}
