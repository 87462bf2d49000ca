//! # Code Value Codec
//!
//! Per-digit conversion between a byte and its rendering in the code
//! matrix. Every byte is shown with a fixed number of digits for the active
//! [`CodeType`], and typing replaces one digit at a time.
//!
//! Decimal needs extra care: three decimal digits can express 0..=999 but a
//! byte only holds 0..=255, so substitutions that overflow are folded back:
//!
//! ```text
//! offset 0 (hundreds)   result > 255  →  200
//! offset 1/2 (tens/units) result > 255  →  result - 200
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Numeric base used to render bytes in the code matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CodeType {
    Binary,
    Octal,
    Decimal,
    #[default]
    Hexadecimal,
}

impl CodeType {
    pub const ALL: [CodeType; 4] = [
        CodeType::Binary,
        CodeType::Octal,
        CodeType::Decimal,
        CodeType::Hexadecimal,
    ];

    pub fn base(self) -> u32 {
        match self {
            CodeType::Binary => 2,
            CodeType::Octal => 8,
            CodeType::Decimal => 10,
            CodeType::Hexadecimal => 16,
        }
    }

    /// Digits needed to show any byte value
    pub fn max_digits(self) -> usize {
        match self {
            CodeType::Binary => 8,
            CodeType::Octal => 3,
            CodeType::Decimal => 3,
            CodeType::Hexadecimal => 2,
        }
    }

    /// Weight of the digit at `offset` (base^(digits - 1 - offset))
    fn digit_weight(self, offset: usize) -> u32 {
        self.base().pow((self.max_digits() - 1 - offset) as u32)
    }
}

/// Letter case used for digits above 9
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CodeCharactersCase {
    Lower,
    #[default]
    Upper,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Digit value {value} is not valid in base {base}")]
    InvalidDigit { value: u8, base: u32 },

    #[error("Code offset {offset} is out of range for {code_type:?}")]
    InvalidCodeOffset { offset: usize, code_type: CodeType },
}

fn check_offset(offset: usize, code_type: CodeType) -> Result<(), CodecError> {
    if offset >= code_type.max_digits() {
        return Err(CodecError::InvalidCodeOffset { offset, code_type });
    }
    Ok(())
}

/// Render a byte as left-padded digits
pub fn byte_to_digits(byte: u8, code_type: CodeType, case: CodeCharactersCase) -> Vec<char> {
    (0..code_type.max_digits())
        .map(|offset| {
            let digit = u32::from(digit_of(byte, offset, code_type));
            let ch = char::from_digit(digit, code_type.base()).unwrap_or('?');
            match case {
                CodeCharactersCase::Lower => ch,
                CodeCharactersCase::Upper => ch.to_ascii_uppercase(),
            }
        })
        .collect()
}

/// Value of the digit at `offset`
///
/// Offsets past the last digit read as 0.
pub fn digit_of(byte: u8, offset: usize, code_type: CodeType) -> u8 {
    if offset >= code_type.max_digits() {
        return 0;
    }
    ((u32::from(byte) / code_type.digit_weight(offset)) % code_type.base()) as u8
}

/// Value carried by the digits at `offset` and after it
///
/// This is the part of a byte that gets split off when a digit is inserted
/// in the middle of it.
pub fn trailing_value(byte: u8, offset: usize, code_type: CodeType) -> u8 {
    if offset == 0 {
        return byte;
    }
    if offset >= code_type.max_digits() {
        return 0;
    }
    let modulus = code_type.digit_weight(offset) * code_type.base();
    (u32::from(byte) % modulus) as u8
}

/// Fail unless `value` is a digit that can be written at `offset`
pub fn check_digit(value: u8, offset: usize, code_type: CodeType) -> Result<(), CodecError> {
    if u32::from(value) >= code_type.base() {
        return Err(CodecError::InvalidDigit {
            value,
            base: code_type.base(),
        });
    }
    check_offset(offset, code_type)
}

/// Replace one digit of `byte`
pub fn set_digit(
    byte: u8,
    value: u8,
    offset: usize,
    code_type: CodeType,
) -> Result<u8, CodecError> {
    check_digit(value, offset, code_type)?;

    let result = match code_type {
        CodeType::Binary => {
            let bit = 7 - offset;
            (byte & !(1 << bit)) | (value << bit)
        }
        CodeType::Hexadecimal => match offset {
            0 => (byte & 0x0F) | (value << 4),
            _ => (byte & 0xF0) | value,
        },
        CodeType::Octal => {
            // A leading digit above 3 does not fit; the value wraps to a byte.
            let current = u32::from(byte);
            let value = u32::from(value);
            let updated = match offset {
                0 => (current & 0x3F) + value * 64,
                1 => (current & 0xC7) | (value << 3),
                _ => (current & 0xF8) | value,
            };
            (updated & 0xFF) as u8
        }
        CodeType::Decimal => {
            let current = u32::from(byte);
            let value = u32::from(value);
            let updated = match offset {
                0 => {
                    let updated = (current % 100) + value * 100;
                    if updated > 255 {
                        200
                    } else {
                        updated
                    }
                }
                1 => {
                    let updated = (current / 100) * 100 + value * 10 + current % 10;
                    if updated > 255 {
                        updated - 200
                    } else {
                        updated
                    }
                }
                _ => {
                    let updated = (current / 10) * 10 + value;
                    if updated > 255 {
                        updated - 200
                    } else {
                        updated
                    }
                }
            };
            updated as u8
        }
    };

    Ok(result)
}

/// Parse a typed digit character in the given base
pub fn digit_value(ch: char, code_type: CodeType) -> Option<u8> {
    ch.to_digit(code_type.base()).map(|digit| digit as u8)
}

/// Whether `ch` may be typed at `offset`
///
/// The leading decimal digit is limited to 0-2 and the leading octal digit
/// to 0-3, since anything larger cannot start a byte value.
pub fn is_valid_digit_key(ch: char, offset: usize, code_type: CodeType) -> bool {
    if offset >= code_type.max_digits() {
        return false;
    }
    match (code_type, offset) {
        (CodeType::Decimal, 0) => matches!(ch, '0'..='2'),
        (CodeType::Octal, 0) => matches!(ch, '0'..='3'),
        _ => digit_value(ch, code_type).is_some(),
    }
}
