//! Variable-length field extension shared by option deltas, option lengths
//! and the token length.
//!
//! A 4-bit nibble carries values up to 12 directly. Nibble 13 adds one
//! extension byte holding `value - 13`, nibble 14 two big-endian bytes
//! holding `value - 269`. Nibble 15 is reserved.

use crate::buffer::{InputBuffer, OutputBuffer};
use crate::error::WireError;

pub const ONE_BYTE_NIBBLE: u8 = 13;
pub const TWO_BYTE_NIBBLE: u8 = 14;
pub const RESERVED_NIBBLE: u8 = 15;

pub const ONE_BYTE_BIAS: usize = 13;
pub const TWO_BYTE_BIAS: usize = 269;

/// Largest value the two-byte extension can carry: 269 + 65535.
pub const MAX_VALUE: usize = 65804;

/// Why a nibble failed to resolve. Callers map both cases onto their
/// contextual [`WireError`].
#[derive(Debug, PartialEq, Eq)]
pub enum ExtError {
    Reserved,
    Truncated,
}

/// Nibble stored in the 4-bit field for `value`.
///
/// Values above [`MAX_VALUE`] are unrepresentable; callers reject them
/// before encoding.
pub fn nibble(value: usize) -> u8 {
    if value < ONE_BYTE_BIAS {
        value as u8
    } else if value < TWO_BYTE_BIAS {
        ONE_BYTE_NIBBLE
    } else {
        TWO_BYTE_NIBBLE
    }
}

/// Number of extension bytes following the nibble for `value`.
pub fn extension_len(value: usize) -> usize {
    if value < ONE_BYTE_BIAS {
        0
    } else if value < TWO_BYTE_BIAS {
        1
    } else {
        2
    }
}

/// Writes the 0, 1 or 2 extension bytes for `value`.
pub fn write_extension(out: &mut OutputBuffer<'_>, value: usize) -> Result<(), WireError> {
    if value < ONE_BYTE_BIAS {
        Ok(())
    } else if value < TWO_BYTE_BIAS {
        out.write_u8((value - ONE_BYTE_BIAS) as u8)
    } else {
        out.write_u16_be((value - TWO_BYTE_BIAS) as u16)
    }
}

/// Resolves a decoded nibble to its value, consuming any extension bytes.
pub fn resolve(nibble: u8, cursor: &mut InputBuffer<'_>) -> Result<usize, ExtError> {
    match nibble {
        RESERVED_NIBBLE => Err(ExtError::Reserved),
        ONE_BYTE_NIBBLE => {
            let ext = cursor.read_u8().map_err(|_| ExtError::Truncated)?;
            Ok(usize::from(ext) + ONE_BYTE_BIAS)
        }
        TWO_BYTE_NIBBLE => {
            let ext = cursor.read_u16_be().map_err(|_| ExtError::Truncated)?;
            Ok(usize::from(ext) + TWO_BYTE_BIAS)
        }
        plain => Ok(usize::from(plain)),
    }
}
