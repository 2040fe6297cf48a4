//! Translation between human method/response codes and the wire code byte.
//!
//! Accepted on encode: a registered method name (case-insensitive), a dotted
//! `class.detail` string such as `"2.05"`, or an HTTP-style number such as
//! `"500"`. Decode always yields the dotted zero-padded form.

use crate::error::WireError;

/// Registered request methods and their wire bytes.
const METHODS: [(&str, u8); 7] = [
    ("GET", 0x01),
    ("POST", 0x02),
    ("PUT", 0x03),
    ("DELETE", 0x04),
    ("FETCH", 0x05),
    ("PATCH", 0x06),
    ("iPATCH", 0x07),
];

/// Code assigned when a packet is generated without one: GET.
pub const DEFAULT_CODE: &str = "0.01";

/// Code byte of the reserved empty message.
pub const EMPTY_CODE: u8 = 0x00;

const CLASS_MAX: u8 = 7;
const DETAIL_MAX: u8 = 31;

/// Encodes a code string to its wire byte.
pub fn encode(code: &str) -> Result<u8, WireError> {
    if let Some((_, byte)) = METHODS.iter().find(|(name, _)| name.eq_ignore_ascii_case(code)) {
        return Ok(*byte);
    }

    if code.contains('.') {
        return encode_dotted(code);
    }

    let number: u32 = code.parse().map_err(|_| invalid(code))?;
    let class = number / 100;
    let detail = number % 100;
    if class > u32::from(CLASS_MAX) || detail > u32::from(DETAIL_MAX) {
        return Err(invalid(code));
    }
    Ok((class << 5 | detail) as u8)
}

/// Decodes a code byte to its dotted form, e.g. `2.05`.
pub fn decode(byte: u8) -> String {
    format!("{}.{:02}", byte >> 5, byte & DETAIL_MAX)
}

fn encode_dotted(code: &str) -> Result<u8, WireError> {
    let (class, detail) = code.split_once('.').ok_or_else(|| invalid(code))?;
    let class: u8 = class.parse().map_err(|_| invalid(code))?;
    let detail: u8 = detail.parse().map_err(|_| invalid(code))?;
    if class > CLASS_MAX || detail > DETAIL_MAX {
        return Err(invalid(code));
    }
    Ok(class << 5 | detail)
}

fn invalid(code: &str) -> WireError {
    WireError::InvalidCode(code.to_string())
}
