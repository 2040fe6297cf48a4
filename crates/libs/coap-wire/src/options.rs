//! Option registry and the sorted, delta-encoded option-list codec.
//!
//! On the wire every option stores the difference between its number and the
//! previous option's number, so the list must be transmitted in
//! non-decreasing numeric order; `prepare` sorts before computing deltas and
//! `decode` yields options in wire order, which is therefore already sorted.

use crate::buffer::{InputBuffer, OutputBuffer};
use crate::error::WireError;
use crate::ext::{self, ExtError};

/// Byte separating the option list from the payload.
pub const PAYLOAD_MARKER: u8 = 0xff;

/// Registered option numbers and their canonical names.
const KNOWN_OPTIONS: [(u64, &str); 21] = [
    (1, "If-Match"),
    (3, "Uri-Host"),
    (4, "ETag"),
    (5, "If-None-Match"),
    (6, "Observe"),
    (7, "Uri-Port"),
    (8, "Location-Path"),
    (11, "Uri-Path"),
    (12, "Content-Format"),
    (14, "Max-Age"),
    (15, "Uri-Query"),
    (17, "Accept"),
    (20, "Location-Query"),
    (23, "Block2"),
    (27, "Block1"),
    (35, "Proxy-Uri"),
    (39, "Proxy-Scheme"),
    (60, "Size1"),
    (258, "No-Response"),
    (2049, "OCF-Accept-Content-Format-Version"),
    (2053, "OCF-Content-Format-Version"),
];

/// A single option as carried by a [`Packet`](crate::Packet).
///
/// The same name may repeat, e.g. one `Uri-Path` entry per path segment.
/// Unregistered numbers travel under their decimal-string name, so unknown
/// options round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketOption {
    pub name: String,
    pub value: Vec<u8>,
}

impl PacketOption {
    pub fn new(name: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self { name: name.into(), value: value.into() }
    }
}

/// Canonical name for a number, or its decimal form when unregistered.
pub fn name_for(number: u64) -> String {
    KNOWN_OPTIONS
        .iter()
        .find(|(num, _)| *num == number)
        .map_or_else(|| number.to_string(), |(_, name)| (*name).to_string())
}

/// Registered number for a name, else the name parsed as a decimal integer.
pub fn number_for(name: &str) -> Result<u64, WireError> {
    if let Some((number, _)) = KNOWN_OPTIONS.iter().find(|(_, known)| *known == name) {
        return Ok(*number);
    }
    name.parse().map_err(|_| WireError::InvalidOptionName(name.to_string()))
}

/// One option resolved to its wire delta, in transmission order.
pub(crate) struct WireOption<'a> {
    delta: usize,
    value: &'a [u8],
}

/// Resolves names to numbers, sorts and computes the cumulative deltas.
///
/// The sort is stable: repeated numbers keep their input order, which is
/// what carries meaning for options like `Uri-Path`.
pub(crate) fn prepare(options: &[PacketOption]) -> Result<Vec<WireOption<'_>>, WireError> {
    let mut numbered = Vec::with_capacity(options.len());
    for option in options {
        numbered.push((number_for(&option.name)?, option));
    }
    numbered.sort_by_key(|(number, _)| *number);

    let mut prepared = Vec::with_capacity(numbered.len());
    let mut previous = 0u64;
    for (number, option) in numbered {
        let delta = number - previous;
        if delta > ext::MAX_VALUE as u64 {
            return Err(WireError::OptionDeltaTooLarge(delta));
        }
        if option.value.len() > ext::MAX_VALUE {
            return Err(WireError::OptionValueTooLong(option.value.len()));
        }
        prepared.push(WireOption { delta: delta as usize, value: &option.value });
        previous = number;
    }
    Ok(prepared)
}

pub(crate) fn encoded_len(prepared: &[WireOption<'_>]) -> usize {
    prepared.iter().map(WireOption::encoded_len).sum()
}

impl WireOption<'_> {
    /// Wire size: leading byte, extensions, value.
    pub(crate) fn encoded_len(&self) -> usize {
        1 + ext::extension_len(self.delta) + ext::extension_len(self.value.len()) + self.value.len()
    }

    pub(crate) fn write(&self, out: &mut OutputBuffer<'_>) -> Result<(), WireError> {
        out.write_u8(ext::nibble(self.delta) << 4 | ext::nibble(self.value.len()))?;
        ext::write_extension(out, self.delta)?;
        ext::write_extension(out, self.value.len())?;
        out.write(self.value)
    }
}

/// Reads options until the payload marker or the end of the buffer.
pub(crate) fn decode(cursor: &mut InputBuffer<'_>) -> Result<Vec<PacketOption>, WireError> {
    let mut options = Vec::new();
    let mut number = 0u64;

    while let Some(byte) = cursor.peek_u8() {
        if byte == PAYLOAD_MARKER {
            break;
        }
        let byte = cursor.read_u8()?;

        let delta = ext::resolve(byte >> 4, cursor).map_err(|err| match err {
            ExtError::Reserved => WireError::WrongOptionDelta,
            ExtError::Truncated => WireError::BufferExhausted,
        })?;
        let length = ext::resolve(byte & 0x0f, cursor).map_err(|err| match err {
            ExtError::Reserved => WireError::WrongOptionLength,
            ExtError::Truncated => WireError::BufferExhausted,
        })?;

        number += delta as u64;
        let value = cursor.read_slice(length)?.to_vec();
        options.push(PacketOption { name: name_for(number), value });
    }

    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::{name_for, number_for, prepare, PacketOption};
    use crate::error::WireError;

    #[test]
    fn registered_numbers_resolve_both_ways() {
        for (number, name) in super::KNOWN_OPTIONS {
            assert_eq!(name_for(number), name);
            assert_eq!(number_for(name).unwrap(), number);
        }
    }

    #[test]
    fn unregistered_numbers_fall_back_to_decimal_strings() {
        for number in [0u64, 10, 42, 270, 560, 1024] {
            let name = name_for(number);
            assert_eq!(name, number.to_string());
            assert_eq!(number_for(&name).unwrap(), number);
        }
    }

    #[test]
    fn unknown_non_numeric_names_are_rejected() {
        assert!(matches!(number_for("Uri-Pathological"), Err(WireError::InvalidOptionName(_))));
    }

    #[test]
    fn prepare_sorts_and_keeps_ties_stable() {
        let options = vec![
            PacketOption::new("Uri-Path", b"aaa".to_vec()),
            PacketOption::new("Uri-Path", b"bbb".to_vec()),
            PacketOption::new("Observe", vec![42]),
        ];
        let prepared = prepare(&options).unwrap();
        let deltas: Vec<usize> = prepared.iter().map(|option| option.delta).collect();
        assert_eq!(deltas, [6, 5, 0]);
        assert_eq!(prepared[1].value, b"aaa");
        assert_eq!(prepared[2].value, b"bbb");
    }

    #[test]
    fn prepare_rejects_oversized_fields() {
        let options = vec![PacketOption::new("70000", Vec::new())];
        assert!(matches!(prepare(&options), Err(WireError::OptionDeltaTooLarge(70000))));

        let options = vec![PacketOption::new("If-Match", vec![0; 65805])];
        assert!(matches!(prepare(&options), Err(WireError::OptionValueTooLong(65805))));
    }
}
