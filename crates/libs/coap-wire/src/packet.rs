//! The packet value type plus the header, token and envelope codecs.
//!
//! Wire layout: a fixed 4-byte header (version, type, token-length nibble,
//! code, message ID), the token-length extension bytes and token, the
//! delta-encoded option list, then optionally the payload marker and the
//! payload. `generate` and `parse` run those codecs in wire order over a
//! single cursor.

use core::fmt;

use crate::buffer::{InputBuffer, OutputBuffer};
use crate::code;
use crate::error::WireError;
use crate::ext::{self, ExtError};
use crate::message_id::{self, MessageIdGenerator};
use crate::options::{self, PacketOption, PAYLOAD_MARKER};

/// Protocol version carried in the top two header bits.
const VERSION: u8 = 1;

/// Default upper bound on the encoded message, in bytes.
pub const MAX_PACKET_SIZE: usize = 1280;

/// Longest token the length field can express.
pub const MAX_TOKEN_LENGTH: usize = ext::MAX_VALUE;

/// Message type carried in bits 5-4 of the first header byte.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Confirmable = 0b00,
    #[default]
    NonConfirmable = 0b01,
    Acknowledgement = 0b10,
    Reset = 0b11,
}

impl From<u8> for MessageType {
    fn from(value: u8) -> Self {
        match value & 0b11 {
            0b00 => MessageType::Confirmable,
            0b01 => MessageType::NonConfirmable,
            0b10 => MessageType::Acknowledgement,
            _ => MessageType::Reset,
        }
    }
}

impl MessageType {
    fn bits(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MessageType::Confirmable => "CON",
            MessageType::NonConfirmable => "NON",
            MessageType::Acknowledgement => "ACK",
            MessageType::Reset => "RST",
        };
        write!(f, "{label}")
    }
}

/// One message, decoded or ready to encode.
///
/// A packet is a plain value with no identity beyond its fields; `generate`
/// takes it by reference and never writes defaults back into the caller's
/// copy. `Default` gives a non-confirmable GET with no token, options or
/// payload and a generator-assigned message ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub message_type: MessageType,
    /// Method name, dotted `class.detail` or HTTP-style digits on encode;
    /// parse always yields the dotted form.
    pub code: String,
    /// `None` lets `generate` assign the next ID from its generator.
    pub message_id: Option<u16>,
    pub token: Vec<u8>,
    pub options: Vec<PacketOption>,
    pub payload: Vec<u8>,
}

impl Default for Packet {
    fn default() -> Self {
        Self {
            message_type: MessageType::default(),
            code: code::DEFAULT_CODE.to_string(),
            message_id: None,
            token: Vec::new(),
            options: Vec::new(),
            payload: Vec::new(),
        }
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {}", self.message_type, self.code)?;
        if let Some(id) = self.message_id {
            write!(f, " id={id}")?;
        }
        write!(
            f,
            " token={}B options={} payload={}B]",
            self.token.len(),
            self.options.len(),
            self.payload.len()
        )
    }
}

/// Encodes `packet` with the default 1280-byte limit and the process-wide
/// message-ID generator.
pub fn generate(packet: &Packet) -> Result<Vec<u8>, WireError> {
    generate_with(packet, MAX_PACKET_SIZE, message_id::shared())
}

/// Encodes `packet`, failing if the result would exceed `max_length` bytes.
pub fn generate_with_limit(packet: &Packet, max_length: usize) -> Result<Vec<u8>, WireError> {
    generate_with(packet, max_length, message_id::shared())
}

/// Encodes `packet`, drawing any missing message ID from `ids`.
pub fn generate_with(
    packet: &Packet,
    max_length: usize,
    ids: &MessageIdGenerator,
) -> Result<Vec<u8>, WireError> {
    let code_byte = code::encode(&packet.code)?;
    let message_id = packet.message_id.unwrap_or_else(|| ids.next_id());

    if code_byte == code::EMPTY_CODE {
        if !packet.token.is_empty() || !packet.options.is_empty() || !packet.payload.is_empty() {
            return Err(WireError::EmptyMessageMustBeEmpty);
        }
        let mut raw = vec![0u8; 4];
        let mut out = OutputBuffer::new(&mut raw);
        write_header(&mut out, packet.message_type, 0, code_byte, message_id)?;
        return Ok(raw);
    }

    if packet.token.len() > MAX_TOKEN_LENGTH {
        return Err(WireError::TokenTooLong(packet.token.len()));
    }

    let prepared = options::prepare(&packet.options)?;

    let mut length = 4
        + ext::extension_len(packet.token.len())
        + packet.token.len()
        + options::encoded_len(&prepared);
    if !packet.payload.is_empty() {
        length += 1 + packet.payload.len();
    }
    if length > max_length {
        return Err(WireError::MaxPacketSizeExceeded { current: length, max: max_length });
    }

    let mut raw = vec![0u8; length];
    let mut out = OutputBuffer::new(&mut raw);

    write_header(
        &mut out,
        packet.message_type,
        ext::nibble(packet.token.len()),
        code_byte,
        message_id,
    )?;
    ext::write_extension(&mut out, packet.token.len())?;
    out.write(&packet.token)?;
    for option in &prepared {
        option.write(&mut out)?;
    }
    if !packet.payload.is_empty() {
        out.write_u8(PAYLOAD_MARKER)?;
        out.write(&packet.payload)?;
    }
    debug_assert!(out.is_full());

    log::trace!("generate: {} {} id={message_id} {length}B", packet.message_type, packet.code);

    Ok(raw)
}

/// Decodes a complete received message.
pub fn parse(buffer: &[u8]) -> Result<Packet, WireError> {
    let mut cursor = InputBuffer::new(buffer);

    let first = cursor.read_u8()?;
    let version = first >> 6;
    if version != VERSION {
        return Err(WireError::UnsupportedVersion(version));
    }
    let message_type = MessageType::from(first >> 4);
    let token_nibble = first & 0x0f;

    let code_byte = cursor.read_u8()?;
    let message_id = cursor.read_u16_be()?;

    // The empty code admits nothing but the bare header.
    if code_byte == code::EMPTY_CODE {
        if buffer.len() != 4 {
            return Err(WireError::EmptyMessageMustBeEmpty);
        }
        return Ok(Packet {
            message_type,
            code: code::decode(code_byte),
            message_id: Some(message_id),
            token: Vec::new(),
            options: Vec::new(),
            payload: Vec::new(),
        });
    }

    let token_length = ext::resolve(token_nibble, &mut cursor).map_err(|err| match err {
        ExtError::Reserved => WireError::InvalidTokenLength,
        ExtError::Truncated => WireError::BufferExhausted,
    })?;
    let token = cursor.read_slice(token_length)?.to_vec();

    let options = options::decode(&mut cursor)?;

    // The option decoder stops only at the marker or the end of the buffer.
    let payload = match cursor.peek_u8() {
        Some(PAYLOAD_MARKER) => {
            cursor.read_u8()?;
            cursor.read_rest().to_vec()
        }
        _ => Vec::new(),
    };

    let packet = Packet {
        message_type,
        code: code::decode(code_byte),
        message_id: Some(message_id),
        token,
        options,
        payload,
    };

    log::trace!("parse: {packet} from {}B", buffer.len());

    Ok(packet)
}

fn write_header(
    out: &mut OutputBuffer<'_>,
    message_type: MessageType,
    token_nibble: u8,
    code_byte: u8,
    message_id: u16,
) -> Result<(), WireError> {
    out.write_u8(VERSION << 6 | message_type.bits() << 4 | token_nibble)?;
    out.write_u8(code_byte)?;
    out.write_u16_be(message_id)
}
