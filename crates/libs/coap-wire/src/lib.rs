//! Codec for the CoAP binary message format (RFC 7252 family).
//!
//! [`generate`] turns a [`Packet`] into its compact wire form and [`parse`]
//! turns a complete wire buffer back into a [`Packet`]. The codec keeps no
//! connection or session state; transports call it once per message and own
//! retransmission, deduplication and acknowledgment policy themselves.

pub mod buffer;
pub mod code;
pub mod error;
pub mod ext;
pub mod message_id;
pub mod options;
pub mod packet;

pub use error::WireError;
pub use message_id::MessageIdGenerator;
pub use options::PacketOption;
pub use packet::{
    generate, generate_with, generate_with_limit, parse, MessageType, Packet, MAX_PACKET_SIZE,
    MAX_TOKEN_LENGTH,
};
