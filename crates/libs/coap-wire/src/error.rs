use thiserror::Error;

/// Failures of a single `generate` or `parse` call.
///
/// Every variant aborts the call in progress; no partial packet or partial
/// buffer is ever returned. Dropping the malformed message, and answering
/// with a reset where the protocol asks for one, is the caller's business.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    /// Version bits carried anything other than 1.
    #[error("unsupported version: {0}")]
    UnsupportedVersion(u8),

    /// Token longer than the length field can express (65804 bytes).
    #[error("token too long: {0} bytes")]
    TokenTooLong(usize),

    /// Token-length nibble held the reserved value 15.
    #[error("token length not allowed")]
    InvalidTokenLength,

    /// Option delta nibble held the reserved value 15.
    #[error("wrong option delta")]
    WrongOptionDelta,

    /// Option length nibble held the reserved value 15.
    #[error("wrong option length")]
    WrongOptionLength,

    /// Code 0.00 with anything beyond the 4-byte header.
    #[error("empty messages must be empty")]
    EmptyMessageMustBeEmpty,

    /// Encoded message would exceed the caller's size limit.
    #[error("max packet size is {max}: current is {current}")]
    MaxPacketSizeExceeded { current: usize, max: usize },

    /// Code string is no method name, dotted pair or HTTP-style number.
    #[error("invalid code: {0}")]
    InvalidCode(String),

    /// Option name is neither registered nor a decimal number.
    #[error("invalid option name: {0}")]
    InvalidOptionName(String),

    /// Gap between consecutive sorted option numbers above 65804.
    #[error("option delta too large: {0}")]
    OptionDeltaTooLarge(u64),

    /// Option value longer than the length field can express.
    #[error("option value too long: {0} bytes")]
    OptionValueTooLong(usize),

    /// Message ended in the middle of a field.
    #[error("buffer exhausted")]
    BufferExhausted,
}
