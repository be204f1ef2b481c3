/// Errors that can occur while encoding, decoding, or framing SPP packets.
#[derive(Debug, thiserror::Error)]
pub enum SppError {
    /// A byte buffer was too short for the field being decoded.
    ///
    /// Always recoverable by the caller: wait for more bytes and retry.
    #[error("buffer too short for {what} (needed {needed} bytes, got {got})")]
    Truncated {
        what: &'static str,
        needed: usize,
        got: usize,
    },

    /// A header field exceeds its wire bit width.
    #[error("{field} out of range ({value}, max {max})")]
    FieldOutOfRange {
        field: &'static str,
        value: u32,
        max: u32,
    },

    /// The packet data field would be empty.
    ///
    /// The length word declares one fewer than the byte count following the
    /// primary header, so the minimum encodable data field is 1 byte.
    #[error("packet data field must not be empty")]
    EmptyDataField,

    /// The packet data field exceeds what the length word can declare.
    #[error("packet data field too large ({size} bytes, max {max})")]
    PacketTooLarge { size: usize, max: usize },

    /// The stream closed before the required byte count was collected.
    #[error("stream closed before a complete frame was received")]
    EndOfStream,

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SppError>;
