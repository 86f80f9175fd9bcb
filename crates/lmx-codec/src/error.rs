/// Errors that can occur while framing or deframing a byte stream.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The supplied memory region cannot hold the bookkeeping reservation.
    #[error("region too small ({len} bytes, need at least {min})")]
    RegionTooSmall { len: usize, min: usize },

    /// The backing allocation for a codec-owned buffer failed.
    #[error("failed to allocate {bytes} byte buffer")]
    AllocationFailed { bytes: usize },

    /// The payload exceeds the buffer's usable space.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The reassembled payload does not match the checksum in the header.
    #[error("checksum mismatch (header {expected:#04x}, computed {computed:#04x})")]
    ChecksumMismatch { expected: u8, computed: u8 },

    /// A bulk copy was offered a slice that does not match the parsed length.
    #[error("payload length mismatch (header says {expected} bytes, got {supplied})")]
    LengthMismatch { expected: usize, supplied: usize },

    /// A bulk copy was requested before a complete header was recognized.
    #[error("decoder is not in the payload phase")]
    NotInPayloadPhase,

    /// An I/O error occurred on the underlying stream.
    #[error("stream I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended before a complete frame was received.
    #[error("stream closed (incomplete frame)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, CodecError>;
