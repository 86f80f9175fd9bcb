//! Resynchronizing frame codec for point-to-point serial links.
//!
//! Turns an arbitrary payload into a self-delimiting frame and turns a raw
//! incoming byte stream back into payloads. Every frame carries:
//! - A 3-byte marker ("LMX") for stream synchronization
//! - A 1-byte additive checksum over the payload
//! - A 4-byte little-endian payload length
//!
//! The decoder tolerates line noise: bytes that do not fit a frame are
//! absorbed by falling back to marker search, and frames whose checksum does
//! not match are rejected without aborting the stream. Two decode paths share
//! one state machine — [`FrameBuffer::decode`] consumes one byte at a time
//! (interrupt-driven intake), while [`FrameBuffer::decode_find`] +
//! [`FrameBuffer::decode_copy`] parse the header byte-wise and take the
//! payload in a single bulk copy (contiguous intake).

pub mod buffer;
mod decode;
mod encode;
pub mod error;
pub mod reader;
pub mod wire;
pub mod writer;

pub use buffer::{FrameBuffer, RESERVED_OVERHEAD};
pub use error::{CodecError, Result};
pub use reader::{FrameReader, DEFAULT_CAPACITY};
pub use wire::{checksum, FrameHeader, HEADER_SIZE, MARKER};
pub use writer::FrameWriter;
