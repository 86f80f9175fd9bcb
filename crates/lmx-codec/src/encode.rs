//! Frame serialization.

use crate::buffer::FrameBuffer;
use crate::error::{CodecError, Result};
use crate::wire::{checksum, FrameHeader, HEADER_SIZE, MARKER};

impl FrameBuffer<'_> {
    /// Build one frame for `payload` in this buffer.
    ///
    /// Fails without writing anything if the payload exceeds the usable
    /// space. On success the complete frame occupies the first
    /// `HEADER_SIZE + payload.len()` bytes of [`as_slice`], overwriting any
    /// previously encoded frame, and that total is returned.
    ///
    /// Decode progress is left untouched; encode and decode state are
    /// independent, though sharing one buffer for both directions of the
    /// same frame clobbers the frame bytes.
    ///
    /// [`as_slice`]: FrameBuffer::as_slice
    pub fn encode(&mut self, payload: &[u8]) -> Result<usize> {
        if payload.len() > self.usable_space() {
            return Err(CodecError::PayloadTooLarge {
                size: payload.len(),
                max: self.usable_space(),
            });
        }

        let header = FrameHeader {
            mark: MARKER,
            checksum: checksum(payload),
            length: payload.len() as u32,
        };
        let out = self.region_mut();
        header.write_to(out);
        out[HEADER_SIZE..HEADER_SIZE + payload.len()].copy_from_slice(payload);

        Ok(HEADER_SIZE + payload.len())
    }
}
