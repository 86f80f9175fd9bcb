//! Frame recovery from a raw byte stream.
//!
//! One state machine, two intake paths. The header phase always runs byte
//! at a time; the payload phase either continues byte-wise
//! ([`FrameBuffer::decode`]) or takes the whole payload in one copy
//! ([`FrameBuffer::decode_copy`]) once [`FrameBuffer::decode_find`] has
//! recognized a header.

use tracing::{debug, trace};

use crate::buffer::FrameBuffer;
use crate::error::{CodecError, Result};
use crate::wire::{checksum, MARKER};

/// Position of the decoder inside a frame.
///
/// `Head0..Head2` hunt for the marker, `Verify` and `Len0..Len3` collect the
/// remaining header fields, `Data` means the payload phase has been entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DecodeState {
    Head0,
    Head1,
    Head2,
    Verify,
    Len0,
    Len1,
    Len2,
    Len3,
    Data,
}

impl FrameBuffer<'_> {
    /// Feed one byte to the incremental decoder.
    ///
    /// Returns `Ok(None)` while a frame is still being assembled — the
    /// caller cannot distinguish marker search from header fields from a
    /// partial payload, and does not need to. On the byte completing a
    /// frame, returns `Ok(Some(payload_len))` with the payload in the first
    /// `payload_len` bytes of [`as_slice`], or `Err(ChecksumMismatch)` —
    /// the payload bytes are present either way, but must not be trusted
    /// after a mismatch. Both outcomes leave the decoder ready for the next
    /// frame.
    ///
    /// [`as_slice`]: FrameBuffer::as_slice
    pub fn decode(&mut self, byte: u8) -> Result<Option<usize>> {
        if self.state != DecodeState::Data {
            self.step(byte);
            if self.state == DecodeState::Data && self.header.length == 0 {
                // An empty frame has no payload byte to complete on.
                return self.finish();
            }
            return Ok(None);
        }

        let idx = self.copied;
        self.region_mut()[idx] = byte;
        self.copied += 1;
        if self.copied < self.header.length as usize {
            return Ok(None);
        }
        self.finish()
    }

    /// Drive only the header state machine with one byte.
    ///
    /// Returns `Some(payload_len)` as soon as a complete, size-checked
    /// header has been recognized; the region is never written. The caller
    /// must then hand the next `payload_len` bytes of the stream to
    /// [`decode_copy`] — for zero-length frames that is an empty slice.
    ///
    /// [`decode_copy`]: FrameBuffer::decode_copy
    pub fn decode_find(&mut self, byte: u8) -> Option<usize> {
        self.step(byte);
        if self.state == DecodeState::Data {
            Some(self.header.length as usize)
        } else {
            None
        }
    }

    /// Take the entire payload of a found frame in one bulk copy.
    ///
    /// Defends against mismanaged offsets: fails with `NotInPayloadPhase`
    /// or `LengthMismatch` (both caller bugs, not line noise) unless a
    /// header was just recognized and `src` is exactly the advertised
    /// length. The copy happens before verification, so on
    /// `Err(ChecksumMismatch)` the region holds the untrusted bytes — the
    /// same contract as the incremental path.
    pub fn decode_copy(&mut self, src: &[u8]) -> Result<()> {
        if self.state != DecodeState::Data {
            debug!(state = ?self.state, "bulk copy outside payload phase");
            return Err(CodecError::NotInPayloadPhase);
        }
        if src.len() != self.header.length as usize {
            debug!(
                expected = self.header.length,
                supplied = src.len(),
                "bulk copy length does not match header"
            );
            return Err(CodecError::LengthMismatch {
                expected: self.header.length as usize,
                supplied: src.len(),
            });
        }

        let expected = self.header.checksum;
        self.decode_reset();
        self.region_mut()[..src.len()].copy_from_slice(src);
        let computed = checksum(&self.as_slice()[..src.len()]);
        if computed != expected {
            debug!(expected, computed, "bulk payload failed verification");
            return Err(CodecError::ChecksumMismatch { expected, computed });
        }
        Ok(())
    }

    /// Verify the assembled payload and rearm the decoder.
    fn finish(&mut self) -> Result<Option<usize>> {
        let len = self.header.length as usize;
        let expected = self.header.checksum;
        self.decode_reset();
        let computed = checksum(&self.as_slice()[..len]);
        if computed == expected {
            Ok(Some(len))
        } else {
            debug!(expected, computed, len, "payload failed verification");
            Err(CodecError::ChecksumMismatch { expected, computed })
        }
    }

    /// One transition of the header state machine.
    ///
    /// A byte failing a marker-position check falls back to `Head0` and is
    /// re-evaluated once as a candidate first marker byte, so it can end one
    /// match attempt and begin the next in the same call.
    fn step(&mut self, byte: u8) {
        loop {
            match self.state {
                DecodeState::Head0 => {
                    self.copied = 0;
                    self.header.length = 0;
                    self.header.mark[0] = byte;
                    if byte == MARKER[0] {
                        self.state = DecodeState::Head1;
                    }
                    return;
                }
                DecodeState::Head1 => {
                    self.header.mark[1] = byte;
                    if byte == MARKER[1] {
                        self.state = DecodeState::Head2;
                        return;
                    }
                    self.state = DecodeState::Head0;
                }
                DecodeState::Head2 => {
                    self.header.mark[2] = byte;
                    if byte == MARKER[2] {
                        self.state = DecodeState::Verify;
                        return;
                    }
                    self.state = DecodeState::Head0;
                }
                DecodeState::Verify => {
                    self.header.checksum = byte;
                    self.state = DecodeState::Len0;
                    return;
                }
                DecodeState::Len0 => {
                    self.header.length |= byte as u32;
                    self.state = DecodeState::Len1;
                    return;
                }
                DecodeState::Len1 => {
                    self.header.length |= (byte as u32) << 8;
                    self.state = DecodeState::Len2;
                    return;
                }
                DecodeState::Len2 => {
                    self.header.length |= (byte as u32) << 16;
                    self.state = DecodeState::Len3;
                    return;
                }
                DecodeState::Len3 => {
                    self.header.length |= (byte as u32) << 24;
                    if self.header.length as usize > self.usable_space() {
                        // Silently discarded; the stream must not abort on
                        // an oversized advertisement.
                        debug!(
                            length = self.header.length,
                            usable = self.usable_space(),
                            "discarding frame larger than buffer"
                        );
                        self.state = DecodeState::Head0;
                    } else {
                        trace!(length = self.header.length, "frame header recognized");
                        self.state = DecodeState::Data;
                    }
                    return;
                }
                DecodeState::Data => {
                    // A header search was forced while a found frame was
                    // pending; abandon it and resynchronize.
                    self.state = DecodeState::Head0;
                }
            }
        }
    }
}
