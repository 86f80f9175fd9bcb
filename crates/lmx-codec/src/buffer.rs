//! Frame buffers: the memory a frame is encoded into or decoded out of.
//!
//! A [`FrameBuffer`] either owns its backing allocation or borrows a
//! caller-supplied region, behind one API. The tail [`RESERVED_OVERHEAD`]
//! bytes of a supplied region are treated as a bookkeeping reservation, so
//! regions sized against that constant report the usable space the caller
//! expects; the bookkeeping itself lives in this struct's fields.
//!
//! One buffer serves one direction at a time: interleaving encode and decode
//! of the same frame in a single buffer clobbers the frame bytes.

use crate::decode::DecodeState;
use crate::error::{CodecError, Result};
use crate::wire::FrameHeader;

/// Fixed bookkeeping reservation subtracted from every region.
///
/// Callers sizing their own regions can predict usable space without
/// constructing a buffer: `usable = region_len - RESERVED_OVERHEAD`.
pub const RESERVED_OVERHEAD: usize = 24;

enum Region<'a> {
    Owned(Vec<u8>),
    Borrowed(&'a mut [u8]),
}

impl Region<'_> {
    fn as_slice(&self) -> &[u8] {
        match self {
            Region::Owned(vec) => vec,
            Region::Borrowed(slice) => slice,
        }
    }

    fn as_mut_slice(&mut self) -> &mut [u8] {
        match self {
            Region::Owned(vec) => vec,
            Region::Borrowed(slice) => slice,
        }
    }
}

/// A buffer that frames are encoded into or decoded out of.
///
/// Holds the payload region together with the decoder's persistent state, so
/// a partially received frame survives across calls until it completes, is
/// discarded by resynchronization, or is dropped by [`decode_reset`].
///
/// [`decode_reset`]: FrameBuffer::decode_reset
pub struct FrameBuffer<'a> {
    region: Region<'a>,
    usable: usize,
    pub(crate) header: FrameHeader,
    pub(crate) state: DecodeState,
    pub(crate) copied: usize,
}

impl FrameBuffer<'static> {
    /// Allocate a codec-owned buffer with `usable` bytes of payload space.
    ///
    /// The backing allocation is `usable + RESERVED_OVERHEAD` bytes, zeroed.
    /// The allocation is freed when the buffer is dropped.
    pub fn alloc(usable: usize) -> Result<Self> {
        let total = usable.saturating_add(RESERVED_OVERHEAD);
        if total < RESERVED_OVERHEAD + 1 {
            return Err(CodecError::RegionTooSmall {
                len: total,
                min: RESERVED_OVERHEAD + 1,
            });
        }
        let mut backing = Vec::new();
        backing
            .try_reserve_exact(total)
            .map_err(|_| CodecError::AllocationFailed { bytes: total })?;
        backing.resize(total, 0);
        Ok(Self::assemble(Region::Owned(backing)))
    }
}

impl<'a> FrameBuffer<'a> {
    /// Wrap a caller-owned region.
    ///
    /// The region is zeroed and must be at least `RESERVED_OVERHEAD + 1`
    /// bytes; shorter regions are rejected. Usable space is
    /// `region.len() - RESERVED_OVERHEAD`.
    pub fn from_region(region: &'a mut [u8]) -> Result<Self> {
        if region.len() < RESERVED_OVERHEAD + 1 {
            return Err(CodecError::RegionTooSmall {
                len: region.len(),
                min: RESERVED_OVERHEAD + 1,
            });
        }
        region.fill(0);
        Ok(Self::assemble(Region::Borrowed(region)))
    }

    fn assemble(region: Region<'a>) -> Self {
        // Clamped so the wire's u32 length field can represent any accepted
        // payload.
        let usable = (region.as_slice().len() - RESERVED_OVERHEAD).min(u32::MAX as usize);
        Self {
            region,
            usable,
            header: FrameHeader::default(),
            state: DecodeState::Head0,
            copied: 0,
        }
    }

    /// Payload capacity of this buffer.
    pub fn usable_space(&self) -> usize {
        self.usable
    }

    /// Zero the region and drop all decode progress.
    ///
    /// Call before pointing the buffer at an unrelated stream. Returns the
    /// usable space.
    pub fn reinit(&mut self) -> usize {
        self.region.as_mut_slice().fill(0);
        self.header = FrameHeader::default();
        self.decode_reset();
        self.usable
    }

    /// Discard any partially decoded frame and return to marker search.
    ///
    /// Leaves the region and the cached header untouched.
    pub fn decode_reset(&mut self) {
        self.state = DecodeState::Head0;
        self.copied = 0;
    }

    /// The backing region.
    ///
    /// An encoded frame occupies the first `encode(..)` bytes; a decoded
    /// payload occupies the first `decode(..)` bytes.
    pub fn as_slice(&self) -> &[u8] {
        self.region.as_slice()
    }

    pub(crate) fn region_mut(&mut self) -> &mut [u8] {
        self.region.as_mut_slice()
    }
}

impl std::fmt::Debug for FrameBuffer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("usable", &self.usable)
            .field("state", &self.state)
            .field("copied", &self.copied)
            .finish_non_exhaustive()
    }
}
