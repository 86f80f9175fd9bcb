//! Pull whole payloads out of any `Read` stream.

use std::io::{ErrorKind, Read};

use bytes::Bytes;

use crate::buffer::FrameBuffer;
use crate::error::{CodecError, Result};

const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Default payload capacity for [`FrameReader`] and [`FrameWriter`].
///
/// Frames advertising more than the reader's capacity are discarded by
/// resynchronization, so size the reader for the largest frame the peer
/// sends.
///
/// [`FrameWriter`]: crate::writer::FrameWriter
pub const DEFAULT_CAPACITY: usize = 64 * 1024;

/// Reads complete frames from any `Read` stream.
///
/// Handles partial reads and interleaved noise internally — callers get
/// whole, checksum-verified payloads. A `ChecksumMismatch` is returned for
/// the frame that failed, and the next call keeps decoding the same stream.
pub struct FrameReader<T> {
    inner: T,
    buf: FrameBuffer<'static>,
    pending: Vec<u8>,
    pos: usize,
}

impl<T: Read> FrameReader<T> {
    /// Create a frame reader with [`DEFAULT_CAPACITY`] of payload space.
    pub fn new(inner: T) -> Self {
        Self::with_capacity(inner, DEFAULT_CAPACITY)
    }

    /// Create a frame reader accepting payloads up to `capacity` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_capacity(inner: T, capacity: usize) -> Self {
        let buf = FrameBuffer::alloc(capacity).expect("reader capacity must be non-zero");
        Self {
            inner,
            buf,
            pending: Vec::with_capacity(READ_CHUNK_SIZE),
            pos: 0,
        }
    }

    /// Read the next complete frame (blocking).
    ///
    /// Returns `Err(CodecError::ConnectionClosed)` when EOF is reached.
    pub fn read_frame(&mut self) -> Result<Bytes> {
        loop {
            while self.pos < self.pending.len() {
                let byte = self.pending[self.pos];
                self.pos += 1;
                if let Some(len) = self.buf.decode(byte)? {
                    return Ok(Bytes::copy_from_slice(&self.buf.as_slice()[..len]));
                }
            }
            self.pending.clear();
            self.pos = 0;

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(CodecError::Io(err)),
            };

            if read == 0 {
                return Err(CodecError::ConnectionClosed);
            }

            self.pending.extend_from_slice(&chunk[..read]);
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn wire(payloads: &[&[u8]]) -> Vec<u8> {
        let mut out = Vec::new();
        let mut buf = FrameBuffer::alloc(DEFAULT_CAPACITY).unwrap();
        for p in payloads {
            let n = buf.encode(p).unwrap();
            out.extend_from_slice(&buf.as_slice()[..n]);
        }
        out
    }

    #[test]
    fn read_single_frame() {
        let mut reader = FrameReader::new(Cursor::new(wire(&[b"hello"])));
        let payload = reader.read_frame().unwrap();
        assert_eq!(payload.as_ref(), b"hello");
    }

    #[test]
    fn read_multiple_frames() {
        let mut reader = FrameReader::new(Cursor::new(wire(&[b"one", b"two", b"three"])));

        assert_eq!(reader.read_frame().unwrap().as_ref(), b"one");
        assert_eq!(reader.read_frame().unwrap().as_ref(), b"two");
        assert_eq!(reader.read_frame().unwrap().as_ref(), b"three");
    }

    #[test]
    fn read_frame_with_large_payload() {
        let payload = vec![0xAB; 48 * 1024];
        let mut buf = FrameBuffer::alloc(DEFAULT_CAPACITY).unwrap();
        let n = buf.encode(&payload).unwrap();

        let mut reader = FrameReader::new(Cursor::new(buf.as_slice()[..n].to_vec()));
        assert_eq!(reader.read_frame().unwrap().as_ref(), payload.as_slice());
    }

    #[test]
    fn partial_read_handling() {
        let byte_reader = ByteByByteReader {
            bytes: wire(&[b"slow"]),
            pos: 0,
        };
        let mut reader = FrameReader::new(byte_reader);
        assert_eq!(reader.read_frame().unwrap().as_ref(), b"slow");
    }

    #[test]
    fn noise_between_frames_is_skipped() {
        let mut stream = vec![0x00, b'L', b'M', 0x19];
        stream.extend_from_slice(&wire(&[b"first"]));
        stream.extend_from_slice(&[0xFF, 0xFE]);
        stream.extend_from_slice(&wire(&[b"second"]));

        let mut reader = FrameReader::new(Cursor::new(stream));
        assert_eq!(reader.read_frame().unwrap().as_ref(), b"first");
        assert_eq!(reader.read_frame().unwrap().as_ref(), b"second");
    }

    #[test]
    fn checksum_failure_does_not_poison_the_stream() {
        let mut stream = wire(&[b"good"]);
        let mut bad = wire(&[b"evil"]);
        bad[9] ^= 0x01;
        stream.extend_from_slice(&bad);
        stream.extend_from_slice(&wire(&[b"fine"]));

        let mut reader = FrameReader::new(Cursor::new(stream));
        assert_eq!(reader.read_frame().unwrap().as_ref(), b"good");
        let err = reader.read_frame().unwrap_err();
        assert!(matches!(err, CodecError::ChecksumMismatch { .. }));
        assert_eq!(reader.read_frame().unwrap().as_ref(), b"fine");
    }

    #[test]
    fn oversized_frame_is_dropped_silently() {
        let mut big = FrameBuffer::alloc(256).unwrap();
        let n = big.encode(&[0x55u8; 200]).unwrap();
        let mut stream = big.as_slice()[..n].to_vec();
        stream.extend_from_slice(&wire(&[b"fits"]));

        let mut reader = FrameReader::with_capacity(Cursor::new(stream), 64);
        assert_eq!(reader.read_frame().unwrap().as_ref(), b"fits");
    }

    #[test]
    fn connection_closed_cleanly() {
        let mut reader = FrameReader::new(Cursor::new(Vec::<u8>::new()));
        let err = reader.read_frame().unwrap_err();
        assert!(matches!(err, CodecError::ConnectionClosed));
    }

    #[test]
    fn connection_closed_mid_frame() {
        let mut partial = wire(&[b"truncated"]);
        partial.truncate(6);

        let mut reader = FrameReader::new(Cursor::new(partial));
        let err = reader.read_frame().unwrap_err();
        assert!(matches!(err, CodecError::ConnectionClosed));
    }

    #[test]
    fn interrupted_read_retries() {
        let reader = InterruptedThenData {
            state: 0,
            bytes: wire(&[b"ok"]),
            pos: 0,
        };
        let mut framed = FrameReader::new(reader);
        assert_eq!(framed.read_frame().unwrap().as_ref(), b"ok");
    }

    #[test]
    fn read_would_block_propagates_io_error() {
        let reader = WouldBlockReader;
        let mut framed = FrameReader::new(reader);
        let err = framed.read_frame().unwrap_err();
        assert!(matches!(err, CodecError::Io(e) if e.kind() == ErrorKind::WouldBlock));
    }

    #[test]
    fn accessors_and_into_inner() {
        let cursor = Cursor::new(Vec::<u8>::new());
        let mut reader = FrameReader::new(cursor);

        let _ = reader.get_ref();
        let _ = reader.get_mut();
        let _inner = reader.into_inner();
    }

    #[test]
    #[cfg(unix)]
    fn roundtrip_over_pipe() {
        let (left, right) = std::os::unix::net::UnixStream::pair().unwrap();
        let mut writer = crate::writer::FrameWriter::new(left);
        let mut reader = FrameReader::new(right);

        writer.send(b"ping").unwrap();
        assert_eq!(reader.read_frame().unwrap().as_ref(), b"ping");
    }

    #[derive(Debug)]
    struct ByteByByteReader {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for ByteByByteReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.bytes.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    struct InterruptedThenData {
        state: u8,
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for InterruptedThenData {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.state == 0 {
                self.state = 1;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            if self.pos >= self.bytes.len() {
                return Ok(0);
            }
            let n = (self.bytes.len() - self.pos).min(buf.len());
            buf[..n].copy_from_slice(&self.bytes[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    struct WouldBlockReader;

    impl Read for WouldBlockReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(ErrorKind::WouldBlock))
        }
    }
}
