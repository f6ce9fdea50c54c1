//! Bounded composite reader over a buffered prefix and a streamed tail.

use std::fmt;
use std::io::{self, Read};

use bytes::{Buf, Bytes};

/// Serves a buffered prefix, then at most `remaining` bytes from a source.
///
/// Once both parts are exhausted every read returns `Ok(0)`, whatever the
/// source still holds. A consumer of one packet therefore never reads into
/// the next packet sharing the same source.
pub struct PacketReader<'a> {
    prefix: Bytes,
    source: Option<Box<dyn Read + 'a>>,
    remaining: usize,
}

impl<'a> PacketReader<'a> {
    /// A reader over fully-buffered bytes.
    pub fn buffered(bytes: Bytes) -> Self {
        Self {
            prefix: bytes,
            source: None,
            remaining: 0,
        }
    }

    /// A reader over `prefix` followed by exactly `size` bytes of `source`.
    pub fn new(prefix: Bytes, source: Box<dyn Read + 'a>, size: usize) -> Self {
        Self {
            prefix,
            source: Some(source),
            remaining: size,
        }
    }

    /// Bytes left before the reader reports end-of-input.
    pub fn len(&self) -> usize {
        self.prefix.remaining() + self.remaining
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Read for PacketReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        if self.prefix.has_remaining() {
            let n = buf.len().min(self.prefix.remaining());
            self.prefix.copy_to_slice(&mut buf[..n]);
            return Ok(n);
        }

        if self.remaining == 0 {
            return Ok(0);
        }
        let Some(source) = self.source.as_mut() else {
            return Ok(0);
        };
        let bound = buf.len().min(self.remaining);
        let n = source.read(&mut buf[..bound])?;
        self.remaining -= n;
        Ok(n)
    }
}

impl fmt::Debug for PacketReader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PacketReader")
            .field("prefix", &self.prefix.len())
            .field("streamed", &self.source.is_some())
            .field("remaining", &self.remaining)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Yields at most `step` bytes per read.
    struct Trickle<R> {
        inner: R,
        step: usize,
    }

    impl<R: Read> Read for Trickle<R> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = buf.len().min(self.step);
            self.inner.read(&mut buf[..n])
        }
    }

    #[test]
    fn buffered_only() {
        let mut reader = PacketReader::buffered(Bytes::from_static(&[1, 2, 3]));
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, vec![1, 2, 3]);
        assert!(reader.is_empty());
    }

    #[test]
    fn prefix_then_bounded_source() {
        let source = Cursor::new(vec![4, 5, 6, 7, 8]);
        let mut reader = PacketReader::new(Bytes::from_static(&[1, 2, 3]), Box::new(source), 3);
        assert_eq!(reader.len(), 6);
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(reader.read(&mut [0u8; 4]).unwrap(), 0);
    }

    #[test]
    fn bound_holds_with_small_reads() {
        let source = Trickle {
            inner: Cursor::new(vec![9u8; 100]),
            step: 3,
        };
        let mut reader = PacketReader::new(Bytes::from_static(&[0x12, 0x05]), Box::new(source), 5);
        let mut out = Vec::new();
        let mut chunk = [0u8; 2];
        loop {
            let n = reader.read(&mut chunk).unwrap();
            if n == 0 {
                break;
            }
            out.extend_from_slice(&chunk[..n]);
        }
        assert_eq!(out, vec![0x12, 0x05, 9, 9, 9, 9, 9]);
    }

    #[test]
    fn shared_source_is_left_at_boundary() {
        let mut source = Cursor::new(vec![1, 2, 3, 4, 5]);
        {
            let mut reader = PacketReader::new(Bytes::new(), Box::new(&mut source), 2);
            let mut out = Vec::new();
            reader.read_to_end(&mut out).unwrap();
            assert_eq!(out, vec![1, 2]);
        }
        assert_eq!(source.position(), 2);
    }
}
