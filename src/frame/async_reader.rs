//! Frame reading over a tokio `AsyncRead`.

use std::io;

use bytes::{BufMut, Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

use super::reader::{check_length, DEFAULT_BATCH_SIZE};
use crate::error::Y3Error;
use crate::header::flags::MAX_LENGTH;
use crate::header::{Header, Tag};
use crate::varint::LengthDecoder;

/// Reads `[Tag][Length][Value]` frames from an `AsyncRead` stream.
///
/// Same framing rules and options as [`FrameReader`](super::FrameReader).
#[derive(Debug)]
pub struct AsyncFrameReader<R> {
    reader: R,
    batch_size: usize,
    max_length: usize,
}

impl<R: AsyncRead + Unpin> AsyncFrameReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            batch_size: DEFAULT_BATCH_SIZE,
            max_length: MAX_LENGTH as usize,
        }
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Reads the next frame. Fails as malformed if the stream is already at its end.
    pub async fn read_packet(&mut self) -> Result<Bytes, Y3Error> {
        self.next_packet().await?.ok_or_else(|| {
            tracing::debug!("stream ended before a tag byte");
            Y3Error::malformed("stream ended before a tag byte")
        })
    }

    /// Reads the next frame, or `None` on a clean end-of-stream.
    pub async fn next_packet(&mut self) -> Result<Option<Bytes>, Y3Error> {
        let Some(header) = self.read_header().await? else {
            return Ok(None);
        };
        check_length(&header, self.max_length)?;

        let len = header.vsize();
        let mut frame = BytesMut::with_capacity(header.size() + len.min(self.batch_size));
        frame.put_slice(header.as_bytes());

        let mut read = 0;
        while read < len {
            let want = (len - read).min(self.batch_size);
            frame.reserve(want);
            let n = (&mut self.reader).take(want as u64).read_buf(&mut frame).await?;
            if n == 0 {
                tracing::debug!(seq_id = header.seq_id(), length = len, read, "stream ended inside a value");
                return Err(Y3Error::malformed(format!(
                    "stream ended after {read} of {len} value bytes"
                )));
            }
            read += n;
        }
        Ok(Some(frame.freeze()))
    }

    async fn read_header(&mut self) -> Result<Option<Header>, Y3Error> {
        let tag = match self.reader.read_u8().await {
            Ok(byte) => byte,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut wire = BytesMut::with_capacity(Tag::SIZE + crate::varint::MAX_LENGTH_VARINT_BYTES);
        wire.put_u8(tag);
        let mut decoder = LengthDecoder::new();
        loop {
            let byte = match self.reader.read_u8().await {
                Ok(byte) => byte,
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    tracing::debug!(tag, read = decoder.consumed(), "stream ended inside a length varint");
                    return Err(Y3Error::malformed("stream ended inside the length varint"));
                }
                Err(e) => return Err(e.into()),
            };
            let done = decoder.push(byte)?;
            wire.put_u8(byte);
            if done.is_some() {
                let header = Header::parse(&wire)?;
                tracing::trace!(seq_id = header.seq_id(), length = header.vsize(), "read packet header");
                return Ok(Some(header));
            }
        }
    }

    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}
