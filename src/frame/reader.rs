//! Reads whole `[Tag][Length][Value]` frames off a blocking byte stream.

use std::io::{self, Read};

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::Y3Error;
use crate::header::flags::MAX_LENGTH;
use crate::header::{self, Header};

/// Largest single read issued while filling a Value.
pub const DEFAULT_BATCH_SIZE: usize = 1024 * 1024;

/// Reads exactly one frame from `reader` with the default options.
///
/// Any truncation, including a stream that ends before the Tag, is malformed.
pub fn read_packet<R: Read + ?Sized>(reader: &mut R) -> Result<Bytes, Y3Error> {
    let header = header::read_header(reader)?.ok_or_else(|| {
        tracing::debug!("stream ended before a tag byte");
        Y3Error::malformed("stream ended before a tag byte")
    })?;
    read_frame(reader, header, DEFAULT_BATCH_SIZE)
}

/// Frame reader with configurable limits.
///
/// ```
/// use y3::FrameReader;
///
/// let data: &[u8] = &[0x0A, 0x02, 0x00, 0xFF, 0x2C, 0x00];
/// let mut frames = FrameReader::new(data).batch_size(64);
/// assert_eq!(&frames.next_packet().unwrap().unwrap()[..], &[0x0A, 0x02, 0x00, 0xFF]);
/// assert_eq!(&frames.next_packet().unwrap().unwrap()[..], &[0x2C, 0x00]);
/// assert!(frames.next_packet().unwrap().is_none());
/// ```
#[derive(Debug)]
pub struct FrameReader<R> {
    reader: R,
    batch_size: usize,
    max_length: usize,
}

impl<R: Read> FrameReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            batch_size: DEFAULT_BATCH_SIZE,
            max_length: MAX_LENGTH as usize,
        }
    }

    /// Caps the size of each read while filling a Value. Zero is treated as one.
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Rejects frames whose declared Length is larger than `max_length`
    /// before any Value bytes are read.
    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Reads the next frame. Fails as malformed if the stream is already at its end.
    pub fn read_packet(&mut self) -> Result<Bytes, Y3Error> {
        self.next_packet()?.ok_or_else(|| {
            tracing::debug!("stream ended before a tag byte");
            Y3Error::malformed("stream ended before a tag byte")
        })
    }

    /// Reads the next frame, or `None` if the stream ended cleanly on a
    /// frame boundary.
    pub fn next_packet(&mut self) -> Result<Option<Bytes>, Y3Error> {
        let Some(header) = header::read_header(&mut self.reader)? else {
            return Ok(None);
        };
        check_length(&header, self.max_length)?;
        read_frame(&mut self.reader, header, self.batch_size).map(Some)
    }

    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

pub(crate) fn check_length(header: &Header, max_length: usize) -> Result<(), Y3Error> {
    if header.vsize() > max_length {
        tracing::debug!(seq_id = header.seq_id(), length = header.vsize(), max_length, "frame too large");
        return Err(Y3Error::malformed(format!(
            "frame length {} exceeds the limit of {max_length}",
            header.vsize()
        )));
    }
    Ok(())
}

fn read_frame<R: Read + ?Sized>(reader: &mut R, header: Header, batch_size: usize) -> Result<Bytes, Y3Error> {
    let mut frame = BytesMut::with_capacity(header.size() + header.vsize().min(batch_size));
    frame.put_slice(header.as_bytes());
    read_value_into(reader, &mut frame, header.vsize(), batch_size)?;
    Ok(frame.freeze())
}

/// Appends exactly `len` bytes from `reader` to `buf`, growing it at most
/// `batch_size` bytes at a time.
pub(crate) fn read_value_into<R: Read + ?Sized>(
    reader: &mut R,
    buf: &mut BytesMut,
    len: usize,
    batch_size: usize,
) -> Result<(), Y3Error> {
    let batch_size = batch_size.max(1);
    let mut read = 0;
    while read < len {
        let start = buf.len();
        let want = (len - read).min(batch_size);
        buf.resize(start + want, 0);
        match reader.read(&mut buf[start..]) {
            Ok(0) => {
                buf.truncate(start);
                tracing::debug!(length = len, read, "stream ended inside a value");
                return Err(Y3Error::malformed(format!(
                    "stream ended after {read} of {len} value bytes"
                )));
            }
            Ok(n) => {
                buf.truncate(start + n);
                read += n;
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => buf.truncate(start),
            Err(e) => {
                buf.truncate(start);
                return Err(e.into());
            }
        }
    }
    Ok(())
}
