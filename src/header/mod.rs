//! Packet header: one Tag byte followed by the Length varint.

pub mod flags;
pub mod length;
pub mod tag;

use std::io::{self, Read};

use crate::error::Y3Error;
use crate::varint::{LengthDecoder, MAX_LENGTH_VARINT_BYTES};

pub use length::Length;
pub use tag::Tag;

const MAX_HEADER_SIZE: usize = Tag::SIZE + MAX_LENGTH_VARINT_BYTES;

/// Tag and Length of one packet together with their exact wire bytes.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Header {
    tag: Tag,
    length: Length,
    raw: [u8; MAX_HEADER_SIZE],
    raw_len: usize,
}

impl Header {
    /// Builds a header with a canonical length varint.
    pub fn new(tag: Tag, length: Length) -> Self {
        let mut raw = [0u8; MAX_HEADER_SIZE];
        raw[0] = tag.as_byte();
        let mut rest = &mut raw[Tag::SIZE..];
        length.put(&mut rest);
        Self {
            tag,
            length,
            raw,
            raw_len: Tag::SIZE + length.encoded_len(),
        }
    }

    /// Parses a header from the front of `buf`.
    pub fn parse(buf: &[u8]) -> Result<Self, Y3Error> {
        let Some((&tag_byte, rest)) = buf.split_first() else {
            return Err(Y3Error::malformed("empty buffer, expected a tag byte"));
        };
        let mut decoder = LengthDecoder::new();
        for &byte in rest {
            if let Some(len) = decoder.push(byte)? {
                return Ok(Self::from_wire(tag_byte, len, &buf[..Tag::SIZE + decoder.consumed()]));
            }
        }
        Err(Y3Error::malformed("buffer ended inside the length varint"))
    }

    fn from_wire(tag_byte: u8, len: u32, wire: &[u8]) -> Self {
        let mut raw = [0u8; MAX_HEADER_SIZE];
        raw[..wire.len()].copy_from_slice(wire);
        Self {
            tag: Tag::from_byte(tag_byte),
            // LengthDecoder never yields more than MAX_LENGTH.
            length: Length::new(len as usize).unwrap_or_default(),
            raw,
            raw_len: wire.len(),
        }
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn seq_id(&self) -> u8 {
        self.tag.seq_id()
    }

    pub fn is_node(&self) -> bool {
        self.tag.is_node()
    }

    pub fn length(&self) -> Length {
        self.length
    }

    /// Size of the Value in bytes.
    pub fn vsize(&self) -> usize {
        self.length.get()
    }

    /// Size of the header itself (Tag + Length varint).
    pub fn size(&self) -> usize {
        self.raw_len
    }

    /// Size of the whole packet (header + Value).
    pub fn packet_size(&self) -> usize {
        self.raw_len + self.length.get()
    }

    /// The header exactly as it appears on the wire.
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw[..self.raw_len]
    }
}

impl std::fmt::Debug for Header {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Header")
            .field("tag", &self.tag)
            .field("length", &self.length.get())
            .field("raw", &self.as_bytes())
            .finish()
    }
}

/// Reads one header off `reader`, one byte at a time so nothing past the
/// header is consumed.
///
/// Returns `Ok(None)` if the stream ends cleanly before the Tag byte.
pub fn read_header<R: Read + ?Sized>(reader: &mut R) -> Result<Option<Header>, Y3Error> {
    let Some(tag_byte) = read_byte(reader)? else {
        return Ok(None);
    };

    let mut wire = [0u8; MAX_HEADER_SIZE];
    wire[0] = tag_byte;
    let mut decoder = LengthDecoder::new();
    loop {
        let Some(byte) = read_byte(reader)? else {
            tracing::debug!(tag = tag_byte, read = decoder.consumed(), "stream ended inside a length varint");
            return Err(Y3Error::malformed("stream ended inside the length varint"));
        };
        let done = decoder.push(byte)?;
        wire[decoder.consumed()] = byte;
        if let Some(len) = done {
            let header = Header::from_wire(tag_byte, len, &wire[..Tag::SIZE + decoder.consumed()]);
            tracing::trace!(seq_id = header.seq_id(), length = header.vsize(), "read packet header");
            return Ok(Some(header));
        }
    }
}

/// Reads a single byte, retrying on `Interrupted`. `Ok(None)` means EOF.
pub(crate) fn read_byte<R: Read + ?Sized>(reader: &mut R) -> io::Result<Option<u8>> {
    let mut byte = [0u8; 1];
    loop {
        match reader.read(&mut byte) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(byte[0])),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn new_header_bytes() {
        let header = Header::new(Tag::node(0x04).unwrap(), Length::new(255).unwrap());
        assert_eq!(header.as_bytes(), &[0x84, 0x81, 0x7F]);
        assert_eq!(header.size(), 3);
        assert_eq!(header.packet_size(), 258);
    }

    #[test]
    fn parse_keeps_wire_bytes() {
        let header = Header::parse(&[0x0A, 0x80, 0x02, 0xFF]).unwrap();
        assert_eq!(header.seq_id(), 0x0A);
        assert_eq!(header.vsize(), 2);
        assert_eq!(header.as_bytes(), &[0x0A, 0x80, 0x02]);
    }

    #[test]
    fn parse_failures() {
        assert!(Header::parse(&[]).unwrap_err().is_malformed());
        assert!(Header::parse(&[0x01]).unwrap_err().is_malformed());
        assert!(Header::parse(&[0x01, 0x81]).unwrap_err().is_malformed());
    }

    #[test]
    fn read_header_stops_after_length() {
        let mut cursor = Cursor::new(vec![0x11, 0x03, 0x01, 0x02, 0x03]);
        let header = read_header(&mut cursor).unwrap().unwrap();
        assert_eq!(header.seq_id(), 0x11);
        assert_eq!(header.vsize(), 3);
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn read_header_clean_eof() {
        let mut cursor = Cursor::new(Vec::new());
        assert!(read_header(&mut cursor).unwrap().is_none());
    }

    #[test]
    fn read_header_truncated_length() {
        let mut cursor = Cursor::new(vec![0x11, 0x81]);
        assert!(read_header(&mut cursor).unwrap_err().is_malformed());
    }
}
