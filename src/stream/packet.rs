//! `StreamPacket`: one packet whose Value is either buffered or streamed.

use std::fmt;
use std::io::Read;

use bytes::{BufMut, Bytes, BytesMut};

use super::reader::PacketReader;
use crate::error::Y3Error;
use crate::header::{Header, Length, Tag};
use crate::packet::{self, Packet};
use crate::varint::numeric;

/// Where a packet's Value bytes live.
pub enum Value<'a> {
    /// The whole Value is in memory.
    Buffered(Bytes),
    /// `prefix` is in memory; the remaining `size` bytes are read on demand
    /// from `source`.
    Streamed {
        prefix: Bytes,
        source: Box<dyn Read + 'a>,
        size: usize,
    },
}

impl Value<'_> {
    /// Total Value size, buffered and streamed parts together.
    pub fn len(&self) -> usize {
        match self {
            Self::Buffered(bytes) => bytes.len(),
            Self::Streamed { prefix, size, .. } => prefix.len() + size,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buffered(bytes) => f.debug_tuple("Buffered").field(bytes).finish(),
            Self::Streamed { prefix, size, .. } => f
                .debug_struct("Streamed")
                .field("prefix", prefix)
                .field("size", size)
                .finish_non_exhaustive(),
        }
    }
}

/// A packet as produced by the [`Encoder`](crate::Encoder) or the
/// [`StreamDecoder`](crate::StreamDecoder).
///
/// In chunked mode the Value is backed by a reader bounded to the declared
/// size; it can be consumed once, through [`into_reader`](Self::into_reader),
/// [`into_value_reader`](Self::into_value_reader) or
/// [`into_source`](Self::into_source).
#[derive(Debug)]
pub struct StreamPacket<'a> {
    header: Header,
    value: Value<'a>,
}

impl<'a> StreamPacket<'a> {
    pub(crate) fn from_parts(header: Header, value: Value<'a>) -> Self {
        Self { header, value }
    }

    /// A fully-buffered packet with the given Tag and Value bytes.
    pub fn buffered(tag: Tag, value: Bytes) -> Result<Self, Y3Error> {
        let header = Header::new(tag, Length::new(value.len())?);
        Ok(Self::from_parts(header, Value::Buffered(value)))
    }

    pub(crate) fn into_parts(self) -> (Header, Value<'a>) {
        (self.header, self.value)
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn tag(&self) -> Tag {
        self.header.tag()
    }

    pub fn seq_id(&self) -> u8 {
        self.header.seq_id()
    }

    pub fn is_node(&self) -> bool {
        self.header.is_node()
    }

    /// True if part of the Value is still behind a source reader.
    pub fn is_streamed(&self) -> bool {
        matches!(self.value, Value::Streamed { .. })
    }

    /// Size of the whole packet (header + Value).
    pub fn size(&self) -> usize {
        self.header.packet_size()
    }

    /// Size of the Value.
    pub fn vsize(&self) -> usize {
        self.header.vsize()
    }

    pub fn value(&self) -> &Value<'a> {
        &self.value
    }

    pub fn header_bytes(&self) -> &[u8] {
        self.header.as_bytes()
    }

    /// Header followed by the buffered part of the Value. In chunked mode the
    /// streamed tail is absent.
    pub fn bytes(&self) -> Bytes {
        let buffered = match &self.value {
            Value::Buffered(bytes) => bytes,
            Value::Streamed { prefix, .. } => prefix,
        };
        let mut buf = BytesMut::with_capacity(self.header.size() + buffered.len());
        buf.put_slice(self.header.as_bytes());
        buf.put_slice(buffered);
        buf.freeze()
    }

    /// The Value, if it is fully buffered.
    pub fn value_bytes(&self) -> Result<&Bytes, Y3Error> {
        match &self.value {
            Value::Buffered(bytes) => Ok(bytes),
            Value::Streamed { .. } => Err(Y3Error::ValueNotBuffered),
        }
    }

    /// A reader over the whole packet, stopping at exactly `size()` bytes.
    pub fn into_reader(self) -> PacketReader<'a> {
        let mut prefix = BytesMut::from(self.header.as_bytes());
        match self.value {
            Value::Buffered(bytes) => {
                prefix.put_slice(&bytes);
                PacketReader::buffered(prefix.freeze())
            }
            Value::Streamed {
                prefix: buffered,
                source,
                size,
            } => {
                prefix.put_slice(&buffered);
                PacketReader::new(prefix.freeze(), source, size)
            }
        }
    }

    /// A reader over the Value only, stopping at exactly `vsize()` bytes.
    pub fn into_value_reader(self) -> PacketReader<'a> {
        match self.value {
            Value::Buffered(bytes) => PacketReader::buffered(bytes),
            Value::Streamed {
                prefix,
                source,
                size,
            } => PacketReader::new(prefix, source, size),
        }
    }

    /// The streamed tail of the Value, without the buffered prefix.
    ///
    /// Fails with [`Y3Error::NotStreamed`] on a fully-buffered packet.
    pub fn into_source(self) -> Result<PacketReader<'a>, Y3Error> {
        match self.value {
            Value::Streamed { source, size, .. } => Ok(PacketReader::new(Bytes::new(), source, size)),
            Value::Buffered(_) => Err(Y3Error::NotStreamed),
        }
    }

    /// Decodes a fully-buffered packet into a tree.
    pub fn into_tree(self) -> Result<Packet, Y3Error> {
        if self.is_streamed() {
            return Err(Y3Error::ValueNotBuffered);
        }
        let (packet, _) = packet::decode_packet(&self.bytes())?;
        Ok(packet)
    }

    pub fn to_utf8_str(&self) -> Result<&str, Y3Error> {
        Ok(std::str::from_utf8(self.value_bytes()?)?)
    }

    pub fn to_i32(&self) -> Result<i32, Y3Error> {
        numeric::decode_i32(self.value_bytes()?)
    }

    pub fn to_u32(&self) -> Result<u32, Y3Error> {
        numeric::decode_u32(self.value_bytes()?)
    }

    pub fn to_i64(&self) -> Result<i64, Y3Error> {
        numeric::decode_i64(self.value_bytes()?)
    }

    pub fn to_u64(&self) -> Result<u64, Y3Error> {
        numeric::decode_u64(self.value_bytes()?)
    }

    pub fn to_f32(&self) -> Result<f32, Y3Error> {
        numeric::decode_f32(self.value_bytes()?)
    }

    pub fn to_f64(&self) -> Result<f64, Y3Error> {
        numeric::decode_f64(self.value_bytes()?)
    }

    pub fn to_bool(&self) -> Result<bool, Y3Error> {
        numeric::decode_bool(self.value_bytes()?)
    }
}

impl From<Packet> for StreamPacket<'static> {
    fn from(packet: Packet) -> Self {
        let header = *packet.header();
        let value = packet.value_bytes();
        Self::from_parts(header, Value::Buffered(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn streamed<'a>(prefix: &'static [u8], source: impl Read + 'a, size: usize) -> StreamPacket<'a> {
        let header = Header::new(
            Tag::node(0x10).unwrap(),
            Length::new(prefix.len() + size).unwrap(),
        );
        StreamPacket::from_parts(
            header,
            Value::Streamed {
                prefix: Bytes::from_static(prefix),
                source: Box::new(source),
                size,
            },
        )
    }

    #[test]
    fn buffered_accessors() {
        let packet = StreamPacket::buffered(Tag::primitive(0x0A).unwrap(), Bytes::from_static(&[0x00, 0xFF])).unwrap();
        assert_eq!(packet.size(), 4);
        assert_eq!(packet.vsize(), 2);
        assert!(!packet.is_streamed());
        assert_eq!(&packet.bytes()[..], &[0x0A, 0x02, 0x00, 0xFF]);
        assert_eq!(packet.to_i32().unwrap(), 255);
        assert_eq!(packet.to_u64().unwrap(), 255);
        assert!(matches!(packet.into_source(), Err(Y3Error::NotStreamed)));
    }

    #[test]
    fn streamed_bytes_omit_tail() {
        let packet = streamed(&[0x12, 0x03], Cursor::new(vec![1, 2, 3]), 3);
        assert!(packet.is_streamed());
        assert_eq!(packet.vsize(), 5);
        assert_eq!(&packet.bytes()[..], &[0x90, 0x05, 0x12, 0x03]);
        assert!(matches!(packet.to_i32(), Err(Y3Error::ValueNotBuffered)));
    }

    #[test]
    fn whole_reader_is_bounded_by_size() {
        let packet = streamed(&[0x12, 0x03], Cursor::new(vec![1, 2, 3, 0xEE, 0xEE]), 3);
        let size = packet.size();
        let mut out = Vec::new();
        packet.into_reader().read_to_end(&mut out).unwrap();
        assert_eq!(out.len(), size);
        assert_eq!(out, vec![0x90, 0x05, 0x12, 0x03, 1, 2, 3]);
    }

    #[test]
    fn value_reader_and_source() {
        let packet = streamed(&[0x12, 0x03], Cursor::new(vec![1, 2, 3]), 3);
        let mut out = Vec::new();
        packet.into_value_reader().read_to_end(&mut out).unwrap();
        assert_eq!(out, vec![0x12, 0x03, 1, 2, 3]);

        let packet = streamed(&[0x12, 0x03], Cursor::new(vec![1, 2, 3]), 3);
        let mut out = Vec::new();
        packet.into_source().unwrap().read_to_end(&mut out).unwrap();
        assert_eq!(out, vec![1, 2, 3]);
    }

    #[test]
    fn tree_conversions() {
        let data = Bytes::from_static(&[0x84, 0x03, 0x01, 0x01, 0xFF]);
        let (tree, _) = Packet::decode(&data).unwrap();
        let packet = StreamPacket::from(tree.clone());
        assert_eq!(packet.bytes(), data);
        assert_eq!(packet.into_tree().unwrap(), tree);

        let chunked = streamed(&[], Cursor::new(vec![0x01, 0x00]), 2);
        assert!(chunked.into_tree().is_err());
    }
}
