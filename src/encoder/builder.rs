//! Packet builder: assembles Tag, Length and Value into a `StreamPacket`.

use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;

use bytes::{BufMut, BytesMut};

use crate::error::Y3Error;
use crate::header::{Header, Length, Tag};
use crate::stream::{StreamPacket, Value};

const TAG_READY: u8 = 0b001;
const LENGTH_READY: u8 = 0b010;
const VALUE_READY: u8 = 0b100;
const BUILD_COMPLETE: u8 = TAG_READY | LENGTH_READY | VALUE_READY;

/// Reader-backed end of the Value.
struct Source<'a> {
    reader: Box<dyn Read + 'a>,
    size: usize,
}

enum Tail<'a> {
    /// Value is fully buffered.
    Empty,
    /// Raw value bytes supplied by `set_val_reader`.
    Reader(Source<'a>),
    /// Value of a streamed child; nothing may follow it.
    Child(Source<'a>),
}

/// Builds one packet.
///
/// The Tag comes from [`set_seq_id`](Self::set_seq_id); the Value from raw
/// bytes, typed setters, child packets or a reader. [`packet`](Self::packet)
/// computes the Length and fails with [`Y3Error::BuildIncomplete`] unless Tag
/// and Value have both been set.
///
/// ```
/// use y3::Encoder;
///
/// let mut child = Encoder::primitive(0x01).unwrap();
/// child.set_i32(-1);
///
/// let mut node = Encoder::node(0x04).unwrap();
/// node.add_packet(child.packet().unwrap()).unwrap();
/// let packet = node.packet().unwrap();
/// assert_eq!(&packet.bytes()[..], &[0x84, 0x03, 0x01, 0x01, 0xFF]);
/// ```
pub struct Encoder<'a> {
    tag: Option<Tag>,
    state: u8,
    value: BytesMut,
    tail: Tail<'a>,
    children: BTreeMap<u8, usize>,
}

impl Default for Encoder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Encoder<'a> {
    pub fn new() -> Self {
        Self {
            tag: None,
            state: 0,
            value: BytesMut::new(),
            tail: Tail::Empty,
            children: BTreeMap::new(),
        }
    }

    /// An encoder for a node packet with the given sequence ID.
    pub fn node(seq_id: u8) -> Result<Self, Y3Error> {
        let mut encoder = Self::new();
        encoder.set_seq_id(seq_id, true)?;
        Ok(encoder)
    }

    /// An encoder for a primitive packet with the given sequence ID.
    pub fn primitive(seq_id: u8) -> Result<Self, Y3Error> {
        let mut encoder = Self::new();
        encoder.set_seq_id(seq_id, false)?;
        Ok(encoder)
    }

    /// Fixes the Tag. Fails if `seq_id` is outside `[0, 0x3F]`.
    pub fn set_seq_id(&mut self, seq_id: u8, is_node: bool) -> Result<(), Y3Error> {
        self.tag = Some(Tag::new(seq_id, is_node)?);
        self.state |= TAG_READY;
        Ok(())
    }

    /// Current Value size, streamed tail included.
    pub fn size(&self) -> usize {
        self.value.len() + self.tail_size()
    }

    /// Sequence IDs of the children added so far.
    pub fn children(&self) -> impl Iterator<Item = u8> + '_ {
        self.children.keys().copied()
    }

    /// Byte offset of a child within the Value.
    pub fn child_offset(&self, seq_id: u8) -> Option<usize> {
        self.children.get(&seq_id).copied()
    }

    /// Appends raw bytes to the buffered Value.
    ///
    /// A reader set with `set_val_reader` is dropped: the packet goes back to
    /// fully-buffered mode. Fails after a streamed child has been added.
    pub fn add_val_bytes(&mut self, buf: &[u8]) -> Result<(), Y3Error> {
        match self.tail {
            Tail::Child(_) => return Err(Y3Error::InvalidAdding),
            Tail::Reader(_) => {
                tracing::trace!(tag = ?self.tag, "dropping value reader for buffered bytes");
                self.tail = Tail::Empty;
            }
            Tail::Empty => {}
        }
        self.value.put_slice(buf);
        self.state |= VALUE_READY;
        Ok(())
    }

    /// Makes the last `size` bytes of the Value come from `reader`.
    pub fn set_val_reader(&mut self, reader: impl Read + 'a, size: usize) -> Result<(), Y3Error> {
        if matches!(self.tail, Tail::Child(_)) {
            return Err(Y3Error::InvalidAdding);
        }
        self.tail = Tail::Reader(Source {
            reader: Box::new(reader),
            size,
        });
        self.state |= VALUE_READY;
        Ok(())
    }

    /// Appends a child packet to a node's Value.
    ///
    /// A streamed child is handed to [`add_stream_packet`](Self::add_stream_packet).
    pub fn add_packet(&mut self, child: StreamPacket<'a>) -> Result<(), Y3Error> {
        if child.is_streamed() {
            return self.add_stream_packet(child);
        }
        self.ensure_node()?;
        self.ensure_open()?;

        self.children.insert(child.seq_id(), self.value.len());
        self.value.put_slice(child.header_bytes());
        self.value.put_slice(child.value_bytes()?);
        self.state |= VALUE_READY;
        Ok(())
    }

    /// Appends a child whose Value may still be behind a reader.
    ///
    /// The child's header and buffered prefix are copied; its source becomes
    /// the tail of this packet's Value, so nothing may be added after it.
    pub fn add_stream_packet(&mut self, child: StreamPacket<'a>) -> Result<(), Y3Error> {
        self.ensure_node()?;
        self.ensure_open()?;

        self.children.insert(child.seq_id(), self.value.len());
        let (header, value) = child.into_parts();
        self.value.put_slice(header.as_bytes());
        match value {
            Value::Buffered(bytes) => self.value.put_slice(&bytes),
            Value::Streamed {
                prefix,
                source,
                size,
            } => {
                self.value.put_slice(&prefix);
                self.tail = Tail::Child(Source {
                    reader: source,
                    size,
                });
            }
        }
        self.state |= VALUE_READY;
        Ok(())
    }

    /// Finalizes the packet.
    pub fn packet(mut self) -> Result<StreamPacket<'a>, Y3Error> {
        let length = Length::new(self.size())?;
        self.state |= LENGTH_READY;
        if self.state != BUILD_COMPLETE {
            return Err(Y3Error::BuildIncomplete);
        }
        let tag = self.tag.ok_or(Y3Error::BuildIncomplete)?;

        let header = Header::new(tag, length);
        let prefix = self.value.freeze();
        let value = match self.tail {
            Tail::Empty => Value::Buffered(prefix),
            Tail::Reader(source) | Tail::Child(source) => Value::Streamed {
                prefix,
                source: source.reader,
                size: source.size,
            },
        };

        let packet = StreamPacket::from_parts(header, value);
        tracing::trace!(%tag, length = length.get(), streamed = packet.is_streamed(), "built packet");
        Ok(packet)
    }

    /// Replaces the whole Value with a primitive payload.
    pub(super) fn replace_value(&mut self, write: impl FnOnce(&mut BytesMut)) {
        self.value.clear();
        self.tail = Tail::Empty;
        self.children.clear();
        write(&mut self.value);
        self.state |= VALUE_READY;
    }

    fn tail_size(&self) -> usize {
        match &self.tail {
            Tail::Empty => 0,
            Tail::Reader(source) | Tail::Child(source) => source.size,
        }
    }

    fn ensure_node(&self) -> Result<(), Y3Error> {
        match self.tag {
            Some(tag) if tag.is_node() => Ok(()),
            _ => Err(Y3Error::NotNodeMode),
        }
    }

    fn ensure_open(&self) -> Result<(), Y3Error> {
        match self.tail {
            Tail::Empty => Ok(()),
            Tail::Reader(_) | Tail::Child(_) => Err(Y3Error::InvalidAdding),
        }
    }
}

impl fmt::Debug for Encoder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encoder")
            .field("tag", &self.tag)
            .field("state", &format_args!("{:#05b}", self.state))
            .field("buffered", &self.value.len())
            .field("streamed", &self.tail_size())
            .field("children", &self.children)
            .finish()
    }
}
