//! The decoded packet tree.
//!
//! A [`Packet`] is either a [`NodePacket`], whose Value is a run of child
//! packets, or a [`PrimitivePacket`], whose Value is an opaque payload. Both
//! keep the exact bytes they were decoded from, so `raw_bytes()` of a decoded
//! tree always equals its input.

pub mod decode;

use std::collections::BTreeMap;

use bytes::Bytes;

use crate::error::Y3Error;
use crate::header::{Header, Tag};
use crate::varint::numeric;

pub use decode::{decode_node, decode_packet, decode_primitive, decode_siblings, MAX_DEPTH};

/// A decoded packet: node or primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    Node(NodePacket),
    Primitive(PrimitivePacket),
}

impl Packet {
    /// Decodes one packet from the front of `buf`, returning it together with
    /// the number of bytes it occupied.
    pub fn decode(buf: &Bytes) -> Result<(Self, usize), Y3Error> {
        decode_packet(buf)
    }

    pub fn header(&self) -> &Header {
        match self {
            Self::Node(n) => &n.header,
            Self::Primitive(p) => &p.header,
        }
    }

    pub fn tag(&self) -> Tag {
        self.header().tag()
    }

    pub fn seq_id(&self) -> u8 {
        self.header().seq_id()
    }

    pub fn is_node(&self) -> bool {
        matches!(self, Self::Node(_))
    }

    /// Size of the whole packet.
    pub fn size(&self) -> usize {
        self.header().packet_size()
    }

    /// Size of the Value.
    pub fn vsize(&self) -> usize {
        self.header().vsize()
    }

    /// Size of Tag plus Length.
    pub fn header_len(&self) -> usize {
        self.header().size()
    }

    /// Whole-packet bytes: header followed by Value.
    pub fn raw_bytes(&self) -> &Bytes {
        match self {
            Self::Node(n) => &n.raw,
            Self::Primitive(p) => &p.raw,
        }
    }

    pub fn value_bytes(&self) -> Bytes {
        self.raw_bytes().slice(self.header().size()..)
    }

    pub fn as_node(&self) -> Option<&NodePacket> {
        match self {
            Self::Node(n) => Some(n),
            Self::Primitive(_) => None,
        }
    }

    pub fn as_primitive(&self) -> Option<&PrimitivePacket> {
        match self {
            Self::Primitive(p) => Some(p),
            Self::Node(_) => None,
        }
    }
}

impl From<NodePacket> for Packet {
    fn from(node: NodePacket) -> Self {
        Self::Node(node)
    }
}

impl From<PrimitivePacket> for Packet {
    fn from(primitive: PrimitivePacket) -> Self {
        Self::Primitive(primitive)
    }
}

/// A packet whose Value is a sequence of child packets.
///
/// Children are indexed by sequence ID in two maps, one per variant. A later
/// sibling with the same sequence ID replaces the earlier one.
#[derive(Debug, Clone, PartialEq)]
pub struct NodePacket {
    header: Header,
    raw: Bytes,
    nodes: BTreeMap<u8, NodePacket>,
    primitives: BTreeMap<u8, PrimitivePacket>,
}

impl NodePacket {
    pub(crate) fn new(header: Header, raw: Bytes) -> Self {
        Self {
            header,
            raw,
            nodes: BTreeMap::new(),
            primitives: BTreeMap::new(),
        }
    }

    /// Inserts a decoded child, last write wins.
    pub(crate) fn insert(&mut self, child: Packet) {
        let seq_id = child.seq_id();
        let replaced = match child {
            Packet::Node(n) => self.nodes.insert(seq_id, n).is_some(),
            Packet::Primitive(p) => self.primitives.insert(seq_id, p).is_some(),
        };
        if replaced {
            tracing::trace!(parent = self.seq_id(), seq_id, "duplicate sibling, keeping the later one");
        }
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn seq_id(&self) -> u8 {
        self.header.seq_id()
    }

    pub fn size(&self) -> usize {
        self.header.packet_size()
    }

    pub fn vsize(&self) -> usize {
        self.header.vsize()
    }

    pub fn raw_bytes(&self) -> &Bytes {
        &self.raw
    }

    /// The concatenated bytes of all children.
    pub fn value_bytes(&self) -> Bytes {
        self.raw.slice(self.header.size()..)
    }

    pub fn node(&self, seq_id: u8) -> Option<&NodePacket> {
        self.nodes.get(&seq_id)
    }

    pub fn primitive(&self, seq_id: u8) -> Option<&PrimitivePacket> {
        self.primitives.get(&seq_id)
    }

    pub fn nodes(&self) -> &BTreeMap<u8, NodePacket> {
        &self.nodes
    }

    pub fn primitives(&self) -> &BTreeMap<u8, PrimitivePacket> {
        &self.primitives
    }

    /// True if the node has neither node nor primitive children.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.primitives.is_empty()
    }
}

/// A packet whose Value is an opaque payload.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitivePacket {
    header: Header,
    raw: Bytes,
}

impl PrimitivePacket {
    pub(crate) fn new(header: Header, raw: Bytes) -> Self {
        Self { header, raw }
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn seq_id(&self) -> u8 {
        self.header.seq_id()
    }

    pub fn size(&self) -> usize {
        self.header.packet_size()
    }

    pub fn vsize(&self) -> usize {
        self.header.vsize()
    }

    pub fn raw_bytes(&self) -> &Bytes {
        &self.raw
    }

    pub fn value_bytes(&self) -> Bytes {
        self.raw.slice(self.header.size()..)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.raw[self.header.size()..]
    }

    pub fn to_utf8_str(&self) -> Result<&str, Y3Error> {
        Ok(std::str::from_utf8(self.as_bytes())?)
    }

    pub fn to_i32(&self) -> Result<i32, Y3Error> {
        numeric::decode_i32(self.as_bytes())
    }

    pub fn to_u32(&self) -> Result<u32, Y3Error> {
        numeric::decode_u32(self.as_bytes())
    }

    pub fn to_i64(&self) -> Result<i64, Y3Error> {
        numeric::decode_i64(self.as_bytes())
    }

    pub fn to_u64(&self) -> Result<u64, Y3Error> {
        numeric::decode_u64(self.as_bytes())
    }

    pub fn to_f32(&self) -> Result<f32, Y3Error> {
        numeric::decode_f32(self.as_bytes())
    }

    pub fn to_f64(&self) -> Result<f64, Y3Error> {
        numeric::decode_f64(self.as_bytes())
    }

    pub fn to_bool(&self) -> Result<bool, Y3Error> {
        numeric::decode_bool(self.as_bytes())
    }
}
