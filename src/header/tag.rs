//! The one-byte packet Tag.

use std::fmt;

use super::flags::{MAX_SEQ_ID, NODE_FLAG, SEQ_ID_MASK};
use crate::error::Y3Error;

/// Packet Tag: 6-bit sequence ID plus the Node flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag(u8);

impl Tag {
    /// Encoded size of a Tag.
    pub const SIZE: usize = 1;

    /// Builds a Tag, failing if `seq_id` is outside `[0, 0x3F]`.
    pub fn new(seq_id: u8, is_node: bool) -> Result<Self, Y3Error> {
        if seq_id > MAX_SEQ_ID {
            return Err(Y3Error::InvalidSeqId(seq_id));
        }
        Ok(Self(if is_node { seq_id | NODE_FLAG } else { seq_id }))
    }

    pub fn node(seq_id: u8) -> Result<Self, Y3Error> {
        Self::new(seq_id, true)
    }

    pub fn primitive(seq_id: u8) -> Result<Self, Y3Error> {
        Self::new(seq_id, false)
    }

    /// Wraps a byte read off the wire. The raw byte is kept as-is so that
    /// re-emitting a decoded packet reproduces its input exactly.
    pub const fn from_byte(byte: u8) -> Self {
        Self(byte)
    }

    pub const fn seq_id(self) -> u8 {
        self.0 & SEQ_ID_MASK
    }

    pub const fn is_node(self) -> bool {
        self.0 & NODE_FLAG == NODE_FLAG
    }

    pub const fn as_byte(self) -> u8 {
        self.0
    }
}

impl From<Tag> for u8 {
    fn from(tag: Tag) -> Self {
        tag.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_node() { "node" } else { "primitive" };
        write!(f, "{kind}#{:#04x}", self.seq_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_flag_is_msb() {
        assert_eq!(Tag::node(0x00).unwrap().as_byte(), 0x80);
        assert_eq!(Tag::node(0x06).unwrap().as_byte(), 0x86);
        assert_eq!(Tag::primitive(0x00).unwrap().as_byte(), 0x00);
        assert_eq!(Tag::primitive(0x3F).unwrap().as_byte(), 0x3F);
    }

    #[test]
    fn seq_id_out_of_range() {
        assert!(matches!(Tag::new(0x40, false), Err(Y3Error::InvalidSeqId(0x40))));
        assert!(matches!(Tag::new(0xFF, true), Err(Y3Error::InvalidSeqId(0xFF))));
    }

    #[test]
    fn from_byte_masks_flags() {
        let tag = Tag::from_byte(0xC5);
        assert_eq!(tag.seq_id(), 0x05);
        assert!(tag.is_node());
        assert_eq!(tag.as_byte(), 0xC5);

        let legacy = Tag::from_byte(0x45);
        assert_eq!(legacy.seq_id(), 0x05);
        assert!(!legacy.is_node());
    }

    #[test]
    fn display() {
        assert_eq!(Tag::node(0x04).unwrap().to_string(), "node#0x04");
        assert_eq!(Tag::primitive(0x2C).unwrap().to_string(), "primitive#0x2c");
    }
}
