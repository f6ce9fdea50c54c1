//! Tag bit layout and wire limits.

/// Bit 7: the Value is a sequence of child packets.
pub const NODE_FLAG: u8 = 0x80;

/// Bits 0-5 carry the sequence ID. Bit 6 was an array marker in an earlier
/// wire revision; it is never set on encode and ignored on decode.
pub const SEQ_ID_MASK: u8 = 0x3F;

/// Largest sequence ID a Tag can carry.
pub const MAX_SEQ_ID: u8 = 0x3F;

/// Largest Value length the length varint may declare (non-negative i32).
pub const MAX_LENGTH: u32 = i32::MAX as u32;
