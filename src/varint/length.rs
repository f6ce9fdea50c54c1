//! Length varint: big-endian base-128, continuation bit on all but the last group.

use bytes::BufMut;

use crate::error::Y3Error;
use crate::header::flags::MAX_LENGTH;

/// Maximum number of bytes a length varint may occupy (31 value bits / 7).
pub const MAX_LENGTH_VARINT_BYTES: usize = 5;

const CONTINUATION: u8 = 0x80;
const GROUP_MASK: u8 = 0x7F;

/// Returns the canonical encoded size of `value`, at least one byte.
pub fn encoded_len(value: u32) -> usize {
    let bits = (u32::BITS - value.leading_zeros()) as usize;
    bits.div_ceil(7).max(1)
}

/// Writes `value` as a minimal-length varint, most significant group first.
pub fn put_length(buf: &mut impl BufMut, value: u32) {
    for group in (0..encoded_len(value)).rev() {
        let bits = (value >> (7 * group)) as u8 & GROUP_MASK;
        buf.put_u8(if group == 0 { bits } else { bits | CONTINUATION });
    }
}

/// Incremental length-varint decoder, fed one byte at a time.
///
/// Used by every reader in the crate so slice decoding and stream decoding
/// accept exactly the same inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LengthDecoder {
    value: u32,
    consumed: usize,
}

impl LengthDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bytes pushed so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Feeds the next byte. Returns `Some(length)` once the terminating byte
    /// (bit 7 clear) has been seen.
    pub fn push(&mut self, byte: u8) -> Result<Option<u32>, Y3Error> {
        self.consumed += 1;
        if self.consumed > MAX_LENGTH_VARINT_BYTES {
            return Err(Y3Error::malformed(format!(
                "length varint longer than {MAX_LENGTH_VARINT_BYTES} bytes"
            )));
        }

        let next = (u64::from(self.value) << 7) | u64::from(byte & GROUP_MASK);
        if next > u64::from(MAX_LENGTH) {
            return Err(Y3Error::malformed("length varint overflows a signed 32-bit length"));
        }
        self.value = next as u32;

        if byte & CONTINUATION == 0 {
            Ok(Some(self.value))
        } else {
            Ok(None)
        }
    }
}

/// Decodes a length varint from the front of `buf`.
///
/// Returns the decoded length and the number of bytes it occupied.
pub fn decode_length(buf: &[u8]) -> Result<(u32, usize), Y3Error> {
    let mut decoder = LengthDecoder::new();
    for &byte in buf {
        if let Some(length) = decoder.push(byte)? {
            return Ok((length, decoder.consumed()));
        }
    }
    Err(Y3Error::malformed("unterminated length varint"))
}
