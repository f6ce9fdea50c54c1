//! The two numeric wire forms of Y3.
//!
//! - [`length`]: the continuation-bit varint used for every Length field.
//! - [`numeric`]: sign-aware trimmed payloads for primitive integer, float and
//!   boolean values. These carry no continuation bits; their byte count always
//!   comes from the enclosing Length.

pub mod length;
pub mod numeric;

pub use length::{decode_length, encoded_len, put_length, LengthDecoder, MAX_LENGTH_VARINT_BYTES};
