//! Trimmed numeric payloads for primitive packets.
//!
//! Integers are written as their minimal big-endian two's-complement form. An
//! unsigned value whose minimal form starts with a set bit gets a `0x00` guard
//! byte so it is not mistaken for a negative number. Floats keep their
//! IEEE-754 big-endian bit pattern with trailing zero bytes stripped. `true`
//! is a single `0x01`, `false` is empty.

use bytes::BufMut;

use crate::error::Y3Error;

pub fn put_i32(buf: &mut impl BufMut, value: i32) {
    put_signed(buf, i64::from(value));
}

pub fn put_i64(buf: &mut impl BufMut, value: i64) {
    put_signed(buf, value);
}

pub fn put_u32(buf: &mut impl BufMut, value: u32) {
    put_unsigned(buf, u64::from(value));
}

pub fn put_u64(buf: &mut impl BufMut, value: u64) {
    put_unsigned(buf, value);
}

pub fn put_f32(buf: &mut impl BufMut, value: f32) {
    put_trimmed(buf, &value.to_bits().to_be_bytes());
}

pub fn put_f64(buf: &mut impl BufMut, value: f64) {
    put_trimmed(buf, &value.to_bits().to_be_bytes());
}

pub fn put_bool(buf: &mut impl BufMut, value: bool) {
    if value {
        buf.put_u8(0x01);
    }
}

/// Drops leading bytes that are pure sign extension of the byte after them.
fn put_signed(buf: &mut impl BufMut, value: i64) {
    let bytes = value.to_be_bytes();
    let mut start = 0;
    while start < bytes.len() - 1 {
        let next_negative = bytes[start + 1] & 0x80 != 0;
        let redundant = match bytes[start] {
            0x00 => !next_negative,
            0xFF => next_negative,
            _ => false,
        };
        if !redundant {
            break;
        }
        start += 1;
    }
    buf.put_slice(&bytes[start..]);
}

fn put_unsigned(buf: &mut impl BufMut, value: u64) {
    let bytes = value.to_be_bytes();
    let start = bytes
        .iter()
        .position(|&b| b != 0)
        .unwrap_or(bytes.len() - 1);
    if bytes[start] & 0x80 != 0 {
        buf.put_u8(0x00);
    }
    buf.put_slice(&bytes[start..]);
}

fn put_trimmed(buf: &mut impl BufMut, bytes: &[u8]) {
    let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    buf.put_slice(&bytes[..end]);
}

pub fn decode_i32(buf: &[u8]) -> Result<i32, Y3Error> {
    decode_int(buf, 4, true, "i32").map(|v| v as u32 as i32)
}

pub fn decode_i64(buf: &[u8]) -> Result<i64, Y3Error> {
    decode_int(buf, 8, true, "i64").map(|v| v as i64)
}

pub fn decode_u32(buf: &[u8]) -> Result<u32, Y3Error> {
    decode_int(buf, 4, false, "u32").map(|v| v as u32)
}

pub fn decode_u64(buf: &[u8]) -> Result<u64, Y3Error> {
    decode_int(buf, 8, false, "u64")
}

pub fn decode_f32(buf: &[u8]) -> Result<f32, Y3Error> {
    let mut bytes = [0u8; 4];
    pad_right(buf, &mut bytes, "f32")?;
    Ok(f32::from_bits(u32::from_be_bytes(bytes)))
}

pub fn decode_f64(buf: &[u8]) -> Result<f64, Y3Error> {
    let mut bytes = [0u8; 8];
    pad_right(buf, &mut bytes, "f64")?;
    Ok(f64::from_bits(u64::from_be_bytes(bytes)))
}

/// Any single byte other than `0x01` reads as `false`.
pub fn decode_bool(buf: &[u8]) -> Result<bool, Y3Error> {
    match buf {
        [] => Ok(false),
        [b] => Ok(*b == 0x01),
        _ => Err(Y3Error::NumericOverflow {
            ty: "bool",
            len: buf.len(),
        }),
    }
}

fn pad_right(buf: &[u8], out: &mut [u8], ty: &'static str) -> Result<(), Y3Error> {
    if buf.len() > out.len() {
        return Err(Y3Error::NumericOverflow { ty, len: buf.len() });
    }
    out[..buf.len()].copy_from_slice(buf);
    Ok(())
}

/// Sign-extends `buf` from its leading bit into a `width`-byte integer.
///
/// Bytes beyond `width` are accepted only if they carry no information: the
/// sign fill for signed targets, the `0x00` guard for unsigned ones.
fn decode_int(buf: &[u8], width: usize, signed: bool, ty: &'static str) -> Result<u64, Y3Error> {
    if buf.is_empty() {
        return Ok(0);
    }

    let (excess, body) = buf.split_at(buf.len().saturating_sub(width));
    let negative = body[0] & 0x80 != 0;
    let guarded = !signed && !excess.is_empty();
    let fill = if negative && !guarded { 0xFF } else { 0x00 };
    if excess.iter().any(|&b| b != fill) {
        return Err(Y3Error::NumericOverflow { ty, len: buf.len() });
    }

    let init = if fill == 0xFF { u64::MAX } else { 0 };
    Ok(body.iter().fold(init, |acc, &b| (acc << 8) | u64::from(b)))
}
