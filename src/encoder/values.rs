//! Typed Value setters. Each one replaces whatever Value was set before.

use bytes::{BufMut, Bytes};

use super::Encoder;
use crate::varint::numeric;

impl Encoder<'_> {
    pub fn set_i32(&mut self, value: i32) {
        self.replace_value(|buf| numeric::put_i32(buf, value));
    }

    pub fn set_u32(&mut self, value: u32) {
        self.replace_value(|buf| numeric::put_u32(buf, value));
    }

    pub fn set_i64(&mut self, value: i64) {
        self.replace_value(|buf| numeric::put_i64(buf, value));
    }

    pub fn set_u64(&mut self, value: u64) {
        self.replace_value(|buf| numeric::put_u64(buf, value));
    }

    pub fn set_f32(&mut self, value: f32) {
        self.replace_value(|buf| numeric::put_f32(buf, value));
    }

    pub fn set_f64(&mut self, value: f64) {
        self.replace_value(|buf| numeric::put_f64(buf, value));
    }

    pub fn set_bool(&mut self, value: bool) {
        self.replace_value(|buf| numeric::put_bool(buf, value));
    }

    /// Stores the UTF-8 bytes of `value` as-is.
    pub fn set_utf8_str(&mut self, value: &str) {
        self.replace_value(|buf| buf.put_slice(value.as_bytes()));
    }

    pub fn set_bytes(&mut self, value: impl Into<Bytes>) {
        let value = value.into();
        self.replace_value(|buf| buf.put_slice(&value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(seq_id: u8, set: impl FnOnce(&mut Encoder<'static>)) -> Bytes {
        let mut encoder = Encoder::primitive(seq_id).unwrap();
        set(&mut encoder);
        encoder.packet().unwrap().bytes()
    }

    #[test]
    fn integers() {
        assert_eq!(&encode(0x0A, |e| e.set_i32(255))[..], &[0x0A, 0x02, 0x00, 0xFF]);
        assert_eq!(&encode(0x01, |e| e.set_i32(-1))[..], &[0x01, 0x01, 0xFF]);
        assert_eq!(&encode(0x01, |e| e.set_u32(255))[..], &[0x01, 0x02, 0x00, 0xFF]);
        assert_eq!(&encode(0x01, |e| e.set_i64(-128))[..], &[0x01, 0x01, 0x80]);
        assert_eq!(&encode(0x01, |e| e.set_u64(1))[..], &[0x01, 0x01, 0x01]);
    }

    #[test]
    fn bools() {
        assert_eq!(&encode(0x2C, |e| e.set_bool(true))[..], &[0x2C, 0x01, 0x01]);
        assert_eq!(&encode(0x2C, |e| e.set_bool(false))[..], &[0x2C, 0x00]);
    }

    #[test]
    fn floats() {
        assert_eq!(&encode(0x03, |e| e.set_f64(0.0))[..], &[0x03, 0x00]);
        assert_eq!(&encode(0x03, |e| e.set_f32(1.0))[..], &[0x03, 0x02, 0x3F, 0x80]);
    }

    #[test]
    fn strings_and_bytes() {
        assert_eq!(&encode(0x05, |e| e.set_utf8_str("yo"))[..], &[0x05, 0x02, b'y', b'o']);
        assert_eq!(
            &encode(0x05, |e| e.set_bytes(Bytes::from_static(&[0xDE, 0xAD])))[..],
            &[0x05, 0x02, 0xDE, 0xAD]
        );
    }

    #[test]
    fn setters_replace_the_value() {
        let packet = encode(0x01, |e| {
            e.add_val_bytes(&[0x01, 0x02, 0x03]).unwrap();
            e.set_i32(7);
        });
        assert_eq!(&packet[..], &[0x01, 0x01, 0x07]);

        let mut encoder = Encoder::primitive(0x01).unwrap();
        encoder.set_val_reader(std::io::empty(), 4).unwrap();
        encoder.set_bool(true);
        let packet = encoder.packet().unwrap();
        assert!(!packet.is_streamed());
        assert!(packet.to_bool().unwrap());
    }
}
