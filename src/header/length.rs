//! The Length field: byte count of a packet's Value.

use bytes::BufMut;

use super::flags::MAX_LENGTH;
use crate::error::Y3Error;
use crate::varint;

/// Exact byte count of a Value, bounded to `[0, MAX_LENGTH]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Length(u32);

impl Length {
    pub fn new(len: usize) -> Result<Self, Y3Error> {
        u32::try_from(len)
            .ok()
            .filter(|&l| l <= MAX_LENGTH)
            .map(Self)
            .ok_or(Y3Error::LengthOverflow(len))
    }

    /// Value size in bytes.
    pub const fn get(self) -> usize {
        self.0 as usize
    }

    /// Size of the encoded length varint.
    pub fn encoded_len(self) -> usize {
        varint::encoded_len(self.0)
    }

    pub fn put(self, buf: &mut impl BufMut) {
        varint::put_length(buf, self.0);
    }
}

impl TryFrom<u32> for Length {
    type Error = Y3Error;

    fn try_from(len: u32) -> Result<Self, Self::Error> {
        Self::new(len as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn bounds() {
        assert_eq!(Length::new(0).unwrap().get(), 0);
        assert_eq!(Length::new(MAX_LENGTH as usize).unwrap().encoded_len(), 5);
        assert!(matches!(
            Length::new(MAX_LENGTH as usize + 1),
            Err(Y3Error::LengthOverflow(_))
        ));
        assert!(Length::try_from(u32::MAX).is_err());
    }

    #[test]
    fn put_writes_varint() {
        let mut buf = BytesMut::new();
        Length::new(255).unwrap().put(&mut buf);
        assert_eq!(&buf[..], &[0x81, 0x7F]);
    }
}
