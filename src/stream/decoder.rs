//! Packet-at-a-time decoding straight off a live reader.

use std::io::Read;

use bytes::{Bytes, BytesMut};

use super::packet::{StreamPacket, Value};
use crate::error::Y3Error;
use crate::frame::reader::{read_value_into, DEFAULT_BATCH_SIZE};
use crate::header::{self, Header};

/// Reads packets one at a time from `R`.
///
/// Call [`read_header`](Self::read_header) first, then take the Value either
/// fully buffered with [`fullfilled_packet`](Self::fullfilled_packet) or lazily
/// with [`chunked_packet`](Self::chunked_packet). A chunked Value shares this
/// decoder's reader and must be drained before the next header is read.
#[derive(Debug)]
pub struct StreamDecoder<R> {
    reader: R,
    header: Option<Header>,
}

impl<R: Read> StreamDecoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            header: None,
        }
    }

    /// Blocks until the Tag and Length of the next packet have been read.
    ///
    /// Fails with [`Y3Error::EndOfStream`] if the reader ends before a Tag.
    pub fn read_header(&mut self) -> Result<&Header, Y3Error> {
        match header::read_header(&mut self.reader)? {
            Some(header) => Ok(self.header.insert(header)),
            None => Err(Y3Error::EndOfStream),
        }
    }

    /// The header read by the last `read_header` call, until its packet is taken.
    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    pub fn seq_id(&self) -> Option<u8> {
        self.header.map(|h| h.seq_id())
    }

    /// Blocks until the whole Value has been read and returns it buffered.
    pub fn fullfilled_packet(&mut self) -> Result<StreamPacket<'static>, Y3Error> {
        let header = self.header.take().ok_or(Y3Error::HeaderNotRead)?;
        let mut value = BytesMut::new();
        read_value_into(&mut self.reader, &mut value, header.vsize(), DEFAULT_BATCH_SIZE)?;
        Ok(StreamPacket::from_parts(header, Value::Buffered(value.freeze())))
    }

    /// Returns immediately with a packet whose Value is read on demand from
    /// this decoder's reader, bounded to the declared length.
    pub fn chunked_packet(&mut self) -> Result<StreamPacket<'_>, Y3Error> {
        let header = self.header.take().ok_or(Y3Error::HeaderNotRead)?;
        let size = header.vsize();
        Ok(StreamPacket::from_parts(
            header,
            Value::Streamed {
                prefix: Bytes::new(),
                source: Box::new(&mut self.reader),
                size,
            },
        ))
    }

    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const TWO_PACKETS: [u8; 9] = [0x11, 0x03, 0x01, 0x02, 0x03, 0x12, 0x02, 0x01, 0x02];

    #[test]
    fn fullfilled_packets_in_order() {
        let mut decoder = StreamDecoder::new(Cursor::new(TWO_PACKETS.to_vec()));

        assert_eq!(decoder.read_header().unwrap().vsize(), 3);
        assert_eq!(decoder.seq_id(), Some(0x11));
        let first = decoder.fullfilled_packet().unwrap();
        assert_eq!(&first.value_bytes().unwrap()[..], &[0x01, 0x02, 0x03]);
        assert_eq!(&first.bytes()[..], &TWO_PACKETS[..5]);

        decoder.read_header().unwrap();
        let second = decoder.fullfilled_packet().unwrap();
        assert_eq!(second.seq_id(), 0x12);
        assert_eq!(&second.value_bytes().unwrap()[..], &[0x01, 0x02]);

        assert!(matches!(decoder.read_header(), Err(Y3Error::EndOfStream)));
    }

    #[test]
    fn chunked_packets_share_the_reader() {
        let mut decoder = StreamDecoder::new(Cursor::new(TWO_PACKETS.to_vec()));

        decoder.read_header().unwrap();
        {
            let packet = decoder.chunked_packet().unwrap();
            assert!(packet.is_streamed());
            let mut value = Vec::new();
            packet.into_value_reader().read_to_end(&mut value).unwrap();
            assert_eq!(value, vec![0x01, 0x02, 0x03]);
        }
        assert_eq!(decoder.get_ref().position(), 5);

        decoder.read_header().unwrap();
        let packet = decoder.chunked_packet().unwrap();
        let mut whole = Vec::new();
        packet.into_reader().read_to_end(&mut whole).unwrap();
        assert_eq!(whole, TWO_PACKETS[5..].to_vec());
    }

    #[test]
    fn packet_before_header_is_invalid() {
        let mut decoder = StreamDecoder::new(Cursor::new(TWO_PACKETS.to_vec()));
        assert!(matches!(decoder.fullfilled_packet(), Err(Y3Error::HeaderNotRead)));
        decoder.read_header().unwrap();
        decoder.fullfilled_packet().unwrap();
        assert!(matches!(decoder.chunked_packet(), Err(Y3Error::HeaderNotRead)));
    }

    #[test]
    fn truncated_value_is_malformed() {
        let mut decoder = StreamDecoder::new(Cursor::new(vec![0x11, 0x05, 0x01]));
        decoder.read_header().unwrap();
        assert!(decoder.fullfilled_packet().unwrap_err().is_malformed());
    }

    #[test]
    fn empty_value() {
        let mut decoder = StreamDecoder::new(Cursor::new(vec![0x2C, 0x00]));
        decoder.read_header().unwrap();
        let packet = decoder.fullfilled_packet().unwrap();
        assert!(!packet.to_bool().unwrap());
        assert_eq!(packet.size(), 2);
    }
}
