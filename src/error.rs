//! Error types for the Y3 codec.

use std::fmt;

/// Coarse classification of a [`Y3Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input bytes do not form a well-structured packet.
    Malformed,
    /// The API was driven in an order or with arguments it does not accept.
    InvalidUsage,
    /// The underlying reader or writer failed.
    Io,
}

/// Errors that can occur while encoding, decoding or framing Y3 packets.
#[derive(Debug, thiserror::Error)]
pub enum Y3Error {
    #[error("malformed packet: {0}")]
    Malformed(String),

    #[error("sequence id {0:#04x} out of range [0x00, 0x3F]")]
    InvalidSeqId(u8),

    #[error("value length {0} exceeds the maximum encodable length")]
    LengthOverflow(usize),

    #[error("build incomplete: tag, length and value must all be set")]
    BuildIncomplete,

    #[error("invalid adding: no content may follow a streamed value")]
    InvalidAdding,

    #[error("packet is not in node mode")]
    NotNodeMode,

    #[error("packet value is not streamed")]
    NotStreamed,

    #[error("packet value is streamed and has not been buffered")]
    ValueNotBuffered,

    #[error("packet header has not been read")]
    HeaderNotRead,

    #[error("{len}-byte payload does not fit in {ty}")]
    NumericOverflow { ty: &'static str, len: usize },

    #[error("invalid UTF-8 payload: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("end of stream")]
    EndOfStream,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Y3Error {
    /// Wraps any displayable description as a malformed-packet error.
    pub fn malformed(e: impl fmt::Display) -> Self {
        Self::Malformed(e.to_string())
    }

    /// Returns the taxonomy bucket this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Malformed(_) | Self::NumericOverflow { .. } | Self::InvalidUtf8(_) => {
                ErrorKind::Malformed
            }
            Self::InvalidSeqId(_)
            | Self::LengthOverflow(_)
            | Self::BuildIncomplete
            | Self::InvalidAdding
            | Self::NotNodeMode
            | Self::NotStreamed
            | Self::ValueNotBuffered
            | Self::HeaderNotRead => ErrorKind::InvalidUsage,
            Self::EndOfStream | Self::Io(_) => ErrorKind::Io,
        }
    }

    /// Returns true if this error is a malformed-input error.
    pub fn is_malformed(&self) -> bool {
        self.kind() == ErrorKind::Malformed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(Y3Error::malformed("x").kind(), ErrorKind::Malformed);
        assert_eq!(Y3Error::InvalidSeqId(0x40).kind(), ErrorKind::InvalidUsage);
        assert_eq!(Y3Error::BuildIncomplete.kind(), ErrorKind::InvalidUsage);
        assert_eq!(Y3Error::EndOfStream.kind(), ErrorKind::Io);
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone");
        assert_eq!(Y3Error::from(io).kind(), ErrorKind::Io);
    }

    #[test]
    fn seq_id_message_is_hex() {
        assert_eq!(
            Y3Error::InvalidSeqId(0x40).to_string(),
            "sequence id 0x40 out of range [0x00, 0x3F]"
        );
    }
}
