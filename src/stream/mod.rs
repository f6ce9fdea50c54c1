//! Streaming packets: buffered or reader-backed Values, and the decoder that
//! produces them from a live byte stream.

pub mod decoder;
pub mod packet;
pub mod reader;

pub use decoder::StreamDecoder;
pub use packet::{StreamPacket, Value};
pub use reader::PacketReader;
