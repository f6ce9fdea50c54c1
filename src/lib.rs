//! Y3: a compact nested Tag-Length-Value codec.
//!
//! Every packet is `[Tag][Length][Value]`: a one-byte Tag carrying a 6-bit
//! sequence ID and a Node flag, a base-128 length varint, and the Value. A
//! Node's Value is a run of child packets; a Primitive's Value is an opaque or
//! typed payload. Values can be fully buffered or streamed from a reader, and
//! no reader handed out by this crate ever reads past a declared boundary.
//!
//! # Architecture
//!
//! - **`varint`**: length varint and trimmed numeric payloads
//! - **`header`**: `Tag`, `Length` and the parsed `Header`
//! - **`packet`**: recursive decode into a `Packet` tree
//! - **`encoder`**: `Encoder`, the builder for buffered and streamed packets
//! - **`stream`**: `StreamPacket`, `StreamDecoder` and the bounded `PacketReader`
//! - **`frame`**: whole-frame reading (blocking and tokio) and writing

pub mod encoder;
pub mod error;
pub mod frame;
pub mod header;
pub mod packet;
pub mod stream;
pub mod varint;

pub use encoder::Encoder;
pub use error::{ErrorKind, Y3Error};
pub use frame::{read_packet, AsyncFrameReader, FrameReader, FrameWriter};
pub use header::{Header, Length, Tag};
pub use packet::{NodePacket, Packet, PrimitivePacket};
pub use stream::{PacketReader, StreamDecoder, StreamPacket, Value};
