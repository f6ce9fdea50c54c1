//! Recursive decode: bytes → packet tree.

use bytes::Bytes;

use super::{NodePacket, Packet, PrimitivePacket};
use crate::error::Y3Error;
use crate::header::Header;

/// Deepest node nesting accepted by the decoder.
pub const MAX_DEPTH: usize = 128;

/// Decodes one packet from the front of `buf`.
///
/// Returns the packet and the number of bytes it consumed, so a buffer of
/// several siblings can be walked by advancing past each one.
pub fn decode_packet(buf: &Bytes) -> Result<(Packet, usize), Y3Error> {
    decode_at(buf, 0)
}

/// Decodes one packet and requires it to be a node.
pub fn decode_node(buf: &Bytes) -> Result<(NodePacket, usize), Y3Error> {
    match decode_packet(buf)? {
        (Packet::Node(n), consumed) => Ok((n, consumed)),
        (Packet::Primitive(p), _) => Err(Y3Error::malformed(format!(
            "expected a node packet, found primitive {:#04x}",
            p.seq_id()
        ))),
    }
}

/// Decodes one packet and requires it to be a primitive.
pub fn decode_primitive(buf: &Bytes) -> Result<(PrimitivePacket, usize), Y3Error> {
    match decode_packet(buf)? {
        (Packet::Primitive(p), consumed) => Ok((p, consumed)),
        (Packet::Node(n), _) => Err(Y3Error::malformed(format!(
            "expected a primitive packet, found node {:#04x}",
            n.seq_id()
        ))),
    }
}

/// Decodes every packet in `buf`, in order, until it is fully consumed.
pub fn decode_siblings(buf: &Bytes) -> Result<Vec<Packet>, Y3Error> {
    let mut packets = Vec::new();
    let mut pos = 0;
    while pos < buf.len() {
        let (packet, consumed) = decode_at(&buf.slice(pos..), 0)?;
        pos += consumed;
        packets.push(packet);
    }
    Ok(packets)
}

fn decode_at(buf: &Bytes, depth: usize) -> Result<(Packet, usize), Y3Error> {
    let header = Header::parse(buf)?;
    let end = header.packet_size();
    if end > buf.len() {
        return Err(Y3Error::malformed(format!(
            "value of {} bytes goes beyond the boundary, {} bytes remain",
            header.vsize(),
            buf.len() - header.size()
        )));
    }
    let raw = buf.slice(..end);

    if !header.is_node() {
        return Ok((Packet::Primitive(PrimitivePacket::new(header, raw)), end));
    }

    if depth >= MAX_DEPTH {
        return Err(Y3Error::malformed(format!(
            "node nesting deeper than {MAX_DEPTH}"
        )));
    }

    let value = raw.slice(header.size()..);
    let mut node = NodePacket::new(header, raw);
    let mut pos = 0;
    while pos < value.len() {
        let (child, consumed) = decode_at(&value.slice(pos..), depth + 1)?;
        pos += consumed;
        node.insert(child);
    }

    tracing::trace!(
        seq_id = node.seq_id(),
        nodes = node.nodes().len(),
        primitives = node.primitives().len(),
        "decoded node packet"
    );
    Ok((Packet::Node(node), end))
}
