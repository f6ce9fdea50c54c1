//! Writes whole packets, buffered or streamed, to a blocking sink.

use std::io::{self, Write};

use crate::error::Y3Error;
use crate::stream::StreamPacket;

/// Drains [`StreamPacket`]s into a `Write`.
#[derive(Debug)]
pub struct FrameWriter<W> {
    writer: W,
}

impl<W: Write> FrameWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes the header and the whole Value of `packet`, pulling any
    /// streamed tail from its source. Returns the number of bytes written.
    ///
    /// Fails as malformed if the source ends before the packet's declared size.
    pub fn write_packet(&mut self, packet: StreamPacket<'_>) -> Result<u64, Y3Error> {
        let seq_id = packet.seq_id();
        let expected = packet.size() as u64;
        let written = io::copy(&mut packet.into_reader(), &mut self.writer)?;
        if written != expected {
            tracing::debug!(seq_id, length = expected, read = written, "packet source ended early");
            return Err(Y3Error::malformed(format!(
                "packet source ended after {written} of {expected} bytes"
            )));
        }
        tracing::trace!(seq_id, size = written, "wrote packet");
        Ok(written)
    }

    pub fn flush(&mut self) -> Result<(), Y3Error> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
