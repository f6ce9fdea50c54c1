//! Whole-frame I/O: one complete `[Tag][Length][Value]` unit per call.

pub mod async_reader;
pub mod reader;
pub mod writer;

pub use async_reader::AsyncFrameReader;
pub use reader::{read_packet, FrameReader, DEFAULT_BATCH_SIZE};
pub use writer::FrameWriter;
