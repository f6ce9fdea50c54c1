//! Building packets: Tag and Value in, Length computed on finish.

mod builder;
mod values;

pub use builder::Encoder;
