#![doc = include_str!("../README.md")]

pub mod decoder;
pub mod iter;
pub(crate) mod record;
pub mod utf8;

pub use decoder::{DecoderStats, StreamDecoder};
pub use iter::{DecodeChunks, decode_chunks};
pub use utf8::Utf8Decoder;

// Re-export the event type for convenience
pub use chatstream_types::ChatEvent;
