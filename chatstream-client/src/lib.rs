#![doc = include_str!("../README.md")]

pub mod client;
pub mod config;
pub(crate) mod error;
pub mod streaming;

pub use client::ChatClient;
pub use config::ClientConfig;
pub use streaming::drive;

// Re-export chatstream-types for convenience
pub use chatstream_types::{ChatError, ChatEvent, EventStream, StreamCallbacks};
