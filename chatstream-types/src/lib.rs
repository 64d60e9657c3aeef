#![doc = include_str!("../README.md")]

pub mod callbacks;
pub mod error;
pub mod event;
pub mod request;
pub mod stream;

pub use callbacks::*;
pub use error::*;
pub use event::*;
pub use request::*;
pub use stream::*;
