//! # stomp-core
//!
//! Frame model and wire codec for the STOMP-subset protocol.
//! This crate is pure: no I/O, no async, no shared state.

pub mod codec;
pub mod error;
pub mod frame;

// Re-export commonly used types at crate root
pub use codec::{decode, decode_str, decode_with_limit, encode, encode_frame};
pub use error::FrameError;
pub use frame::{headers, Command, Frame, Headers, PROTOCOL_VERSION, TEXT_PLAIN};
