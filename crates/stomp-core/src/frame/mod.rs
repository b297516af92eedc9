//! Frame model
//!
//! Commands, headers and the frame structure exchanged over a connection.

mod command;
mod frame;
pub mod headers;

pub use command::Command;
pub use frame::{Frame, PROTOCOL_VERSION, TEXT_PLAIN};
pub use headers::Headers;
