//! Frame structure
//!
//! A frame is one protocol message: a command, ordered headers and a text body.

use super::headers::{self, Headers};
use super::Command;
use serde::Serialize;

/// Protocol version reported on every CONNECTED frame
pub const PROTOCOL_VERSION: &str = "1.2";

/// Content type stamped on MESSAGE frames
pub const TEXT_PLAIN: &str = "text/plain";

/// A single protocol frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    /// Command token
    pub command: Command,

    /// Headers in wire order
    pub headers: Headers,

    /// Body text (terminator stripped)
    pub body: String,
}

impl Frame {
    /// Create a frame from its parts
    #[must_use]
    pub fn new(command: Command, headers: Headers, body: impl Into<String>) -> Self {
        Self {
            command,
            headers,
            body: body.into(),
        }
    }

    // === Server Frames ===

    /// Create a CONNECTED frame carrying the fixed protocol version
    #[must_use]
    pub fn connected() -> Self {
        Self::new(
            Command::Connected,
            Headers::new().with(headers::VERSION, PROTOCOL_VERSION),
            String::new(),
        )
    }

    /// Create a MESSAGE frame delivering `body` from `destination`
    #[must_use]
    pub fn message(destination: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(
            Command::Message,
            Headers::new()
                .with(headers::DESTINATION, destination)
                .with(headers::CONTENT_TYPE, TEXT_PLAIN),
            body,
        )
    }

    /// Create an ERROR frame with no headers
    #[must_use]
    pub fn error(body: impl Into<String>) -> Self {
        Self::new(Command::Error, Headers::new(), body)
    }

    /// Create an ERROR frame with a short `message` header summary
    #[must_use]
    pub fn error_with_summary(summary: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(
            Command::Error,
            Headers::new().with(headers::MESSAGE, summary),
            body,
        )
    }

    // === Client Frames ===

    /// Create a CONNECT frame
    #[must_use]
    pub fn connect() -> Self {
        Self::new(Command::Connect, Headers::new(), String::new())
    }

    /// Create a SUBSCRIBE frame
    #[must_use]
    pub fn subscribe(destination: impl Into<String>) -> Self {
        Self::new(
            Command::Subscribe,
            Headers::new().with(headers::DESTINATION, destination),
            String::new(),
        )
    }

    /// Create a SEND frame
    #[must_use]
    pub fn send(destination: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(
            Command::Send,
            Headers::new().with(headers::DESTINATION, destination),
            body,
        )
    }

    /// Create a DISCONNECT frame
    #[must_use]
    pub fn disconnect() -> Self {
        Self::new(Command::Disconnect, Headers::new(), String::new())
    }

    // === Accessors ===

    /// Get the `destination` header, if present
    pub fn destination(&self) -> Option<&str> {
        self.headers.get(headers::DESTINATION)
    }

    /// Get a header value, if present
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key)
    }

    /// Serialize to wire text
    #[must_use]
    pub fn to_wire(&self) -> String {
        crate::codec::encode_frame(self)
    }
}
