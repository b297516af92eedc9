//! Frame commands
//!
//! The command token is the first line of every frame.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Frame command
///
/// Tokens outside the known set are carried through as [`Command::Unknown`]
/// rather than rejected, so the session layer decides what to ignore.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    /// Client opens the protocol conversation
    Connect,
    /// Server acknowledges `CONNECT` (server only)
    Connected,
    /// Client subscribes to a destination
    Subscribe,
    /// Client publishes a body to a destination
    Send,
    /// Server delivers a published body to a subscriber (server only)
    Message,
    /// Client asks the server to close the connection
    Disconnect,
    /// Server reports a problem with an inbound frame (server only)
    Error,
    /// Any other token, passed through verbatim
    Unknown(String),
}

impl Command {
    /// Parse a command token (exact, case-sensitive match)
    #[must_use]
    pub fn parse(token: &str) -> Self {
        match token {
            "CONNECT" => Self::Connect,
            "CONNECTED" => Self::Connected,
            "SUBSCRIBE" => Self::Subscribe,
            "SEND" => Self::Send,
            "MESSAGE" => Self::Message,
            "DISCONNECT" => Self::Disconnect,
            "ERROR" => Self::Error,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Get the wire token for this command
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Connect => "CONNECT",
            Self::Connected => "CONNECTED",
            Self::Subscribe => "SUBSCRIBE",
            Self::Send => "SEND",
            Self::Message => "MESSAGE",
            Self::Disconnect => "DISCONNECT",
            Self::Error => "ERROR",
            Self::Unknown(token) => token,
        }
    }

    /// Check if the token was not recognized
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }
}

impl From<&str> for Command {
    fn from(token: &str) -> Self {
        Self::parse(token)
    }
}

impl Serialize for Command {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Command {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let token = String::deserialize(deserializer)?;
        Ok(Self::parse(&token))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
