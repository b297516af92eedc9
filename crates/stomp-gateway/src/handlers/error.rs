//! Handler error types

use stomp_core::{Command, Frame, FrameError};
use thiserror::Error;

/// Body of the ERROR frame sent for undecodable input
pub const PARSE_ERROR_BODY: &str = "frame parse error";

/// Handler error type
///
/// Every variant is reported to the client as an ERROR frame; none of them
/// closes the connection.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Inbound payload was rejected before decoding
    #[error("Invalid frame: {0}")]
    InvalidFrame(#[from] FrameError),

    /// A header the command needs was absent
    #[error("{command} frame is missing the {header} header")]
    MissingHeader {
        command: Command,
        header: &'static str,
    },
}

impl HandlerError {
    /// Build the ERROR frame reported back to the client
    pub fn to_error_frame(&self) -> Frame {
        match self {
            Self::InvalidFrame(_) => Frame::error(PARSE_ERROR_BODY),
            Self::MissingHeader { header, .. } => {
                Frame::error_with_summary(format!("missing {header} header"), self.to_string())
            }
        }
    }
}

/// Handler result type
pub type HandlerResult<T> = Result<T, HandlerError>;
