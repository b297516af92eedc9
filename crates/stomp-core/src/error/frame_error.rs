//! Frame errors - failures while decoding inbound frames

use thiserror::Error;

/// Frame codec errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// Payload exceeds the configured maximum frame size
    #[error("Frame too large: {size} bytes (max {max})")]
    TooLarge { size: usize, max: usize },
}
