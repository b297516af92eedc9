//! Error types for the frame layer

mod frame_error;

pub use frame_error::FrameError;
