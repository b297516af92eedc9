//! DISCONNECT handler

use super::{Flow, HandlerResult};
use crate::connection::Session;

/// Handles DISCONNECT frames
pub struct DisconnectHandler;

impl DisconnectHandler {
    /// Ask the server loop to close this connection
    ///
    /// Registry cleanup happens on the close path, not here.
    pub fn handle(session: &Session) -> HandlerResult<Flow> {
        tracing::debug!(session_id = %session.id(), "DISCONNECT received");
        Ok(Flow::Close)
    }
}
