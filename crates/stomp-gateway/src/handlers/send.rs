//! SEND handler

use super::{Flow, HandlerError, HandlerResult};
use crate::connection::Session;
use crate::server::GatewayState;
use stomp_core::{headers, Command, Frame};

/// Handles SEND frames
pub struct SendHandler;

impl SendHandler {
    /// Fan the body out to the destination's subscribers
    ///
    /// The sender does not need to be subscribed. No subscribers means the
    /// body is dropped silently.
    pub fn handle(state: &GatewayState, session: &Session, frame: &Frame) -> HandlerResult<Flow> {
        let destination = frame.destination().ok_or(HandlerError::MissingHeader {
            command: Command::Send,
            header: headers::DESTINATION,
        })?;

        tracing::trace!(
            session_id = %session.id(),
            destination = %destination,
            body_len = frame.body.len(),
            "SEND received"
        );

        state.dispatcher().publish(destination, &frame.body);

        Ok(Flow::Continue)
    }
}
