//! SUBSCRIBE handler

use super::{Flow, HandlerError, HandlerResult};
use crate::connection::Session;
use crate::server::GatewayState;
use stomp_core::{headers, Command, Frame};

/// Handles SUBSCRIBE frames
pub struct SubscribeHandler;

impl SubscribeHandler {
    /// Add the session to the frame's destination
    ///
    /// An empty destination is a legal key; an absent one is an error.
    pub fn handle(state: &GatewayState, session: &Session, frame: &Frame) -> HandlerResult<Flow> {
        let destination = frame.destination().ok_or(HandlerError::MissingHeader {
            command: Command::Subscribe,
            header: headers::DESTINATION,
        })?;

        let added = session.subscribe(state.registry(), destination);

        tracing::debug!(
            session_id = %session.id(),
            destination = %destination,
            added = added,
            "SUBSCRIBE processed"
        );

        Ok(Flow::Continue)
    }
}
