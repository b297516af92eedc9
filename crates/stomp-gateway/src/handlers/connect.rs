//! CONNECT handler

use super::{reply, Flow, HandlerResult};
use crate::connection::Session;
use stomp_core::Frame;

/// Handles CONNECT frames
pub struct ConnectHandler;

impl ConnectHandler {
    /// Answer with CONNECTED
    ///
    /// Every CONNECT gets the same answer whenever it arrives; there is no
    /// version negotiation and no rejection.
    pub fn handle(session: &Session) -> HandlerResult<Flow> {
        let open = session.mark_negotiated();

        tracing::debug!(
            session_id = %session.id(),
            state = ?session.state(),
            "CONNECT received"
        );

        if open {
            reply(session, &Frame::connected());
        }

        Ok(Flow::Continue)
    }
}
