//! Frame handlers
//!
//! Handles inbound frames based on their command.

mod connect;
mod disconnect;
mod error;
mod send;
mod subscribe;

pub use connect::ConnectHandler;
pub use disconnect::DisconnectHandler;
pub use error::{HandlerError, HandlerResult, PARSE_ERROR_BODY};
pub use send::SendHandler;
pub use subscribe::SubscribeHandler;

use crate::connection::Session;
use crate::server::GatewayState;
use stomp_core::{Command, Frame};

/// What the server loop should do after a frame was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep reading frames
    Continue,
    /// Close the transport (the close path then tears the session down)
    Close,
}

/// Dispatch inbound frames to the appropriate handlers
pub struct FrameDispatcher;

impl FrameDispatcher {
    /// Handle one raw inbound payload
    ///
    /// Handler errors are reported to the client as ERROR frames and the
    /// session stays open.
    pub fn dispatch(state: &GatewayState, session: &Session, raw: &[u8]) -> Flow {
        if session.is_closed() {
            tracing::trace!(session_id = %session.id(), "Frame after close ignored");
            return Flow::Continue;
        }

        let result = stomp_core::decode_with_limit(raw, state.config().broker.max_frame_size)
            .map_err(HandlerError::from)
            .and_then(|frame| Self::handle_frame(state, session, &frame));

        match result {
            Ok(flow) => flow,
            Err(e) => {
                tracing::debug!(
                    session_id = %session.id(),
                    error = %e,
                    "Frame rejected"
                );
                reply(session, &e.to_error_frame());
                Flow::Continue
            }
        }
    }

    /// Handle an already decoded frame
    pub fn handle_frame(
        state: &GatewayState,
        session: &Session,
        frame: &Frame,
    ) -> HandlerResult<Flow> {
        tracing::trace!(
            session_id = %session.id(),
            command = %frame.command,
            headers = frame.headers.len(),
            "Received frame"
        );

        match frame.command {
            Command::Connect => ConnectHandler::handle(session),
            Command::Subscribe => SubscribeHandler::handle(state, session, frame),
            Command::Send => SendHandler::handle(state, session, frame),
            Command::Disconnect => DisconnectHandler::handle(session),
            // Server-only and unknown commands are ignored
            _ => {
                tracing::debug!(
                    session_id = %session.id(),
                    command = %frame.command,
                    unknown = frame.command.is_unknown(),
                    "Ignoring unsupported command"
                );
                Ok(Flow::Continue)
            }
        }
    }
}

/// Send a frame back to the session's own connection
pub(crate) fn reply(session: &Session, frame: &Frame) {
    if !session.connection().deliver(frame.to_wire()) {
        tracing::debug!(
            session_id = %session.id(),
            command = %frame.command,
            "Reply not delivered"
        );
    }
}
