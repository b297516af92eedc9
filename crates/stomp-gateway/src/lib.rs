//! # stomp-gateway
//!
//! STOMP-subset publish/subscribe broker over WebSocket.
//!
//! Clients connect, subscribe to named destinations and send messages that
//! are fanned out to every subscriber. An HTTP admin surface can publish on a
//! fixed topic and list active destinations.

pub mod admin;
pub mod broadcast;
pub mod connection;
pub mod handlers;
pub mod response;
pub mod server;

pub use broadcast::{BroadcastDispatcher, PublishReport};
pub use connection::{Connection, Outbound, Session, SessionState, SubscriptionRegistry};
pub use handlers::{Flow, FrameDispatcher};
pub use server::{create_app, create_router, run, run_server, GatewayState};
