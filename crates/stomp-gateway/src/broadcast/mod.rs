//! Message broadcasting
//!
//! Distributes published bodies to the WebSocket connections subscribed to a destination.

mod dispatcher;

pub use dispatcher::{BroadcastDispatcher, PublishReport, DEFAULT_ADMIN_TOPIC};
