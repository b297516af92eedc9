//! Connection management
//!
//! Connection handles, per-connection sessions, and the subscription registry.

mod connection;
mod registry;
mod session;

pub use connection::{Connection, Outbound};
pub use registry::SubscriptionRegistry;
pub use session::{Session, SessionState};
