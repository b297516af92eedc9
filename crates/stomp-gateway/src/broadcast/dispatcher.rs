//! Broadcast dispatcher
//!
//! Fans a published body out to every subscriber of a destination. Client
//! SEND frames and the administrative publish endpoint both go through here.

use crate::connection::SubscriptionRegistry;
use std::sync::Arc;
use stomp_core::Frame;

/// Default destination for administrative publishes
pub const DEFAULT_ADMIN_TOPIC: &str = "/topic/chat";

/// Outcome of a publish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PublishReport {
    /// Subscribers found for the destination
    pub targets: usize,
    /// Frames accepted by a subscriber's outbound queue
    pub delivered: usize,
}

/// Encodes MESSAGE frames and writes them to subscribers
pub struct BroadcastDispatcher {
    /// Registry the subscriber list is read from
    registry: Arc<SubscriptionRegistry>,
    /// Destination used by [`BroadcastDispatcher::publish_admin`]
    admin_topic: String,
}

impl BroadcastDispatcher {
    /// Create a dispatcher over a registry
    pub fn new(registry: Arc<SubscriptionRegistry>, admin_topic: impl Into<String>) -> Self {
        Self {
            registry,
            admin_topic: admin_topic.into(),
        }
    }

    /// Publish a body to every current subscriber of `destination`
    ///
    /// The frame is encoded once. Subscribers whose transport is closed are
    /// skipped. Publishing to a destination nobody listens on is not an
    /// error; nothing is queued for later subscribers.
    pub fn publish(&self, destination: &str, body: &str) -> PublishReport {
        let targets = self.registry.broadcast_targets(destination);

        if targets.is_empty() {
            tracing::debug!(destination = %destination, "No subscribers for destination");
            return PublishReport::default();
        }

        let wire = Frame::message(destination, body).to_wire();
        let delivered = targets
            .iter()
            .filter(|conn| conn.is_open())
            .filter(|conn| conn.deliver(wire.clone()))
            .count();

        tracing::debug!(
            destination = %destination,
            targets = targets.len(),
            sent = delivered,
            "MESSAGE frame sent to subscribers"
        );

        PublishReport {
            targets: targets.len(),
            delivered,
        }
    }

    /// Publish a body on the administrative topic
    pub fn publish_admin(&self, body: &str) -> PublishReport {
        self.publish(&self.admin_topic, body)
    }

    /// Get the administrative topic
    pub fn admin_topic(&self) -> &str {
        &self.admin_topic
    }

    /// Get the registry this dispatcher reads from
    pub fn registry(&self) -> &Arc<SubscriptionRegistry> {
        &self.registry
    }
}

impl std::fmt::Debug for BroadcastDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BroadcastDispatcher")
            .field("registry", &self.registry)
            .field("admin_topic", &self.admin_topic)
            .finish()
    }
}
