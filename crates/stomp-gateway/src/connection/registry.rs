//! Subscription registry
//!
//! Maps each destination to the connections currently subscribed to it,
//! using `DashMap` so mutations on one destination run under that shard's lock.

use super::Connection;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;

/// Destination → subscribers mapping shared by every session
///
/// A destination is present only while it has at least one subscriber.
pub struct SubscriptionRegistry {
    /// Subscribers per destination, keyed by session ID
    destinations: DashMap<String, HashMap<String, Arc<Connection>>>,
}

impl SubscriptionRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            destinations: DashMap::new(),
        }
    }

    /// Create an empty registry wrapped in Arc
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Subscribe a connection to a destination
    ///
    /// Idempotent. Returns `true` if the connection was not yet subscribed.
    pub fn subscribe(&self, destination: &str, connection: &Arc<Connection>) -> bool {
        let added = self
            .destinations
            .entry(destination.to_string())
            .or_default()
            .insert(connection.session_id().to_string(), Arc::clone(connection))
            .is_none();

        tracing::trace!(
            session_id = %connection.session_id(),
            destination = %destination,
            added = added,
            "Connection subscribed to destination"
        );

        added
    }

    /// Unsubscribe a connection from a destination
    ///
    /// Removes the destination entirely once its last subscriber leaves.
    /// Unsubscribing a connection that is not subscribed is a no-op.
    pub fn unsubscribe(&self, destination: &str, session_id: &str) -> bool {
        let removed = {
            let Some(mut subscribers) = self.destinations.get_mut(destination) else {
                return false;
            };
            subscribers.remove(session_id).is_some()
        };

        // Re-checked under the shard lock so a concurrent subscribe is never lost
        self.destinations
            .remove_if(destination, |_, subscribers| subscribers.is_empty());

        tracing::trace!(
            session_id = %session_id,
            destination = %destination,
            removed = removed,
            "Connection unsubscribed from destination"
        );

        removed
    }

    /// Get the current subscribers of a destination
    ///
    /// Returns a copy, so callers can deliver while others unsubscribe.
    /// An empty result means nobody is listening.
    pub fn broadcast_targets(&self, destination: &str) -> Vec<Arc<Connection>> {
        self.destinations
            .get(destination)
            .map(|subscribers| subscribers.values().cloned().collect())
            .unwrap_or_default()
    }

    /// List `(destination, subscriber count)` pairs, sorted by destination
    pub fn snapshot(&self) -> Vec<(String, usize)> {
        let mut entries: Vec<(String, usize)> = self
            .destinations
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().len()))
            .collect();
        entries.sort();
        entries
    }

    /// Check whether a connection is subscribed to a destination
    #[cfg(test)]
    pub fn is_subscribed(&self, destination: &str, session_id: &str) -> bool {
        self.destinations
            .get(destination)
            .is_some_and(|subscribers| subscribers.contains_key(session_id))
    }

    /// Number of subscribers of a destination
    pub fn subscriber_count(&self, destination: &str) -> usize {
        self.destinations
            .get(destination)
            .map_or(0, |subscribers| subscribers.len())
    }

    /// Number of destinations with at least one subscriber
    pub fn destination_count(&self) -> usize {
        self.destinations.len()
    }
}

impl Default for SubscriptionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SubscriptionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionRegistry")
            .field("destinations", &self.destinations.len())
            .finish()
    }
}
