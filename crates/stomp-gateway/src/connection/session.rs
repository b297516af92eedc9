//! Session management
//!
//! Per-connection protocol state: lifecycle and the destinations this
//! connection subscribed to.

use super::{Connection, SubscriptionRegistry};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

/// Session lifecycle state
///
/// Frames are accepted in both `Open` and `Negotiated`; only `Closed` stops processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    /// Transport accepted, no CONNECT seen yet
    Open,
    /// CONNECT received and CONNECTED sent
    Negotiated,
    /// Transport closed, registry memberships removed (terminal)
    Closed,
}

/// Protocol session for one connection
pub struct Session {
    /// Transport handle (not owned: the socket lives in the server tasks)
    connection: Arc<Connection>,

    /// Current lifecycle state
    state: Mutex<SessionState>,

    /// Destinations subscribed through this session
    subscriptions: Mutex<HashSet<String>>,
}

impl Session {
    /// Generate a new session ID
    #[must_use]
    pub fn generate_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    /// Create a session for a freshly accepted connection
    pub fn new(connection: Arc<Connection>) -> Arc<Self> {
        Arc::new(Self {
            connection,
            state: Mutex::new(SessionState::Open),
            subscriptions: Mutex::new(HashSet::new()),
        })
    }

    /// Get the session ID
    pub fn id(&self) -> &str {
        self.connection.session_id()
    }

    /// Get the transport handle
    pub fn connection(&self) -> &Arc<Connection> {
        &self.connection
    }

    /// Get the current state
    pub fn state(&self) -> SessionState {
        *self.state.lock()
    }

    /// Check if the session reached its terminal state
    pub fn is_closed(&self) -> bool {
        self.state() == SessionState::Closed
    }

    /// Record a processed CONNECT
    ///
    /// Returns `false` if the session is already closed.
    pub fn mark_negotiated(&self) -> bool {
        let mut state = self.state.lock();
        if *state == SessionState::Closed {
            return false;
        }
        *state = SessionState::Negotiated;
        true
    }

    /// Subscribe this session to a destination
    ///
    /// Updates both the registry and the session's own set. Returns `false`
    /// if the session is closed or already subscribed.
    pub fn subscribe(&self, registry: &SubscriptionRegistry, destination: &str) -> bool {
        // Holding the state lock keeps close() from running in between
        let state = self.state.lock();
        if *state == SessionState::Closed {
            return false;
        }

        let added = registry.subscribe(destination, &self.connection);
        self.subscriptions.lock().insert(destination.to_string());
        added
    }

    /// Get the destinations this session is subscribed to
    #[cfg(test)]
    pub fn subscriptions(&self) -> Vec<String> {
        self.subscriptions.lock().iter().cloned().collect()
    }

    /// Check if subscribed to a destination
    #[cfg(test)]
    pub fn is_subscribed_to(&self, destination: &str) -> bool {
        self.subscriptions.lock().contains(destination)
    }

    /// Tear the session down
    ///
    /// Removes every registry membership this session created. Runs at most
    /// once; later calls return `0`.
    pub fn close(&self, registry: &SubscriptionRegistry) -> usize {
        let mut state = self.state.lock();
        if *state == SessionState::Closed {
            return 0;
        }
        *state = SessionState::Closed;

        let destinations: Vec<String> = self.subscriptions.lock().drain().collect();
        for destination in &destinations {
            registry.unsubscribe(destination, self.id());
        }

        tracing::debug!(
            session_id = %self.id(),
            destinations = destinations.len(),
            "Session closed"
        );

        destinations.len()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("session_id", &self.id())
            .field("state", &self.state())
            .field("subscriptions", &self.subscriptions.lock().len())
            .finish()
    }
}
