//! Individual WebSocket connection
//!
//! The transport handle the registry stores and the broadcaster writes to.
//! Writes go through a bounded queue drained by the connection's writer task.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Item queued for the connection's writer task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// Encoded frame, written as a text message
    Frame(String),
    /// Close the socket after flushing everything queued before it
    Close,
}

/// A single WebSocket connection
pub struct Connection {
    /// Unique session ID
    session_id: String,

    /// Channel to the writer task
    sender: mpsc::Sender<Outbound>,

    /// Cleared once a close has been requested
    open: AtomicBool,

    /// Liveness flag, refreshed by pongs (advisory only)
    alive: AtomicBool,

    /// Connection creation time
    created_at: Instant,
}

impl Connection {
    /// Create a new connection
    pub fn new(session_id: String, sender: mpsc::Sender<Outbound>) -> Arc<Self> {
        Arc::new(Self {
            session_id,
            sender,
            open: AtomicBool::new(true),
            alive: AtomicBool::new(true),
            created_at: Instant::now(),
        })
    }

    /// Get the session ID
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Check whether the transport still accepts writes
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst) && !self.sender.is_closed()
    }

    /// Queue an encoded frame without waiting
    ///
    /// Best effort: returns `false` if the connection is closing or its
    /// queue is full or gone. Nothing is retried.
    pub fn deliver(&self, frame: String) -> bool {
        if !self.is_open() {
            return false;
        }

        match self.sender.try_send(Outbound::Frame(frame)) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::debug!(
                    session_id = %self.session_id,
                    "Outbound queue full, frame dropped"
                );
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        }
    }

    /// Ask the writer task to close the socket
    ///
    /// Waits up to `grace` for room in the queue so frames queued earlier
    /// are flushed first. Returns `false` if the close was already requested.
    pub async fn close(&self, grace: Duration) -> bool {
        if !self.open.swap(false, Ordering::SeqCst) {
            return false;
        }

        if tokio::time::timeout(grace, self.sender.send(Outbound::Close))
            .await
            .is_err()
        {
            tracing::debug!(
                session_id = %self.session_id,
                "Timed out queueing close"
            );
        }

        true
    }

    /// Record a liveness answer (pong) from the peer
    pub fn mark_alive(&self) {
        self.alive.store(true, Ordering::SeqCst);
    }

    /// Clear the liveness flag before sending a probe
    ///
    /// Returns whether the peer had answered the previous probe.
    pub fn begin_probe(&self) -> bool {
        self.alive.swap(false, Ordering::SeqCst)
    }

    /// Check the liveness flag
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Get connection age
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("session_id", &self.session_id)
            .field("open", &self.open.load(Ordering::SeqCst))
            .field("alive", &self.alive.load(Ordering::SeqCst))
            .field("created_at", &self.created_at)
            .finish()
    }
}
