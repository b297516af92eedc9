//! WebSocket handler
//!
//! Bridges a WebSocket to a protocol session: a reader task feeds inbound
//! payloads to the frame dispatcher, a writer task drains the connection's
//! outbound queue and sends liveness pings.

use crate::connection::{Connection, Outbound, Session};
use crate::handlers::{Flow, FrameDispatcher};
use crate::server::{serve_file, GatewayState};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        Request, State, WebSocketUpgrade,
    },
    response::{IntoResponse, Response},
};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, Interval};

/// How long the close path waits for queued frames to flush
const CLOSE_GRACE: Duration = Duration::from_secs(5);

/// Why the reader stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadEnd {
    /// Client sent DISCONNECT
    Disconnect,
    /// Client closed the socket or the stream ended
    PeerClosed,
    /// Transport error
    Error,
}

/// WebSocket gateway handler
///
/// GET /ws
pub async fn gateway_handler(
    State(state): State<GatewayState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(state, socket))
}

/// Root handler
///
/// GET /
///
/// Upgrades to a WebSocket when asked to, otherwise serves `index.html`.
pub async fn root_handler(
    State(state): State<GatewayState>,
    ws: Option<WebSocketUpgrade>,
    request: Request,
) -> Response {
    match ws {
        Some(ws) => ws
            .on_upgrade(|socket| handle_socket(state, socket))
            .into_response(),
        None => {
            let path = Path::new(&state.config().server.static_dir).join("index.html");
            serve_file(path, request).await
        }
    }
}

/// Handle an upgraded WebSocket connection
async fn handle_socket(state: GatewayState, socket: WebSocket) {
    let session_id = Session::generate_id();

    // Create message channel for outgoing frames
    let (tx, rx) = mpsc::channel::<Outbound>(state.config().broker.outbound_buffer);

    let connection = Connection::new(session_id.clone(), tx);
    let session = Session::new(connection.clone());

    tracing::info!(session_id = %session_id, "WebSocket connection established");

    let (ws_sink, ws_stream) = socket.split();

    let mut send_task = tokio::spawn(write_loop(
        ws_sink,
        rx,
        connection.clone(),
        state.config().broker.ping_interval(),
    ));
    let mut recv_task = tokio::spawn(read_loop(state.clone(), session.clone(), ws_stream));

    // Wait for either side to finish
    let writer_done = tokio::select! {
        result = &mut recv_task => {
            match result {
                Ok(end) => tracing::debug!(session_id = %session_id, end = ?end, "Receive task ended"),
                Err(e) => tracing::warn!(session_id = %session_id, error = %e, "Receive task failed"),
            }
            false
        }
        _ = &mut send_task => {
            tracing::debug!(session_id = %session_id, "Send task ended");
            recv_task.abort();
            true
        }
    };

    // Registry first, so nothing new is queued while the socket drains
    cleanup_connection(&state, &session);

    if !writer_done {
        connection.close(CLOSE_GRACE).await;
        if tokio::time::timeout(CLOSE_GRACE, &mut send_task).await.is_err() {
            tracing::debug!(session_id = %session_id, "Send task did not drain in time");
            send_task.abort();
        }
    }

    tracing::info!(
        session_id = %session_id,
        age_ms = connection.age().as_millis(),
        alive = connection.is_alive(),
        "WebSocket connection closed"
    );
}

/// Feed inbound messages to the frame dispatcher until the peer goes away
async fn read_loop(
    state: GatewayState,
    session: Arc<Session>,
    mut stream: SplitStream<WebSocket>,
) -> ReadEnd {
    while let Some(msg) = stream.next().await {
        let flow = match msg {
            Ok(Message::Text(text)) => FrameDispatcher::dispatch(&state, &session, text.as_bytes()),
            Ok(Message::Binary(data)) => FrameDispatcher::dispatch(&state, &session, &data),
            Ok(Message::Ping(_)) => {
                // Pong is handled automatically by axum
                tracing::trace!(session_id = %session.id(), "Ping received");
                continue;
            }
            Ok(Message::Pong(_)) => {
                tracing::trace!(session_id = %session.id(), "Pong received");
                session.connection().mark_alive();
                continue;
            }
            Ok(Message::Close(_)) => {
                tracing::info!(session_id = %session.id(), "Client closed connection");
                return ReadEnd::PeerClosed;
            }
            Err(e) => {
                tracing::warn!(
                    session_id = %session.id(),
                    error = %e,
                    "WebSocket error"
                );
                return ReadEnd::Error;
            }
        };

        if flow == Flow::Close {
            return ReadEnd::Disconnect;
        }
    }

    ReadEnd::PeerClosed
}

/// Drain the outbound queue into the socket and send liveness probes
async fn write_loop(
    mut sink: SplitSink<WebSocket, Message>,
    mut rx: mpsc::Receiver<Outbound>,
    connection: Arc<Connection>,
    ping_interval: Option<Duration>,
) {
    let mut probe = ping_interval.map(|period| interval_at(Instant::now() + period, period));

    loop {
        tokio::select! {
            outbound = rx.recv() => match outbound {
                Some(Outbound::Frame(wire)) => {
                    if sink.send(Message::Text(wire)).await.is_err() {
                        tracing::warn!(
                            session_id = %connection.session_id(),
                            "Failed to send frame to WebSocket"
                        );
                        break;
                    }
                }
                Some(Outbound::Close) | None => break,
            },
            () = next_probe(&mut probe) => {
                if !connection.begin_probe() {
                    // Advisory only: nothing is evicted
                    tracing::debug!(
                        session_id = %connection.session_id(),
                        "Peer did not answer the last liveness probe"
                    );
                }
                if sink.send(Message::Ping(Vec::new())).await.is_err() {
                    break;
                }
            }
        }
    }

    let _ = sink.close().await;
}

/// Wait for the next probe tick, forever if probing is disabled
async fn next_probe(probe: &mut Option<Interval>) {
    match probe {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

/// Clean up a connection on close
fn cleanup_connection(state: &GatewayState, session: &Session) {
    let removed = session.close(state.registry());

    tracing::info!(
        session_id = %session.id(),
        destinations = removed,
        "Cleaning up connection"
    );
}
