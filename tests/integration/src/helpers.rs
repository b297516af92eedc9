//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers, making HTTP requests,
//! and driving WebSocket clients.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use stomp_common::AppConfig;
use stomp_core::Frame;
use stomp_gateway::{create_app, GatewayState};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

/// How long a client waits for a frame before giving up
pub const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub state: GatewayState,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config()?).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let state = GatewayState::new(config);
        let app = create_app(state.clone());

        // Let the OS pick a free port
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            state,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get WebSocket URL for a path
    pub fn ws_url(&self, path: &str) -> String {
        format!("ws://{}{}", self.addr, path)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.post(&url).json(body).send().await?)
    }

    /// Make a POST request with a raw body
    pub async fn post_raw(&self, path: &str, content_type: &str, body: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .post(&url)
            .header("Content-Type", content_type)
            .body(body.to_string())
            .send()
            .await?)
    }

    /// Open a WebSocket client on `/`
    pub async fn connect(&self) -> Result<StompClient> {
        StompClient::connect(&self.ws_url("/")).await
    }

    /// Open a WebSocket client and negotiate a session
    pub async fn connect_negotiated(&self) -> Result<StompClient> {
        let mut client = self.connect().await?;
        client.handshake().await?;
        Ok(client)
    }
}

/// A WebSocket client speaking raw frames
pub struct StompClient {
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl StompClient {
    /// Connect to a WebSocket URL
    pub async fn connect(url: &str) -> Result<Self> {
        let (socket, _) = tokio_tungstenite::connect_async(url)
            .await
            .with_context(|| format!("WebSocket connect to {url}"))?;
        Ok(Self { socket })
    }

    /// Send raw text
    pub async fn send_raw(&mut self, text: &str) -> Result<()> {
        self.socket.send(Message::Text(text.to_string())).await?;
        Ok(())
    }

    /// Send raw bytes as a binary message
    pub async fn send_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.socket.send(Message::Binary(bytes.to_vec())).await?;
        Ok(())
    }

    /// Encode and send a frame
    pub async fn send_frame(&mut self, frame: &Frame) -> Result<()> {
        self.send_raw(&frame.to_wire()).await
    }

    /// Wait for the next text message
    pub async fn recv_raw(&mut self) -> Result<String> {
        loop {
            let next = tokio::time::timeout(RECV_TIMEOUT, self.socket.next())
                .await
                .context("timed out waiting for a frame")?;

            match next {
                Some(Ok(Message::Text(text))) => return Ok(text),
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => continue,
                Some(Ok(other)) => anyhow::bail!("unexpected message: {other:?}"),
                Some(Err(e)) => return Err(e.into()),
                None => anyhow::bail!("connection closed"),
            }
        }
    }

    /// Wait for the next frame and decode it
    pub async fn recv_frame(&mut self) -> Result<Frame> {
        let raw = self.recv_raw().await?;
        Ok(stomp_core::decode_str(&raw))
    }

    /// Assert nothing arrives within `wait`
    pub async fn expect_silence(&mut self, wait: Duration) -> Result<()> {
        match tokio::time::timeout(wait, self.socket.next()).await {
            Err(_) => Ok(()),
            Ok(msg) => anyhow::bail!("expected no frame, got {msg:?}"),
        }
    }

    /// Send CONNECT and wait for CONNECTED
    pub async fn handshake(&mut self) -> Result<Frame> {
        self.send_frame(&Frame::connect()).await?;
        let reply = self.recv_frame().await?;
        anyhow::ensure!(
            reply.command == stomp_core::Command::Connected,
            "expected CONNECTED, got {}",
            reply.command
        );
        Ok(reply)
    }

    /// Subscribe and wait until the server has processed it
    ///
    /// Frames on one connection are handled in order, so the CONNECTED reply
    /// to a trailing CONNECT proves the SUBSCRIBE before it took effect.
    pub async fn subscribe(&mut self, destination: &str) -> Result<()> {
        self.send_frame(&Frame::subscribe(destination)).await?;
        self.handshake().await?;
        Ok(())
    }

    /// Wait for the server to close the socket
    pub async fn expect_closed(&mut self) -> Result<()> {
        loop {
            let next = tokio::time::timeout(RECV_TIMEOUT, self.socket.next())
                .await
                .context("timed out waiting for close")?;

            match next {
                None | Some(Ok(Message::Close(_)) | Err(_)) => return Ok(()),
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => continue,
                Some(Ok(other)) => anyhow::bail!("expected close, got {other:?}"),
            }
        }
    }

    /// Close the socket from the client side
    pub async fn close(mut self) -> Result<()> {
        self.socket.close(None).await?;
        Ok(())
    }
}

/// Create a test configuration
///
/// Ignores the process environment so tests are reproducible.
pub fn test_config() -> Result<AppConfig> {
    test_config_with(&[])
}

/// Create a test configuration with a few variables set
pub fn test_config_with(vars: &[(&str, &str)]) -> Result<AppConfig> {
    let config = AppConfig::from_lookup(|key| {
        vars.iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| (*v).to_string())
    })
    .map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    Ok(config)
}

/// Poll until `check` holds or the receive timeout elapses
pub async fn eventually<F: Fn() -> bool>(check: F) -> Result<()> {
    let deadline = tokio::time::Instant::now() + RECV_TIMEOUT;
    while !check() {
        anyhow::ensure!(
            tokio::time::Instant::now() < deadline,
            "condition not reached in time"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    Ok(())
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(())
}
