//! Gateway server setup
//!
//! Provides the HTTP/WebSocket server configuration and routes.

mod handler;
mod state;

pub use handler::{gateway_handler, root_handler};
pub use state::GatewayState;

use crate::admin;
use axum::{
    extract::Request,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use stomp_common::{AppConfig, AppError};
use tokio::net::TcpListener;
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

/// Create the gateway router
pub fn create_router(static_dir: &str) -> Router<GatewayState> {
    Router::new()
        .route("/", get(root_handler))
        .route("/ws", get(gateway_handler))
        .route("/health", get(health_check))
        .route("/admin", get(admin::admin_page))
        .route("/admin/send", post(admin::send_message))
        .route("/admin/clients", get(admin::list_clients))
        .fallback_service(ServeDir::new(static_dir))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Build the complete application
pub fn create_app(state: GatewayState) -> Router {
    let static_dir = state.config().server.static_dir.clone();

    create_router(&static_dir)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve a single static file for a request
pub async fn serve_file(path: PathBuf, request: Request) -> Response {
    match ServeFile::new(path).oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}

/// Run the gateway server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    tracing::info!("Starting Gateway server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Server(format!("Failed to bind to {addr}: {e}")))?;

    tracing::info!("Gateway listening on ws://{}/", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Server(format!("Server error: {e}")))?;

    tracing::info!("Gateway stopped");

    Ok(())
}

/// Run the complete gateway server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .server
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid listen address: {e}")))?;

    // Registry and dispatcher live for the whole server run
    let state = GatewayState::new(config);

    let app = create_app(state);

    run_server(app, addr).await
}

/// Resolve when the process is asked to stop
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
