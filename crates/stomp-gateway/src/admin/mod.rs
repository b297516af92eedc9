//! Administrative HTTP endpoints
//!
//! Publish on the admin topic and inspect which destinations have subscribers.

use crate::response::{ApiError, StatusBody};
use crate::server::{serve_file, GatewayState};
use axum::{
    extract::{rejection::JsonRejection, Request, State},
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Body of `POST /admin/send`
#[derive(Debug, Deserialize)]
pub struct SendRequest {
    /// Any JSON value; see [`SendRequest::message_text`]
    #[serde(default)]
    pub message: Value,
}

impl SendRequest {
    /// Text to publish, or `None` when the message counts as absent
    ///
    /// `null`, `false`, `0` and `""` are absent. Other scalars are published
    /// in their string form, arrays and objects as JSON text.
    pub fn message_text(&self) -> Option<String> {
        match &self.message {
            Value::Null | Value::Bool(false) => None,
            Value::Bool(true) => Some("true".to_string()),
            Value::String(text) if text.is_empty() => None,
            Value::String(text) => Some(text.clone()),
            Value::Number(n) if n.as_f64().is_some_and(|f| f.abs() > 0.0) => Some(n.to_string()),
            Value::Number(_) => None,
            compound @ (Value::Array(_) | Value::Object(_)) => Some(compound.to_string()),
        }
    }
}

/// Body of `GET /admin/clients`
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientsResponse {
    /// One `"{destination} ({count} subscribers)"` line per destination
    pub clients: Vec<String>,
    /// Number of destinations listed
    pub count: usize,
}

/// Admin page
///
/// GET /admin
pub async fn admin_page(State(state): State<GatewayState>, request: Request) -> Response {
    let path = Path::new(&state.config().server.static_dir).join("admin.html");
    serve_file(path, request).await
}

/// Publish a message on the admin topic
///
/// POST /admin/send
///
/// The reply only says the message was sent; it may have reached nobody.
pub async fn send_message(
    State(state): State<GatewayState>,
    payload: Result<Json<SendRequest>, JsonRejection>,
) -> Result<Json<StatusBody>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::InvalidBody(e.body_text()))?;

    let message = request.message_text().ok_or(ApiError::MissingMessage)?;

    let report = state.dispatcher().publish_admin(&message);

    tracing::info!(
        destination = %state.dispatcher().admin_topic(),
        sent = report.delivered,
        "Admin message published"
    );

    Ok(Json(StatusBody::ok("Message sent.")))
}

/// List destinations that currently have subscribers
///
/// GET /admin/clients
pub async fn list_clients(State(state): State<GatewayState>) -> Json<ClientsResponse> {
    let clients = describe_destinations(&state.registry().snapshot());

    Json(ClientsResponse {
        count: clients.len(),
        clients,
    })
}

/// Render registry snapshot entries for the admin page
pub fn describe_destinations(snapshot: &[(String, usize)]) -> Vec<String> {
    snapshot
        .iter()
        .map(|(destination, count)| format!("{destination} ({count} subscribers)"))
        .collect()
}
