//! HTTP server for the incident relay.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::pipeline::{IncidentRelay, RelayResponse};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The relay pipeline
    pub relay: Arc<IncidentRelay>,
}

/// Build the relay HTTP router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/webhooks/pagerduty", post(incident_webhook_handler))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "incident-relay"
    }))
}

/// Handle an inbound incident webhook.
///
/// The pipeline owns validation and failure containment; this handler only
/// maps the outcome onto the HTTP envelope, so exactly one structured JSON
/// response leaves per invocation.
async fn incident_webhook_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<RelayResponse>) {
    if let Some(source) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        debug!(source = %source, "Received incident webhook");
    }

    let outcome = state.relay.process(&body).await;
    (outcome.status(), Json(outcome.response()))
}
