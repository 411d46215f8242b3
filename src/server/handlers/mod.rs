//! HTTP handlers for the server.

pub mod certificate;
pub mod fonts;

use axum::Json;
use serde_json::{Value, json};

/// Handle GET / - health check.
pub async fn health() -> Json<Value> {
    Json(json!({"status": "ok", "message": "pergamino is running"}))
}
