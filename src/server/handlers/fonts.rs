//! Font listing and serving handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Serialize;
use std::sync::Arc;

use crate::fonts::FontListing;

use super::super::state::AppState;

/// Response from the font list endpoint.
#[derive(Debug, Serialize)]
pub struct FontsResponse {
    pub fonts: Vec<FontListing>,
}

/// Handle GET /api/fonts - list available fonts.
pub async fn list(State(state): State<Arc<AppState>>) -> Json<FontsResponse> {
    Json(FontsResponse {
        fonts: state.fonts.list(),
    })
}

/// Handle GET /api/fonts/:filename - serve a font file for client-side
/// rendering.
pub async fn serve_file(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if !is_safe_font_name(&filename) {
        return Err((StatusCode::BAD_REQUEST, "Invalid font filename".to_string()));
    }

    let path = state.fonts.fonts_dir().join(&filename);
    let bytes = tokio::fs::read(&path).await.map_err(|_| {
        (
            StatusCode::NOT_FOUND,
            format!("Font not found: {filename}"),
        )
    })?;

    let mime = mime_guess::from_path(&filename)
        .first_or_octet_stream()
        .to_string();

    Ok((
        [
            (header::CONTENT_TYPE, mime),
            (header::CACHE_CONTROL, "public, max-age=86400".to_string()),
        ],
        bytes,
    ))
}

/// Reject path traversal and anything that is not a plain `.ttf`/`.otf`
/// filename.
fn is_safe_font_name(name: &str) -> bool {
    if name.is_empty() || name.contains("..") {
        return false;
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
    {
        return false;
    }
    let lower = name.to_ascii_lowercase();
    lower.ends_with(".ttf") || lower.ends_with(".otf")
}
