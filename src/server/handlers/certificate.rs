//! Certificate fit, preview, and generation handlers.

use axum::{
    Json,
    extract::{Multipart, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use image::RgbImage;
use std::sync::Arc;

use crate::certificate::{self, render_certificate};
use crate::error::PergaminoError;
use crate::fonts::GlyphMeasurer;
use crate::layout::{self, Placement};
use crate::schema::{RegionSpec, sanitize_filename};

use super::super::state::AppState;

/// Handle POST /api/certificate/fit - compute the fitted font size and
/// anchor for one region without rendering anything.
///
/// This is the live-preview call site; it goes through the same
/// `fit_and_place` as the full render pass.
pub async fn fit(
    State(state): State<Arc<AppState>>,
    Json(spec): Json<RegionSpec>,
) -> Result<Json<Placement>, (StatusCode, String)> {
    let (region, text) = spec.resolve(None);

    let font = state.fonts.get_or_fallback(&region.font).ok_or((
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("No usable font for '{}'", region.font),
    ))?;

    let measurer = GlyphMeasurer::new(font);
    let placement = layout::fit_and_place(
        &measurer,
        &text,
        region.rect,
        region.max_font_size,
        region.h_align,
        region.v_align,
    );

    Ok(Json(placement))
}

/// Handle POST /api/certificate/preview - render and return PNG bytes.
pub async fn preview(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let parts = read_parts(multipart).await?;
    let img = render_blocking(state, parts).await?;

    let png_bytes = certificate::to_png_bytes(&img).map_err(internal)?;
    Ok(([(header::CONTENT_TYPE, "image/png")], png_bytes))
}

/// Handle POST /api/certificate/generate - render and return a JPEG
/// attachment named after the sanitized `filename` field.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let parts = read_parts(multipart).await?;
    let safe_name = sanitize_filename(&parts.filename);
    let img = render_blocking(state, parts).await?;

    let jpeg_bytes = certificate::to_jpeg_bytes(&img).map_err(internal)?;
    Ok((
        [
            (header::CONTENT_TYPE, "image/jpeg".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={safe_name}.jpg"),
            ),
        ],
        jpeg_bytes,
    ))
}

/// Fields extracted from a generate/preview multipart request.
struct RequestParts {
    template: Vec<u8>,
    regions_json: String,
    filename: String,
}

async fn read_parts(mut multipart: Multipart) -> Result<RequestParts, (StatusCode, String)> {
    let mut template: Option<Vec<u8>> = None;
    let mut regions_json: Option<String> = None;
    let mut filename = String::from("certificate");

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Multipart error: {e}")))?
    {
        match field.name().unwrap_or("") {
            "template" => {
                let bytes = field.bytes().await.map_err(|e| {
                    (
                        StatusCode::BAD_REQUEST,
                        format!("Failed to read template: {e}"),
                    )
                })?;
                template = Some(bytes.to_vec());
            }
            "regions" => {
                let text = field.text().await.map_err(|e| {
                    (
                        StatusCode::BAD_REQUEST,
                        format!("Failed to read regions: {e}"),
                    )
                })?;
                regions_json = Some(text);
            }
            "filename" => {
                filename = field.text().await.unwrap_or_default();
            }
            _ => {}
        }
    }

    Ok(RequestParts {
        template: template
            .ok_or((StatusCode::BAD_REQUEST, "No template field found".to_string()))?,
        regions_json: regions_json
            .ok_or((StatusCode::BAD_REQUEST, "No regions field found".to_string()))?,
        filename,
    })
}

/// Decode, parse, and render on the blocking pool; one render pass is
/// synchronous CPU work.
async fn render_blocking(
    state: Arc<AppState>,
    parts: RequestParts,
) -> Result<RgbImage, (StatusCode, String)> {
    tokio::task::spawn_blocking(move || render_from_parts(&state, &parts))
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Task error: {e}"),
            )
        })?
        .map_err(to_status)
}

fn render_from_parts(
    state: &AppState,
    parts: &RequestParts,
) -> Result<RgbImage, PergaminoError> {
    let template = image::load_from_memory(&parts.template)
        .map_err(|e| PergaminoError::Image(format!("Failed to decode template: {e}")))?
        .to_rgb8();

    let specs: Vec<RegionSpec> = serde_json::from_str(&parts.regions_json)
        .map_err(|e| PergaminoError::InvalidInput(format!("Invalid regions JSON: {e}")))?;

    let items: Vec<_> = specs.iter().map(|spec| spec.resolve(None)).collect();
    render_certificate(&state.fonts, &template, &items)
}

fn to_status(e: PergaminoError) -> (StatusCode, String) {
    let status = match e {
        PergaminoError::Image(_) | PergaminoError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string())
}

fn internal(e: PergaminoError) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
