//! # HTTP Server for Certificate Generation
//!
//! Exposes the render engine over HTTP: font discovery, a fit-only endpoint
//! for live editor previews, and full certificate generation from an
//! uploaded template plus region JSON.
//!
//! ## Usage
//!
//! ```bash
//! pergamino serve --listen 0.0.0.0:8001 --fonts-dir fonts
//! ```

mod handlers;
mod state;

pub use state::ServerConfig;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::error::PergaminoError;
use state::AppState;

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use pergamino::server::{ServerConfig, serve};
///
/// # async fn example() -> Result<(), pergamino::error::PergaminoError> {
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:8001".to_string(),
///     fonts_dir: "fonts".into(),
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), PergaminoError> {
    let app_state = Arc::new(AppState::new(config.clone()));

    let app = Router::new()
        // Health check
        .route("/", get(handlers::health))
        // Font API
        .route("/api/fonts", get(handlers::fonts::list))
        .route("/api/fonts/:filename", get(handlers::fonts::serve_file))
        // Certificate API (50MB limit for template uploads)
        .route("/api/certificate/fit", post(handlers::certificate::fit))
        .route(
            "/api/certificate/preview",
            post(handlers::certificate::preview)
                .layer(DefaultBodyLimit::max(50 * 1024 * 1024)),
        )
        .route(
            "/api/certificate/generate",
            post(handlers::certificate::generate)
                .layer(DefaultBodyLimit::max(50 * 1024 * 1024)),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    tracing::info!(listen = %config.listen_addr, fonts_dir = %config.fonts_dir.display(), "pergamino server starting");

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| {
            PergaminoError::InvalidInput(format!("Failed to bind to {}: {}", config.listen_addr, e))
        })?;

    axum::serve(listener, app)
        .await
        .map_err(|e| PergaminoError::Io(e))?;

    Ok(())
}
