//! # Error Types
//!
//! This module defines error types used throughout the pergamino library.

use thiserror::Error;

/// Main error type for pergamino operations
#[derive(Debug, Error)]
pub enum PergaminoError {
    /// A font resource could not be fetched or parsed. Absorbed inside the
    /// render pass via fallback substitution; never fatal to a render.
    #[error("Font load error: {0}")]
    FontLoad(String),

    /// Render attempted before its inputs were usable (e.g. an empty
    /// template raster). Fatal to that render call.
    #[error("Not ready: {0}")]
    NotReady(String),

    /// Image decode/encode error
    #[error("Image error: {0}")]
    Image(String),

    /// Malformed caller input (region JSON, filenames, colors)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
