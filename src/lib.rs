//! # Pergamino - Certificate Generator
//!
//! Pergamino renders personalized certificates: it takes a template image,
//! a set of rectangular text regions, and per-row text values, and draws
//! each value into its region with auto-fitted sizing and alignment.
//! It provides:
//!
//! - **Auto-fit layout**: deterministic largest-fitting font size search
//!   plus alignment/anchor math, shared by every call site
//! - **Font registry**: cached TTF/OTF loading with system-font fallback
//! - **Render pass**: template + regions → full-resolution output raster
//! - **HTTP server**: font discovery, live fit previews, and generation
//!
//! ## Quick Start
//!
//! ```no_run
//! use pergamino::certificate::{render_certificate, to_png_bytes};
//! use pergamino::fonts::FontRegistry;
//! use pergamino::schema::RegionSpec;
//!
//! # fn main() -> Result<(), pergamino::PergaminoError> {
//! let registry = FontRegistry::new("fonts");
//!
//! let template = image::open("template.png")
//!     .map_err(|e| pergamino::PergaminoError::Image(e.to_string()))?
//!     .to_rgb8();
//!
//! let specs: Vec<RegionSpec> = serde_json::from_str(
//!     r#"[{"x": 100, "y": 100, "w": 400, "h": 100, "text": "Ada Lovelace",
//!          "fontSize": 70, "fontFile": "GreatVibes-Regular.ttf"}]"#,
//! )
//! .map_err(|e| pergamino::PergaminoError::InvalidInput(e.to_string()))?;
//!
//! let items: Vec<_> = specs.iter().map(|s| s.resolve(None)).collect();
//! let raster = render_certificate(&registry, &template, &items)?;
//! std::fs::write("out.png", to_png_bytes(&raster)?)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`layout`] | Auto-fit sizing and alignment math (pure) |
//! | [`fonts`] | Font registry and glyph measurement |
//! | [`certificate`] | Render pass and raster extraction |
//! | [`schema`] | Region JSON wire format |
//! | [`server`] | HTTP API |
//! | [`error`] | Error types |

pub mod certificate;
pub mod error;
pub mod fonts;
pub mod layout;
pub mod schema;
pub mod server;

// Re-exports for convenience
pub use certificate::{TextRegion, render_certificate};
pub use error::PergaminoError;
pub use fonts::FontRegistry;
pub use layout::{fit_and_place, fit_font_size, place};
