//! # Region JSON Schema
//!
//! The wire format shared by the HTTP API and the CLI: a JSON array of text
//! box objects describing where and how each value is drawn on the template.
//!
//! ```json
//! [{"x": 100, "y": 200, "w": 300, "h": 50, "text": "John Doe",
//!   "fontSize": 60, "fontColor": "#000000", "fontFile": "GreatVibes-Regular.ttf",
//!   "hAlign": "center", "vAlign": "bottom"}]
//! ```
//!
//! A box carries either literal `text` or a `field` name resolved against a
//! data row at render time. Unknown fields are ignored; missing style fields
//! take the documented defaults (fontSize 60, black, center/bottom).

use image::Rgb;
use serde::Deserialize;
use std::collections::HashMap;

use crate::certificate::TextRegion;
use crate::layout::{HAlign, Rect, VAlign};

/// A data row: field name → text value.
pub type RenderRow = HashMap<String, String>;

fn default_w() -> f32 {
    100.0
}

fn default_h() -> f32 {
    50.0
}

fn default_font_size() -> u32 {
    60
}

fn default_color() -> String {
    "#000000".to_string()
}

/// One text box as supplied by callers.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionSpec {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default = "default_w")]
    pub w: f32,
    #[serde(default = "default_h")]
    pub h: f32,
    /// Literal text for this box.
    #[serde(default)]
    pub text: Option<String>,
    /// Name of the data row field this box is bound to. Takes precedence
    /// over `text` when a row is supplied.
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default = "default_font_size")]
    pub font_size: u32,
    #[serde(default = "default_color")]
    pub font_color: String,
    #[serde(default)]
    pub font_file: String,
    #[serde(default)]
    pub h_align: HAlign,
    #[serde(default)]
    pub v_align: VAlign,
}

impl RegionSpec {
    /// Resolve this spec into a render-ready region and its literal text.
    ///
    /// With a row, a bound `field` resolves through it (missing fields give
    /// empty text, which the render pass skips); without one, the literal
    /// `text` is used.
    pub fn resolve(&self, row: Option<&RenderRow>) -> (TextRegion, String) {
        let text = match (&self.field, row) {
            (Some(field), Some(row)) => row.get(field).cloned().unwrap_or_default(),
            _ => self.text.clone().unwrap_or_default(),
        };

        let region = TextRegion {
            rect: Rect::new(self.x, self.y, self.w, self.h),
            max_font_size: self.font_size,
            color: parse_hex_color(&self.font_color),
            font: self.font_file.clone(),
            h_align: self.h_align,
            v_align: self.v_align,
        };

        (region, text)
    }
}

/// Parse a `#rrggbb` color, leniently. Anything unparseable is black, so a
/// malformed color degrades visibly rather than failing a whole batch.
pub fn parse_hex_color(s: &str) -> Rgb<u8> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() == 6
        && let Ok(value) = u32::from_str_radix(hex, 16)
    {
        return Rgb([(value >> 16) as u8, (value >> 8) as u8, value as u8]);
    }
    Rgb([0, 0, 0])
}

/// Create a safe output filename: keep alphanumerics, spaces, `-` and `_`,
/// turn spaces into underscores, cap at 50 chars. Falls back to
/// `"certificate"` when nothing survives.
pub fn sanitize_filename(name: &str) -> String {
    let safe: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    let safe: String = safe.trim().replace(' ', "_").chars().take(50).collect();

    if safe.is_empty() {
        "certificate".to_string()
    } else {
        safe
    }
}
