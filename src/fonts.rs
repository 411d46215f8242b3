//! # Font Registry
//!
//! Loads TTF/OTF resources from a fonts directory and caches the parsed
//! [`FontArc`] handles for the lifetime of the process. The cache is
//! append-only and keyed by filename; a font, once loaded, is assumed
//! immutable for the session.
//!
//! A font that fails to load never aborts a render: the render path calls
//! [`FontRegistry::get_or_fallback`], which substitutes the first loadable
//! system font and logs a warning, so the remaining regions on the same
//! certificate still render.

use ab_glyph::{Font, FontArc, ScaleFont};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{OnceLock, RwLock};

use crate::error::PergaminoError;
use crate::layout::TextMeasurer;

/// System fonts tried, in order, when a requested font cannot be loaded.
const FALLBACK_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "C:/Windows/Fonts/arial.ttf",
];

/// One available font, as reported by [`FontRegistry::list`].
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FontListing {
    /// Filename within the fonts directory, used as the font identifier.
    pub filename: String,
    /// Human-readable name derived from the file stem.
    pub display_name: String,
}

/// Process-lifetime font store.
///
/// `get` is idempotent: repeated requests for the same identifier return the
/// cached handle. Concurrent first loads of one identifier collapse to a
/// single load because the write lock is held across the read-and-parse.
pub struct FontRegistry {
    fonts_dir: PathBuf,
    cache: RwLock<HashMap<String, FontArc>>,
    fallback: OnceLock<Option<FontArc>>,
}

impl FontRegistry {
    pub fn new(fonts_dir: impl Into<PathBuf>) -> Self {
        Self {
            fonts_dir: fonts_dir.into(),
            cache: RwLock::new(HashMap::new()),
            fallback: OnceLock::new(),
        }
    }

    pub fn fonts_dir(&self) -> &Path {
        &self.fonts_dir
    }

    /// Enumerate the `.ttf`/`.otf` files in the fonts directory, sorted by
    /// display name. A missing directory yields an empty list.
    pub fn list(&self) -> Vec<FontListing> {
        let mut fonts = Vec::new();

        let entries = match fs::read_dir(&self.fonts_dir) {
            Ok(entries) => entries,
            Err(_) => return fonts,
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if !is_font_file(&path) {
                continue;
            }
            if let Some(filename) = path.file_name().and_then(|n| n.to_str()) {
                fonts.push(FontListing {
                    filename: filename.to_string(),
                    display_name: display_name(filename),
                });
            }
        }

        fonts.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        fonts
    }

    /// Load a font by filename, hitting the cache when possible.
    pub fn get(&self, filename: &str) -> Result<FontArc, PergaminoError> {
        {
            let cache = self.cache.read().expect("font cache poisoned");
            if let Some(font) = cache.get(filename) {
                return Ok(font.clone());
            }
        }

        // Load under the write lock so concurrent first requests for the
        // same identifier perform one parse.
        let mut cache = self.cache.write().expect("font cache poisoned");
        if let Some(font) = cache.get(filename) {
            return Ok(font.clone());
        }

        let font = load_font_file(&self.fonts_dir.join(filename))?;
        cache.insert(filename.to_string(), font.clone());
        Ok(font)
    }

    /// Load a font, substituting the system fallback on failure.
    ///
    /// Returns `None` only when the requested font fails *and* no fallback
    /// font exists on this machine; callers skip the region in that case.
    pub fn get_or_fallback(&self, filename: &str) -> Option<FontArc> {
        match self.get(filename) {
            Ok(font) => Some(font),
            Err(e) => {
                tracing::warn!(font = %filename, error = %e, "font load failed, using fallback");
                self.fallback()
            }
        }
    }

    /// The first loadable system fallback font, cached after the first probe.
    pub fn fallback(&self) -> Option<FontArc> {
        self.fallback
            .get_or_init(|| {
                for path in FALLBACK_FONT_PATHS {
                    if let Ok(font) = load_font_file(Path::new(path)) {
                        tracing::debug!(path, "loaded fallback font");
                        return Some(font);
                    }
                }
                tracing::warn!("no system fallback font found");
                None
            })
            .clone()
    }
}

fn load_font_file(path: &Path) -> Result<FontArc, PergaminoError> {
    let data = fs::read(path)
        .map_err(|e| PergaminoError::FontLoad(format!("{}: {}", path.display(), e)))?;
    FontArc::try_from_vec(data)
        .map_err(|e| PergaminoError::FontLoad(format!("{}: {}", path.display(), e)))
}

fn is_font_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ttf") || ext.eq_ignore_ascii_case("otf"))
}

/// Derive a display name from a font filename: drop the extension, turn
/// separators into spaces, collapse runs of whitespace.
pub fn display_name(filename: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);

    let name = stem
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    if name.is_empty() { stem.to_string() } else { name }
}

/// [`TextMeasurer`] backed by a parsed font's real metrics.
///
/// Width is the kerned sum of glyph advances; height is ascent + descent at
/// the given pixel scale.
pub struct GlyphMeasurer {
    font: FontArc,
}

impl GlyphMeasurer {
    pub fn new(font: FontArc) -> Self {
        Self { font }
    }
}

impl TextMeasurer for GlyphMeasurer {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        let scaled = self.font.as_scaled(font_size);
        let mut width = 0.0;
        let mut prev = None;

        for ch in text.chars() {
            let id = self.font.glyph_id(ch);
            if let Some(prev) = prev {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            prev = Some(id);
        }

        width
    }

    fn text_height(&self, font_size: f32) -> f32 {
        let scaled = self.font.as_scaled(font_size);
        scaled.ascent() - scaled.descent()
    }
}
