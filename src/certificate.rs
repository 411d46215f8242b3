//! # Certificate Render Pass
//!
//! Produces one finished certificate raster: the template image at native
//! resolution with every non-empty text region fitted, placed, and drawn
//! into it.
//!
//! ```text
//! template + [(TextRegion, text)] → render_certificate
//!                                        ↓
//!                     per region: resolve font (with fallback)
//!                                 fit font size   (layout::fit_font_size)
//!                                 compute anchor  (layout::place)
//!                                 rasterize glyphs, coverage-blended
//!                                        ↓
//!                                 RgbImage → to_png_bytes / to_jpeg_bytes
//! ```
//!
//! The output raster always has the template's native pixel dimensions,
//! regardless of any display scale a preview UI applies elsewhere. Region
//! outlines and editing handles are an editor concern and never drawn here.

use ab_glyph::{Font, FontArc, ScaleFont, point};
use image::{Rgb, RgbImage};
use std::io::Cursor;

use crate::error::PergaminoError;
use crate::fonts::{FontRegistry, GlyphMeasurer};
use crate::layout::{self, HAlign, Placement, Rect, TextMeasurer, VAlign};

/// JPEG quality used for generated certificates.
pub const JPEG_QUALITY: u8 = 92;

/// One rectangular text region with resolved style.
#[derive(Debug, Clone)]
pub struct TextRegion {
    /// Rectangle in template pixel coordinates.
    pub rect: Rect,
    /// Upper bound for the auto-fit search, in px.
    pub max_font_size: u32,
    pub color: Rgb<u8>,
    /// Font identifier resolved through the [`FontRegistry`].
    pub font: String,
    pub h_align: HAlign,
    pub v_align: VAlign,
}

impl Default for TextRegion {
    fn default() -> Self {
        Self {
            rect: Rect::new(0.0, 0.0, 100.0, 50.0),
            max_font_size: 60,
            color: Rgb([0, 0, 0]),
            font: String::new(),
            h_align: HAlign::default(),
            v_align: VAlign::default(),
        }
    }
}

/// Render one certificate for one data row.
///
/// Regions whose resolved text is empty or whitespace-only are skipped
/// entirely. A region whose font cannot be loaded falls back to the system
/// font; if no fallback exists either, that region alone is skipped and the
/// rest of the certificate still renders.
///
/// Fails with [`PergaminoError::NotReady`] when the template raster has zero
/// dimensions; the pass never proceeds over a partially initialized surface.
pub fn render_certificate(
    registry: &FontRegistry,
    template: &RgbImage,
    items: &[(TextRegion, String)],
) -> Result<RgbImage, PergaminoError> {
    if template.width() == 0 || template.height() == 0 {
        return Err(PergaminoError::NotReady(
            "template raster has zero dimensions".to_string(),
        ));
    }

    let mut canvas = template.clone();

    for (region, text) in items {
        if text.trim().is_empty() {
            continue;
        }

        let Some(font) = registry.get_or_fallback(&region.font) else {
            tracing::warn!(font = %region.font, "no usable font, skipping region");
            continue;
        };

        let measurer = GlyphMeasurer::new(font.clone());
        let placement = layout::fit_and_place(
            &measurer,
            text,
            region.rect,
            region.max_font_size,
            region.h_align,
            region.v_align,
        );

        draw_text(&mut canvas, &font, &measurer, text, placement, region.color);
    }

    Ok(canvas)
}

/// Rasterize `text` at its computed placement, blending glyph coverage over
/// the canvas. Pixels outside the canvas clip silently.
fn draw_text(
    canvas: &mut RgbImage,
    font: &FontArc,
    measurer: &GlyphMeasurer,
    text: &str,
    placement: Placement,
    color: Rgb<u8>,
) {
    let font_size = placement.font_size as f32;
    let width = measurer.text_width(text, font_size);

    // Convert the alignment anchor into the left edge of the text run.
    let origin_x = match placement.h_align {
        HAlign::Left => placement.anchor_x,
        HAlign::Center => placement.anchor_x - width / 2.0,
        HAlign::Right => placement.anchor_x - width,
    };

    let scaled = font.as_scaled(font_size);
    let mut caret = origin_x;
    let mut prev = None;

    for ch in text.chars() {
        let id = font.glyph_id(ch);
        if let Some(prev) = prev {
            caret += scaled.kern(prev, id);
        }

        let glyph = id.with_scale_and_position(font_size, point(caret, placement.anchor_y));
        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|px, py, coverage| {
                let x = px as i32 + bounds.min.x as i32;
                let y = py as i32 + bounds.min.y as i32;

                if x >= 0 && x < canvas.width() as i32 && y >= 0 && y < canvas.height() as i32 {
                    let pixel = canvas.get_pixel_mut(x as u32, y as u32);
                    blend(pixel, color, coverage.clamp(0.0, 1.0));
                }
            });
        }

        caret += scaled.h_advance(id);
        prev = Some(id);
    }
}

fn blend(dst: &mut Rgb<u8>, src: Rgb<u8>, coverage: f32) {
    for i in 0..3 {
        let d = dst.0[i] as f32;
        let s = src.0[i] as f32;
        dst.0[i] = (d + (s - d) * coverage).round() as u8;
    }
}

/// Encode a finished raster as PNG bytes.
pub fn to_png_bytes(img: &RgbImage) -> Result<Vec<u8>, PergaminoError> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png)
        .map_err(|e| PergaminoError::Image(format!("PNG encode failed: {e}")))?;
    Ok(buf.into_inner())
}

/// Encode a finished raster as JPEG bytes at [`JPEG_QUALITY`].
pub fn to_jpeg_bytes(img: &RgbImage) -> Result<Vec<u8>, PergaminoError> {
    let mut buf = Vec::new();
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY);
    img.write_with_encoder(encoder)
        .map_err(|e| PergaminoError::Image(format!("JPEG encode failed: {e}")))?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn white_template(w: u32, h: u32) -> RgbImage {
        RgbImage::from_pixel(w, h, Rgb([255, 255, 255]))
    }

    fn region(rect: Rect) -> TextRegion {
        TextRegion {
            rect,
            max_font_size: 40,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_template_is_not_ready() {
        let registry = FontRegistry::new("/nonexistent/fonts");
        let template = RgbImage::new(0, 0);
        let err = render_certificate(&registry, &template, &[]).unwrap_err();
        assert!(matches!(err, PergaminoError::NotReady(_)));
    }

    #[test]
    fn test_output_matches_template_dimensions() {
        let registry = FontRegistry::new("/nonexistent/fonts");
        let template = white_template(1000, 600);
        let items = vec![(region(Rect::new(100.0, 100.0, 400.0, 100.0)), "Name".to_string())];
        let out = render_certificate(&registry, &template, &items).unwrap();
        assert_eq!((out.width(), out.height()), (1000, 600));
    }

    #[test]
    fn test_empty_text_region_draws_nothing() {
        let registry = FontRegistry::new("/nonexistent/fonts");
        let template = white_template(200, 120);

        let with_empty = render_certificate(
            &registry,
            &template,
            &[
                (region(Rect::new(10.0, 10.0, 100.0, 50.0)), String::new()),
                (region(Rect::new(10.0, 60.0, 100.0, 50.0)), "   ".to_string()),
            ],
        )
        .unwrap();
        let without = render_certificate(&registry, &template, &[]).unwrap();

        assert_eq!(with_empty.as_raw(), without.as_raw());
    }

    #[test]
    fn test_blend_full_coverage_replaces_pixel() {
        let mut dst = Rgb([255u8, 255, 255]);
        blend(&mut dst, Rgb([10, 20, 30]), 1.0);
        assert_eq!(dst, Rgb([10, 20, 30]));
    }

    #[test]
    fn test_blend_zero_coverage_keeps_pixel() {
        let mut dst = Rgb([200u8, 100, 50]);
        blend(&mut dst, Rgb([0, 0, 0]), 0.0);
        assert_eq!(dst, Rgb([200, 100, 50]));
    }

    #[test]
    fn test_png_roundtrip_preserves_dimensions() {
        let img = white_template(64, 32);
        let bytes = to_png_bytes(&img).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (64, 32));
    }

    #[test]
    fn test_jpeg_encodes_nonempty() {
        let img = white_template(64, 32);
        let bytes = to_jpeg_bytes(&img).unwrap();
        assert!(!bytes.is_empty());
    }
}
