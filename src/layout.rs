//! # Auto-Fit Text Layout
//!
//! The shared fit-and-place computation: given a text string, a bounding box,
//! a maximum font size, and alignment modes, find the largest font size that
//! makes the text fit inside the box, then compute the baseline anchor point
//! for drawing.
//!
//! This module is pure geometry. Text measurement happens behind the
//! [`TextMeasurer`] trait, so the algorithm has no font or I/O dependencies
//! and every caller (full render pass, live-preview fit endpoint, tests)
//! goes through the same implementation.
//!
//! ## Fitting
//!
//! The search is a monotonic linear scan: start at `max_font_size`, measure,
//! and step down by [`FIT_STEP`] until both width and height fit inside the
//! box minus [`PADDING`]. If nothing fits by [`MIN_FONT_SIZE`], that floor is
//! used anyway and the text may visually overflow the box. The chosen size is
//! therefore always `max_font_size - 2k` for some `k >= 0`, clamped at 10,
//! which keeps two independent renderers pixel-compatible.

use serde::{Deserialize, Serialize};

/// Smallest font size the fitter will ever return.
pub const MIN_FONT_SIZE: u32 = 10;

/// Pixels subtracted from both the width and height budgets when fitting.
pub const PADDING: f32 = 10.0;

/// Step, in px, by which the fitter shrinks the font size per iteration.
pub const FIT_STEP: u32 = 2;

/// Horizontal inset from the box edge for left/right-aligned anchors.
pub const H_INSET: f32 = 5.0;

/// Baseline inset below the box top for top-aligned text.
pub const TOP_BASELINE_INSET: f32 = 5.0;

/// Baseline inset above the box bottom for bottom-aligned text.
pub const BOTTOM_BASELINE_INSET: f32 = 8.0;

/// Horizontal alignment of text within its region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Vertical alignment of text within its region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VAlign {
    Top,
    Middle,
    #[default]
    Bottom,
}

/// A text region's rectangle in template pixel coordinates.
///
/// Origin is the template's top-left corner, y grows downward. Out-of-bounds
/// rectangles are not rejected; they simply draw clipped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

/// The computed drawing parameters for one (region, text) pair.
///
/// `anchor_x`/`anchor_y` are where the text's alignment anchor sits:
/// horizontally the left edge, midpoint, or right edge of the rendered text
/// depending on `h_align`; vertically always the alphabetic baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub font_size: u32,
    pub anchor_x: f32,
    pub anchor_y: f32,
    pub h_align: HAlign,
    pub v_align: VAlign,
}

/// Measures text extents at a given font size.
///
/// The production implementation wraps a parsed font
/// ([`GlyphMeasurer`](crate::fonts::GlyphMeasurer)); tests use deterministic
/// fakes. A measurer without exact vertical metrics may keep the default
/// `text_height`, which approximates the line height as the font size itself.
pub trait TextMeasurer {
    /// Rendered width of `text` at `font_size`, in px.
    fn text_width(&self, text: &str, font_size: f32) -> f32;

    /// Rendered line height at `font_size`, in px (ascent + descent when
    /// exact metrics are available).
    fn text_height(&self, font_size: f32) -> f32 {
        font_size
    }
}

/// Find the largest font size in `[MIN_FONT_SIZE, max_font_size]` at which
/// `text` fits inside a `box_w` x `box_h` box, scanning downward from
/// `max_font_size` in steps of [`FIT_STEP`].
///
/// Returns [`MIN_FONT_SIZE`] when nothing fits; the caller draws anyway and
/// accepts the overflow.
pub fn fit_font_size<M: TextMeasurer + ?Sized>(
    measurer: &M,
    text: &str,
    box_w: f32,
    box_h: f32,
    max_font_size: u32,
) -> u32 {
    let mut font_size = max_font_size.max(MIN_FONT_SIZE);

    while font_size >= MIN_FONT_SIZE {
        let width = measurer.text_width(text, font_size as f32);
        let height = measurer.text_height(font_size as f32);

        if width <= box_w - PADDING && height <= box_h - PADDING {
            return font_size;
        }

        font_size -= FIT_STEP;
    }

    MIN_FONT_SIZE
}

/// Compute the baseline anchor for an already-fitted font size.
///
/// Pure arithmetic; no re-measurement. The vertical anchor is where the
/// alphabetic baseline sits, so top alignment adds the font size (approximate
/// ascent) to clear the box's top edge.
pub fn place(rect: Rect, font_size: u32, h_align: HAlign, v_align: VAlign) -> Placement {
    let fs = font_size as f32;

    let anchor_x = match h_align {
        HAlign::Left => rect.x + H_INSET,
        HAlign::Center => rect.x + rect.w / 2.0,
        HAlign::Right => rect.x + rect.w - H_INSET,
    };

    let anchor_y = match v_align {
        VAlign::Top => rect.y + fs + TOP_BASELINE_INSET,
        VAlign::Middle => rect.y + (rect.h + fs) / 2.0,
        VAlign::Bottom => rect.y + rect.h - BOTTOM_BASELINE_INSET,
    };

    Placement {
        font_size,
        anchor_x,
        anchor_y,
        h_align,
        v_align,
    }
}

/// Fit `text` into `rect` and compute its placement in one call.
///
/// This is the standalone entry point for live-preview callers; the render
/// pass uses the same two functions, so both call sites share one
/// implementation.
pub fn fit_and_place<M: TextMeasurer + ?Sized>(
    measurer: &M,
    text: &str,
    rect: Rect,
    max_font_size: u32,
    h_align: HAlign,
    v_align: VAlign,
) -> Placement {
    let font_size = fit_font_size(measurer, text, rect.w, rect.h, max_font_size);
    place(rect, font_size, h_align, v_align)
}
