//! # Render Tests
//!
//! End-to-end tests of the fit-and-render pipeline against a real font.
//!
//! Glyph-level tests need an installed TTF; they locate one through the
//! registry's system fallback and return early (with a note) on machines
//! without any. The fit/placement contract itself is covered by unit tests
//! that use deterministic fake measurers and run everywhere.

use image::{Rgb, RgbImage};

use pergamino::certificate::{TextRegion, render_certificate, to_png_bytes};
use pergamino::fonts::{FontRegistry, GlyphMeasurer};
use pergamino::layout::{self, HAlign, MIN_FONT_SIZE, Rect, VAlign};

/// Registry pointing at a directory with no fonts, so every lookup exercises
/// the system-fallback path.
fn fallback_registry() -> FontRegistry {
    FontRegistry::new("/nonexistent/fonts")
}

/// The fallback font's measurer, when this machine has one.
fn fallback_measurer() -> Option<GlyphMeasurer> {
    fallback_registry().fallback().map(GlyphMeasurer::new)
}

fn white_template(w: u32, h: u32) -> RgbImage {
    RgbImage::from_pixel(w, h, Rgb([255, 255, 255]))
}

#[test]
fn long_name_shrinks_short_name_fits_at_max() {
    let Some(measurer) = fallback_measurer() else {
        eprintln!("no system font installed; skipping");
        return;
    };

    let rect = Rect::new(100.0, 100.0, 400.0, 100.0);

    let long = layout::fit_and_place(
        &measurer,
        "Alexandra Smith-Johnson",
        rect,
        70,
        HAlign::Center,
        VAlign::Bottom,
    );
    assert!(long.font_size < 70, "long name must shrink below the max");
    assert!(long.font_size >= MIN_FONT_SIZE);
    assert_eq!((70 - long.font_size) % 2, 0, "size must stay on the 2px grid");

    let short = layout::fit_and_place(&measurer, "Jo", rect, 70, HAlign::Center, VAlign::Bottom);
    assert_eq!(short.font_size, 70, "short name fits at max with zero decrements");
}

#[test]
fn fit_is_deterministic_across_calls() {
    let Some(measurer) = fallback_measurer() else {
        eprintln!("no system font installed; skipping");
        return;
    };

    let rect = Rect::new(50.0, 40.0, 300.0, 80.0);
    let a = layout::fit_and_place(&measurer, "Certificate of Merit", rect, 64, HAlign::Left, VAlign::Middle);
    let b = layout::fit_and_place(&measurer, "Certificate of Merit", rect, 64, HAlign::Left, VAlign::Middle);
    assert_eq!(a, b);
}

#[test]
fn rendered_text_is_centered_in_its_box() {
    let registry = fallback_registry();
    if registry.fallback().is_none() {
        eprintln!("no system font installed; skipping");
        return;
    }

    let template = white_template(600, 300);
    let rect = Rect::new(100.0, 50.0, 400.0, 120.0);
    let region = TextRegion {
        rect,
        max_font_size: 60,
        color: Rgb([0, 0, 0]),
        font: "missing.ttf".to_string(), // forces the fallback font
        h_align: HAlign::Center,
        v_align: VAlign::Middle,
    };

    let out = render_certificate(&registry, &template, &[(region, "Hello".to_string())]).unwrap();

    // Find the horizontal extent of the drawn pixels.
    let mut min_x = u32::MAX;
    let mut max_x = 0u32;
    for (x, _, pixel) in out.enumerate_pixels() {
        if pixel.0[0] < 128 {
            min_x = min_x.min(x);
            max_x = max_x.max(x);
        }
    }
    assert!(min_x < max_x, "something must have been drawn");

    let midpoint = (min_x + max_x) as f32 / 2.0;
    let box_center = rect.x + rect.w / 2.0;
    assert!(
        (midpoint - box_center).abs() <= 4.0,
        "text midpoint {midpoint} should sit at the box center {box_center}"
    );
}

#[test]
fn empty_text_output_is_pixel_identical_to_omitting_the_region() {
    let registry = fallback_registry();
    let template = white_template(300, 200);

    let region = TextRegion {
        rect: Rect::new(20.0, 20.0, 200.0, 100.0),
        ..Default::default()
    };

    let with_empty =
        render_certificate(&registry, &template, &[(region, String::new())]).unwrap();
    let without = render_certificate(&registry, &template, &[]).unwrap();

    assert_eq!(with_empty.as_raw(), without.as_raw());
}

#[test]
fn output_is_native_resolution_and_encodes() {
    let registry = fallback_registry();
    let template = white_template(1000, 600);

    let region = TextRegion {
        rect: Rect::new(100.0, 100.0, 400.0, 100.0),
        max_font_size: 70,
        font: "missing.ttf".to_string(),
        ..Default::default()
    };

    let out =
        render_certificate(&registry, &template, &[(region, "Ada Lovelace".to_string())]).unwrap();
    assert_eq!((out.width(), out.height()), (1000, 600));

    let png = to_png_bytes(&out).unwrap();
    let decoded = image::load_from_memory(&png).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (1000, 600));
}

/// A real TTF file on this machine, for tests that need to load through the
/// registry's directory path.
fn system_font_file() -> Option<&'static str> {
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    ]
    .into_iter()
    .find(|p| std::path::Path::new(p).exists())
}

#[test]
fn font_loads_are_cached_for_the_session() {
    let Some(source) = system_font_file() else {
        eprintln!("no system font installed; skipping");
        return;
    };

    let dir = std::env::temp_dir().join(format!("pergamino_cache_test_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let font_path = dir.join("cached.ttf");
    std::fs::copy(source, &font_path).unwrap();

    let registry = FontRegistry::new(&dir);
    registry.get("cached.ttf").unwrap();

    // Only the first request touches the filesystem: the cached handle
    // keeps serving after the file is gone, while an uncached name fails.
    std::fs::remove_file(&font_path).unwrap();
    assert!(registry.get("cached.ttf").is_ok());
    assert!(registry.get("fresh.ttf").is_err());

    std::fs::remove_dir_all(&dir).ok();
}
