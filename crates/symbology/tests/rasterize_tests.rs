//! Tests for symbol rasterization, placeholders and WMS symbology.
//!
//! Tests the icon artifacts produced for each symbol kind, including:
//! - Marker fit (downscale, never upscale)
//! - Picture markers and fills from inline data and remote URLs
//! - Degradation to the blank icon
//! - Placeholder initials

mod common;

use std::sync::Arc;

use common::MockImageLoader;
use symbology::{
    generate_placeholder_symbology, generate_wms_symbology, IconImage, Rasterizer, Symbol,
    SymbologyError,
};
use test_utils::{
    assert_approx_eq, assert_markup_contains, picture_marker_json, png_bytes, png_data_uri,
    svg_bytes,
};

// ============================================================================
// Helper functions
// ============================================================================

fn symbol(json: &str) -> Symbol {
    serde_json::from_str(json).unwrap()
}

/// Scale factor of the first `scale(...)` transform in the markup.
fn scale_of(icon: &IconImage) -> f64 {
    let markup = icon.markup();
    let start = markup.find("scale(").expect("markup has a scale") + "scale(".len();
    let end = start + markup[start..].find(')').unwrap();
    markup[start..end].parse().unwrap()
}

// ============================================================================
// Vector symbols
// ============================================================================

#[tokio::test]
async fn test_marker_larger_than_content_is_downscaled() {
    let icon = Rasterizer::offline()
        .rasterize(&symbol(
            r#"{"type": "esriSMS", "style": "esriSMSSquare", "color": [0,0,0,255], "size": 40}"#,
        ))
        .await
        .unwrap();
    assert_approx_eq!(scale_of(&icon), 0.6, 0.001);
}

#[tokio::test]
async fn test_marker_smaller_than_content_not_upscaled() {
    let icon = Rasterizer::offline()
        .rasterize(&symbol(
            r#"{"type": "esriSMS", "style": "esriSMSDiamond", "color": [0,0,0,255], "size": 6}"#,
        ))
        .await
        .unwrap();
    assert_approx_eq!(scale_of(&icon), 1.0, 0.0001);
}

#[tokio::test]
async fn test_rotated_square_measured_after_rotation() {
    // A 20 unit square rotated 45 degrees spans 20*sqrt(2) ~= 28.28
    let icon = Rasterizer::offline()
        .rasterize(&symbol(
            r#"{"type": "esriSMS", "style": "esriSMSSquare", "color": [0,0,0,255], "size": 20, "angle": 45}"#,
        ))
        .await
        .unwrap();
    assert_approx_eq!(scale_of(&icon), 24.0 / (20.0 * 2f64.sqrt()), 0.01);
}

#[tokio::test]
async fn test_fill_outline_applied() {
    let icon = Rasterizer::offline()
        .rasterize(&symbol(
            r#"{"type": "esriSFS", "style": "esriSFSCross", "color": [0,0,255,255],
                "outline": {"type": "esriSLS", "style": "esriSLSDashDot", "color": [255,0,0,128], "width": 2}}"#,
        ))
        .await
        .unwrap();
    assert_markup_contains!(
        icon.markup(),
        r#"width="5" height="5""#,
        r##"stroke="#ff0000""##,
        r#"stroke-dasharray="5.333,4,1.333,4""#,
        r#"stroke-width="2""#,
    );
}

#[tokio::test]
async fn test_cartographic_line_caps() {
    let icon = Rasterizer::offline()
        .rasterize(&symbol(
            r#"{"type": "esriCLS", "style": "esriSLSSolid", "color": [0,0,0,255], "width": 4,
                "cap": "esriLCSRound", "join": "esriLJSBevel", "miterLimit": 2}"#,
        ))
        .await
        .unwrap();
    assert_markup_contains!(
        icon.markup(),
        r#"stroke-linecap="round""#,
        r#"stroke-linejoin="bevel""#,
        r#"stroke-miterlimit="2""#,
    );
}

#[tokio::test]
async fn test_unknown_marker_style_degrades_to_blank() {
    let s = symbol(r#"{"type": "esriSMS", "style": "esriSMSStar", "size": 10}"#);
    let rasterizer = Rasterizer::offline();
    let err = rasterizer.rasterize(&s).await.unwrap_err();
    assert!(matches!(err, SymbologyError::UnsupportedSymbol(_)));
    assert!(rasterizer.rasterize_or_blank(&s).await.unwrap().is_empty());
}

// ============================================================================
// Picture symbols
// ============================================================================

#[tokio::test]
async fn test_picture_marker_inline_data() {
    let icon = Rasterizer::offline()
        .rasterize(&symbol(&picture_marker_json(56, 14, 0.0)))
        .await
        .unwrap();
    assert_markup_contains!(
        icon.markup(),
        "translate(16 16) scale(0.5) rotate(0)",
        r#"x="-28" y="-7" width="56" height="14""#,
        "xlink:href=\"data:image/png;base64,",
    );
}

#[tokio::test]
async fn test_picture_marker_rotation_fits_28() {
    let icon = Rasterizer::offline()
        .rasterize(&symbol(&picture_marker_json(40, 40, 45.0)))
        .await
        .unwrap();
    assert_approx_eq!(scale_of(&icon), 28.0 / (40.0 * 2f64.sqrt()), 0.001);
    assert_markup_contains!(icon.markup(), "rotate(45)");
}

#[tokio::test]
async fn test_picture_marker_remote_url_uses_decoded_size() {
    let loader = MockImageLoader::new().with_image(
        "http://img/pin.png",
        png_bytes(12, 18, [255, 255, 0, 255]),
        Some("image/png; charset=binary"),
    );
    let rasterizer = Rasterizer::new(Arc::new(loader));
    let icon = rasterizer
        .rasterize(&symbol(r#"{"type": "esriPMS", "url": "http://img/pin.png"}"#))
        .await
        .unwrap();
    assert_markup_contains!(
        icon.markup(),
        r#"width="12" height="18""#,
        "scale(1)",
        "data:image/png;base64,"
    );
}

#[tokio::test]
async fn test_picture_marker_data_url() {
    let json = format!(
        r#"{{"type": "esriPMS", "url": "{}", "width": 8, "height": 8}}"#,
        png_data_uri(8, 8, [0, 0, 0, 255])
    );
    let icon = Rasterizer::offline().rasterize(&symbol(&json)).await.unwrap();
    assert_markup_contains!(icon.markup(), "data:image/png;base64,");
}

#[tokio::test]
async fn test_inline_data_wins_over_url() {
    let loader = Arc::new(MockImageLoader::new());
    let mut value: serde_json::Value =
        serde_json::from_str(&picture_marker_json(4, 4, 0.0)).unwrap();
    value["url"] = serde_json::json!("http://img/never-fetched.png");
    let s: Symbol = serde_json::from_value(value).unwrap();

    Rasterizer::new(loader.clone()).rasterize(&s).await.unwrap();
    assert!(loader.requests().is_empty());
}

#[tokio::test]
async fn test_picture_fetch_failure_rejects_then_degrades() {
    let loader = Arc::new(MockImageLoader::new());
    let rasterizer = Rasterizer::new(loader.clone());
    let s = symbol(r#"{"type": "esriPMS", "url": "http://img/gone.png"}"#);

    let err = rasterizer.rasterize(&s).await.unwrap_err();
    assert!(matches!(err, SymbologyError::ImageFetch { .. }));

    let blank = rasterizer.rasterize_or_blank(&s).await.unwrap();
    assert!(blank.is_empty());
    assert_eq!(blank.width(), 32.0);
    assert_eq!(loader.requests().len(), 2);
}

#[tokio::test]
async fn test_picture_without_source_is_not_blanked() {
    let loader = Arc::new(MockImageLoader::new());
    let rasterizer = Rasterizer::new(loader.clone());
    let s = symbol(r#"{"type": "esriPMS", "width": 12}"#);

    let err = rasterizer.rasterize_or_blank(&s).await.unwrap_err();
    assert!(matches!(err, SymbologyError::MalformedInput(_)));
    assert!(loader.requests().is_empty());
}

#[tokio::test]
async fn test_picture_fill_tiles_scaled_image() {
    let json = format!(
        r#"{{"type": "esriPFS", "url": "{}", "width": 6, "height": 4, "xscale": 2, "yscale": 0.5,
             "outline": {{"type": "esriSLS", "style": "esriSLSSolid", "color": [0,0,0,255], "width": 1}}}}"#,
        png_data_uri(6, 4, [0, 255, 0, 255])
    );
    let icon = Rasterizer::offline().rasterize(&symbol(&json)).await.unwrap();
    assert_markup_contains!(
        icon.markup(),
        r#"patternUnits="userSpaceOnUse" width="12" height="2""#,
        r#"<rect x="4" y="4" width="24" height="24" fill="url(#"#,
        r##"stroke="#000000""##,
    );
}

#[tokio::test]
async fn test_svg_picture_uses_svg_size() {
    let loader = MockImageLoader::new().with_image(
        "http://img/icon.svg",
        svg_bytes(30, 15),
        Some("image/svg+xml"),
    );
    let icon = Rasterizer::new(Arc::new(loader))
        .rasterize(&symbol(r#"{"type": "esriPMS", "url": "http://img/icon.svg"}"#))
        .await
        .unwrap();
    assert_markup_contains!(icon.markup(), r#"width="30" height="15""#, "scale(0.933)");
}

// ============================================================================
// Placeholder and WMS symbology
// ============================================================================

#[test]
fn test_placeholder_river() {
    let entry = generate_placeholder_symbology("River", Some("#336699"));
    assert_eq!(entry.label, "River");
    assert_eq!(entry.icon.width(), 32.0);
    assert_eq!(entry.icon.height(), 32.0);
    assert_markup_contains!(
        entry.icon.markup(),
        r##"fill="#336699""##,
        r##"fill="#ffffff""##,
        ">R</text>",
    );
    assert!(entry.icon.to_svg().contains(r#"viewBox="0 0 32 32""#));
}

#[test]
fn test_placeholder_lowercase_name() {
    let entry = generate_placeholder_symbology("wetlands", None);
    assert_markup_contains!(entry.icon.markup(), ">W</text>", r##"fill="#2e2e2e""##);
}

#[tokio::test]
async fn test_wms_symbology_natural_view_box() {
    let loader = MockImageLoader::new().with_image(
        "http://wms/legend.png",
        png_bytes(100, 40, [9, 9, 9, 255]),
        Some("image/png"),
    );
    let entry = generate_wms_symbology(
        &Rasterizer::new(Arc::new(loader)),
        "Radar",
        Some("http://wms/legend.png"),
    )
    .await;

    assert_eq!(entry.label, "Radar");
    let view_box = entry.icon.view_box();
    assert_eq!((view_box.width, view_box.height), (100.0, 40.0));
    assert!(entry.icon.to_svg().contains(r#"viewBox="0 0 100 40""#));
}

#[tokio::test]
async fn test_wms_symbology_data_uri() {
    let uri = png_data_uri(5, 5, [1, 1, 1, 255]);
    let entry = generate_wms_symbology(&Rasterizer::offline(), "Sat", Some(&uri)).await;
    assert!(!entry.icon.is_empty());
}

#[tokio::test]
async fn test_wms_symbology_bad_data_is_empty() {
    let entry =
        generate_wms_symbology(&Rasterizer::offline(), "Sat", Some("data:image/png;base64,!!!"))
            .await;
    assert!(entry.icon.is_empty());
}
