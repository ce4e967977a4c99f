//! Image generators for picture symbol tests.
//!
//! Produces small, real image files so decoding paths run against genuine
//! bytes instead of hand-written headers.

use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{ImageOutputFormat, Rgba, RgbaImage};

/// Encodes a solid-color PNG of the given size.
///
/// # Example
///
/// ```
/// use test_utils::png_bytes;
///
/// let png = png_bytes(4, 2, [255, 0, 0, 255]);
/// assert_eq!(&png[1..4], b"PNG");
/// ```
pub fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba(rgba));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageOutputFormat::Png)
        .expect("PNG encoding of an in-memory image");
    out.into_inner()
}

/// Base64 body of [`png_bytes`], as found in `imageData` fields.
pub fn png_base64(width: u32, height: u32, rgba: [u8; 4]) -> String {
    STANDARD.encode(png_bytes(width, height, rgba))
}

/// `data:image/png;base64,...` URI of [`png_bytes`].
pub fn png_data_uri(width: u32, height: u32, rgba: [u8; 4]) -> String {
    format!("data:image/png;base64,{}", png_base64(width, height, rgba))
}

/// A minimal SVG document with an explicit size.
pub fn svg_bytes(width: u32, height: u32) -> Vec<u8> {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}"><rect width="{w}" height="{h}" fill="blue"/></svg>"#,
        w = width,
        h = height
    )
    .into_bytes()
}

/// Picture marker symbol JSON with inline PNG data.
pub fn picture_marker_json(width: u32, height: u32, angle: f64) -> String {
    format!(
        r#"{{"type": "esriPMS", "imageData": "{}", "contentType": "image/png", "width": {}, "height": {}, "angle": {}}}"#,
        png_base64(width, height, [0, 128, 0, 255]),
        width,
        height,
        angle
    )
}
