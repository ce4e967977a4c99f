//! The icon artifact produced for every symbol.
//!
//! An icon is a fixed 32x32 container holding SVG markup and a view box. It is
//! created once and never mutated; branches share it behind an `Arc`.

use std::sync::{Arc, OnceLock};

use serde::Serialize;
use symbology_common::{SymbologyError, SymbologyResult};

/// Side of the square icon container.
pub const CONTAINER_SIZE: f64 = 32.0;

/// Side of the drawable area for vector symbols.
pub const CONTENT_SIZE: f64 = 24.0;

/// Padding around the content area on every side.
pub const CONTENT_PADDING: f64 = (CONTAINER_SIZE - CONTENT_SIZE) / 2.0;

/// Side of the drawable area for picture markers. Pictures carry their own
/// visual border, so they get more room.
pub const PICTURE_CONTENT_SIZE: f64 = 28.0;

/// Center of the container on both axes.
pub const CONTAINER_CENTER: f64 = CONTAINER_SIZE / 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The standard `0 0 32 32` box.
    pub fn container() -> Self {
        Self::new(0.0, 0.0, CONTAINER_SIZE, CONTAINER_SIZE)
    }
}

impl std::fmt::Display for ViewBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            fmt_num(self.x),
            fmt_num(self.y),
            fmt_num(self.width),
            fmt_num(self.height)
        )
    }
}

/// An immutable vector icon.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IconImage {
    width: f64,
    height: f64,
    view_box: ViewBox,
    #[serde(rename = "svg")]
    markup: String,
}

impl IconImage {
    /// Wrap inner SVG markup in the standard container.
    pub fn new(markup: impl Into<String>) -> Self {
        Self::with_view_box(markup, ViewBox::container())
    }

    /// Wrap inner markup drawn in its own coordinate space; the view box maps
    /// it onto the 32x32 container.
    pub fn with_view_box(markup: impl Into<String>, view_box: ViewBox) -> Self {
        Self {
            width: CONTAINER_SIZE,
            height: CONTAINER_SIZE,
            view_box,
            markup: markup.into(),
        }
    }

    /// A container with nothing drawn in it.
    pub fn empty() -> Self {
        Self::new(String::new())
    }

    /// Shared empty icon handed out when no icon was ever attached.
    pub fn shared_empty() -> Arc<IconImage> {
        static EMPTY: OnceLock<Arc<IconImage>> = OnceLock::new();
        EMPTY.get_or_init(|| Arc::new(IconImage::empty())).clone()
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn view_box(&self) -> ViewBox {
        self.view_box
    }

    /// Inner markup, without the enclosing `<svg>` element.
    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn is_empty(&self) -> bool {
        self.markup.is_empty()
    }

    /// Standalone SVG document.
    pub fn to_svg(&self) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{}" height="{}" viewBox="{}">{}</svg>"#,
            fmt_num(self.width),
            fmt_num(self.height),
            self.view_box,
            self.markup
        )
    }

    /// Rasterize to a square PNG of `size` pixels for previews.
    pub fn to_png(&self, size: u32) -> SymbologyResult<Vec<u8>> {
        let svg = self.to_svg();
        let opt = usvg::Options::default();
        let tree = usvg::Tree::from_str(&svg, &opt)
            .map_err(|e| SymbologyError::RenderError(format!("SVG parse failed: {}", e)))?;

        let mut pixmap = tiny_skia::Pixmap::new(size, size).ok_or_else(|| {
            SymbologyError::RenderError(format!("Invalid pixmap size: {}", size))
        })?;

        let scale = size as f32 / self.width as f32;
        resvg::render(
            &tree,
            tiny_skia::Transform::from_scale(scale, scale),
            &mut pixmap.as_mut(),
        );

        pixmap
            .encode_png()
            .map_err(|e| SymbologyError::RenderError(format!("PNG encoding failed: {}", e)))
    }
}

/// Format a coordinate for SVG output: at most three decimals, no trailing
/// zeros.
pub fn fmt_num(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let s = format!("{:.3}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    match s {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}
