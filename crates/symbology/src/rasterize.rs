//! Symbol rasterization entry point.

use std::sync::Arc;

use symbology_common::{LineSymbol, Symbol, SymbologyError, SymbologyResult};
use tracing::{debug, warn};

use crate::fetch::{ImageLoader, OfflineLoader};
use crate::fill::draw_fill;
use crate::icon::{fmt_num, IconImage, CONTENT_PADDING, CONTENT_SIZE};
use crate::marker::draw_marker;
use crate::picture::{draw_picture_fill, draw_picture_marker};
use crate::style::Stroke;

/// Turns symbol descriptions into icons.
///
/// Only picture symbols suspend; everything else is drawn synchronously.
#[derive(Clone)]
pub struct Rasterizer {
    loader: Arc<dyn ImageLoader>,
}

impl Rasterizer {
    pub fn new(loader: Arc<dyn ImageLoader>) -> Self {
        Self { loader }
    }

    /// A rasterizer that can only draw inline images.
    pub fn offline() -> Self {
        Self::new(Arc::new(OfflineLoader))
    }

    pub fn loader(&self) -> &dyn ImageLoader {
        self.loader.as_ref()
    }

    /// Draw `symbol` into a 32x32 icon.
    ///
    /// Text and unsupported symbols yield an empty icon. Image fetch and
    /// decode failures are returned as errors.
    pub async fn rasterize(&self, symbol: &Symbol) -> SymbologyResult<IconImage> {
        match symbol {
            Symbol::PictureMarker(picture) => {
                draw_picture_marker(picture, self.loader.as_ref()).await
            }
            Symbol::PictureFill(picture) => draw_picture_fill(picture, self.loader.as_ref()).await,
            vector => draw_vector(vector),
        }
    }

    /// Like [`rasterize`](Self::rasterize), but unsupported types and
    /// unreachable images yield the empty icon. Malformed input and internal
    /// failures are still returned.
    pub async fn rasterize_or_blank(&self, symbol: &Symbol) -> SymbologyResult<IconImage> {
        match self.rasterize(symbol).await {
            Ok(icon) => Ok(icon),
            Err(e) if e.degrades_to_blank() => {
                warn!(
                    symbol_type = symbol.type_name(),
                    error = %e,
                    "Symbol rasterization failed, using empty icon"
                );
                Ok(IconImage::empty())
            }
            Err(e) => Err(e),
        }
    }
}

impl std::fmt::Debug for Rasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rasterizer").finish_non_exhaustive()
    }
}

/// Draw a symbol that needs no image bytes, without suspending.
pub fn draw_vector(symbol: &Symbol) -> SymbologyResult<IconImage> {
    match symbol {
        Symbol::SimpleMarker(marker) => draw_marker(marker),
        Symbol::SimpleLine(line) | Symbol::CartographicLine(line) => Ok(draw_line(line)),
        Symbol::SimpleFill(fill) => draw_fill(fill),
        Symbol::Text(_) | Symbol::Unsupported(_) => {
            warn!(
                symbol_type = symbol.type_name(),
                "Symbol type is not drawn, using empty icon"
            );
            Ok(IconImage::empty())
        }
        Symbol::PictureMarker(_) | Symbol::PictureFill(_) => Err(SymbologyError::InternalError(
            format!("{} symbol needs image bytes", symbol.type_name()),
        )),
    }
}

/// Lines are a single stroke from the bottom-left to the top-right corner of
/// the content area.
pub fn draw_line(line: &LineSymbol) -> IconImage {
    let start = CONTENT_PADDING;
    let end = CONTENT_PADDING + CONTENT_SIZE;
    let stroke = Stroke::from_line(line);
    debug!(width = stroke.width, dash = ?stroke.dash, "Drawing line symbol");

    IconImage::new(format!(
        r#"<path d="M {a},{b} L {b},{a}" fill="none"{stroke}/>"#,
        a = fmt_num(start),
        b = fmt_num(end),
        stroke = stroke.attributes(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use symbology_common::{to_number, Color, LineStyle, PictureMarkerSymbol, TextSymbol};

    #[test]
    fn test_draw_line_diagonal() {
        let line = LineSymbol {
            style: Some(LineStyle::Dash),
            color: Some(Color::rgba(0, 0, 255, 255)),
            width: to_number(2.0),
            ..LineSymbol::default()
        };
        let icon = draw_line(&line);
        assert!(icon.markup().starts_with(r#"<path d="M 4,28 L 28,4" fill="none""#));
        assert!(icon.markup().contains(r#"stroke-dasharray="5.333,4""#));
        assert!(icon.markup().contains(r#"stroke-width="2""#));
    }

    #[tokio::test]
    async fn test_text_symbol_is_blank() {
        let rasterizer = Rasterizer::offline();
        let icon = rasterizer
            .rasterize(&Symbol::Text(TextSymbol::default()))
            .await
            .unwrap();
        assert!(icon.is_empty());
    }

    #[tokio::test]
    async fn test_unsupported_symbol_is_blank() {
        let icon = Rasterizer::offline()
            .rasterize(&Symbol::Unsupported(json!({"type": "esriXYZ"})))
            .await
            .unwrap();
        assert!(icon.is_empty());
    }

    #[test]
    fn test_draw_vector_matches_rasterize_for_vector_symbols() {
        let symbol: Symbol =
            serde_json::from_value(json!({"type": "esriSMS", "style": "esriSMSSquare", "size": 10}))
                .unwrap();
        assert!(!symbol.needs_image());
        assert!(!draw_vector(&symbol).unwrap().is_empty());
    }

    #[test]
    fn test_draw_vector_refuses_picture_symbols() {
        let symbol = Symbol::PictureMarker(PictureMarkerSymbol::default());
        assert!(symbol.needs_image());
        assert!(matches!(
            draw_vector(&symbol),
            Err(SymbologyError::InternalError(_))
        ));
    }

    #[tokio::test]
    async fn test_rasterize_or_blank_surfaces_malformed_picture() {
        let symbol: Symbol = serde_json::from_value(json!({"type": "esriPMS"})).unwrap();
        let result = Rasterizer::offline().rasterize_or_blank(&symbol).await;
        assert!(matches!(result, Err(SymbologyError::MalformedInput(_))));
    }
}
