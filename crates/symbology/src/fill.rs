//! Area fills and hatch patterns.
//!
//! Hatches are small tiles repeated over the content rectangle. Diagonal
//! tiles carry short corner segments so strokes continue across tile edges
//! without visible seams.

use std::sync::atomic::{AtomicU64, Ordering};

use symbology_common::{Color, FillStyle, FillSymbol, SymbologyError, SymbologyResult};

use crate::icon::{fmt_num, IconImage, CONTENT_PADDING, CONTENT_SIZE};
use crate::style::{pattern_fill, solid_fill, Stroke};

type Segment = (f64, f64, f64, f64);

/// Tile size and stroked segments of a hatch style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hatch {
    pub cell: f64,
    pub segments: &'static [Segment],
}

const HORIZONTAL: &[Segment] = &[(0.0, 2.5, 5.0, 2.5)];
const VERTICAL: &[Segment] = &[(2.5, 0.0, 2.5, 5.0)];
const FORWARD_DIAGONAL: &[Segment] = &[
    (0.0, 5.0, 5.0, 0.0),
    (-1.0, 1.0, 1.0, -1.0),
    (4.0, 6.0, 6.0, 4.0),
];
const BACKWARD_DIAGONAL: &[Segment] = &[
    (0.0, 0.0, 5.0, 5.0),
    (4.0, -1.0, 6.0, 1.0),
    (-1.0, 4.0, 1.0, 6.0),
];
const CROSS: &[Segment] = &[(0.0, 2.5, 5.0, 2.5), (2.5, 0.0, 2.5, 5.0)];
const DIAGONAL_CROSS: &[Segment] = &[(0.0, 0.0, 7.0, 7.0), (7.0, 0.0, 0.0, 7.0)];

/// Hatch tile for a fill style, `None` for solid/null/unknown styles.
pub fn hatch(style: &FillStyle) -> Option<Hatch> {
    let (cell, segments) = match style {
        FillStyle::Horizontal => (5.0, HORIZONTAL),
        FillStyle::Vertical => (5.0, VERTICAL),
        FillStyle::ForwardDiagonal => (5.0, FORWARD_DIAGONAL),
        FillStyle::BackwardDiagonal => (5.0, BACKWARD_DIAGONAL),
        FillStyle::Cross => (5.0, CROSS),
        FillStyle::DiagonalCross => (7.0, DIAGONAL_CROSS),
        FillStyle::Solid | FillStyle::Null | FillStyle::Unknown(_) => return None,
    };
    Some(Hatch { cell, segments })
}

impl Hatch {
    /// `<pattern>` definition stroked in `color`.
    pub fn definition(&self, id: &str, color: Color) -> String {
        let lines: String = self
            .segments
            .iter()
            .map(|(x1, y1, x2, y2)| {
                format!(
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}"/>"#,
                    fmt_num(*x1),
                    fmt_num(*y1),
                    fmt_num(*x2),
                    fmt_num(*y2)
                )
            })
            .collect();

        format!(
            r#"<pattern id="{id}" patternUnits="userSpaceOnUse" width="{cell}" height="{cell}"><g stroke="{color}" stroke-opacity="{opacity}" stroke-width="1">{lines}</g></pattern>"#,
            id = id,
            cell = fmt_num(self.cell),
            color = color.to_hex(),
            opacity = fmt_num(color.opacity()),
            lines = lines,
        )
    }
}

/// Process-unique id for pattern definitions, so icons can be inlined side by
/// side in one document.
pub fn next_pattern_id() -> String {
    static NEXT: AtomicU64 = AtomicU64::new(1);
    format!("symbology-pattern-{}", NEXT.fetch_add(1, Ordering::Relaxed))
}

/// The content rectangle painted with `attrs`.
pub fn content_rect(attrs: &str) -> String {
    format!(
        r#"<rect x="{p}" y="{p}" width="{s}" height="{s}"{attrs}/>"#,
        p = fmt_num(CONTENT_PADDING),
        s = fmt_num(CONTENT_SIZE),
        attrs = attrs,
    )
}

/// Draw an `esriSFS` symbol.
pub fn draw_fill(fill: &FillSymbol) -> SymbologyResult<IconImage> {
    let stroke = Stroke::from_outline(fill.outline.as_ref()).attributes();

    let markup = match fill.style() {
        FillStyle::Solid => content_rect(&format!("{}{}", solid_fill(fill.color), stroke)),
        FillStyle::Null => content_rect(&format!("{}{}", solid_fill(None), stroke)),
        FillStyle::Unknown(name) => {
            return Err(SymbologyError::UnsupportedSymbol(format!(
                "unknown esriSFS style {}",
                name
            )))
        }
        style => {
            // hatch() covers every remaining style
            let hatch = hatch(&style).ok_or_else(|| {
                SymbologyError::InternalError(format!("no hatch for {:?}", style))
            })?;
            let id = next_pattern_id();
            format!(
                "<defs>{}</defs>{}",
                hatch.definition(&id, fill.color.unwrap_or(Color::BLACK)),
                content_rect(&format!("{}{}", pattern_fill(&id), stroke))
            )
        }
    };

    Ok(IconImage::new(markup))
}
