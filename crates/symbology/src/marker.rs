//! Simple marker drawing.
//!
//! Shapes are built centered on the origin from a table keyed by marker
//! style, painted, rotated, measured on a [`MeasureSurface`], then centered in
//! the container and downscaled (never upscaled) to fit the content area.

use quick_xml::escape::escape;
use symbology_common::{MarkerStyle, MarkerSymbol, SymbologyError, SymbologyResult};

use crate::icon::{fmt_num, IconImage, CONTAINER_CENTER, CONTENT_SIZE};
use crate::style::{solid_fill, Stroke};
use crate::surface::{Bounds, MeasureSurface};

/// Primitive a marker style is drawn with.
#[derive(Debug, Clone, PartialEq)]
enum Shape {
    Circle { radius: f64 },
    Square { half: f64 },
    Path { d: String },
}

impl Shape {
    fn for_marker(marker: &MarkerSymbol) -> SymbologyResult<Self> {
        let h = marker.size() / 2.0;
        let n = fmt_num(h);
        let m = fmt_num(-h);

        let shape = match marker.style() {
            MarkerStyle::Circle => Shape::Circle { radius: h },
            MarkerStyle::Square => Shape::Square { half: h },
            MarkerStyle::Cross => Shape::Path {
                d: format!("M {m},0 L {n},0 M 0,{m} L 0,{n}"),
            },
            MarkerStyle::X => Shape::Path {
                d: format!("M {m},{m} L {n},{n} M {n},{m} L {m},{n}"),
            },
            MarkerStyle::Triangle => Shape::Path {
                d: format!("M 0,{m} L {n},{n} L {m},{n} Z"),
            },
            MarkerStyle::Diamond => Shape::Path {
                d: format!("M 0,{m} L {n},0 L 0,{n} L {m},0 Z"),
            },
            MarkerStyle::Path => match marker.path.as_deref() {
                Some(d) if !d.trim().is_empty() => Shape::Path {
                    d: escape(d).into_owned(),
                },
                _ => {
                    return Err(SymbologyError::UnsupportedSymbol(
                        "esriSMSPath marker without path data".to_string(),
                    ))
                }
            },
            MarkerStyle::Unknown(name) => {
                return Err(SymbologyError::UnsupportedSymbol(format!(
                    "unknown esriSMS style {}",
                    name
                )))
            }
        };
        Ok(shape)
    }

    fn element(&self, attrs: &str) -> String {
        match self {
            Shape::Circle { radius } => {
                format!(r#"<circle cx="0" cy="0" r="{}"{}/>"#, fmt_num(*radius), attrs)
            }
            Shape::Square { half } => format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}"{}/>"#,
                fmt_num(-half),
                fmt_num(-half),
                fmt_num(half * 2.0),
                fmt_num(half * 2.0),
                attrs
            ),
            Shape::Path { d } => format!(r#"<path d="{}"{}/>"#, d, attrs),
        }
    }
}

/// Uniform scale that fits a `width` x `height` box inside `limit`, never
/// above 1.
pub fn fit_scale(width: f64, height: f64, limit: f64) -> f64 {
    let largest = width.max(height);
    if largest > limit && largest.is_finite() {
        limit / largest
    } else {
        1.0
    }
}

fn rotated(angle: f64, body: &str) -> String {
    format!(r#"<g transform="rotate({})">{}</g>"#, fmt_num(angle), body)
}

/// Bounds of the rotated shape. The surface lives only for this call.
fn measure(shape: &Shape, angle: f64) -> Option<Bounds> {
    let mut surface = MeasureSurface::acquire();
    let sample = rotated(angle, &shape.element(r#" fill="black""#));
    surface.measure(&sample)
}

/// Draw an `esriSMS` symbol.
pub fn draw_marker(marker: &MarkerSymbol) -> SymbologyResult<IconImage> {
    let shape = Shape::for_marker(marker)?;

    let size = marker.size();
    let angle = marker.angle();
    let bounds = measure(&shape, angle).unwrap_or(Bounds {
        x: -size / 2.0,
        y: -size / 2.0,
        width: size,
        height: size,
    });

    let scale = fit_scale(bounds.width, bounds.height, CONTENT_SIZE);
    let (cx, cy) = bounds.center();

    let paint = format!(
        "{}{}",
        solid_fill(marker.color),
        Stroke::from_outline(marker.outline.as_ref()).attributes()
    );

    let markup = format!(
        r#"<g transform="translate({c} {c}) scale({s}) translate({x} {y})">{body}</g>"#,
        c = fmt_num(CONTAINER_CENTER),
        s = fmt_num(scale),
        x = fmt_num(-cx),
        y = fmt_num(-cy),
        body = rotated(angle, &shape.element(&paint)),
    );

    Ok(IconImage::new(markup))
}
