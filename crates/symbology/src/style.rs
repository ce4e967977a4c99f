//! Stroke and fill attribute resolution.
//!
//! Translates symbol outline/line definitions into SVG presentation
//! attributes, applying the stroke defaults field by field.

use symbology_common::{Color, LineCap, LineJoin, LineStyle, LineSymbol, Outline};

use crate::icon::fmt_num;

/// Concrete dash array for a line style. `None` means a solid line.
///
/// Unknown styles degrade to no dash.
pub fn dash_array(style: &LineStyle) -> Option<&'static str> {
    match style {
        LineStyle::Solid | LineStyle::Null | LineStyle::Unknown(_) => None,
        LineStyle::Dash => Some("5.333,4"),
        LineStyle::DashDot => Some("5.333,4,1.333,4"),
        LineStyle::DashDotDot => Some("5.333,4,1.333,4,1.333,4"),
        LineStyle::Dot => Some("1.333,4"),
        LineStyle::LongDash => Some("10.666,4"),
        LineStyle::LongDashDot => Some("10.666,4,1.333,4"),
        LineStyle::LongDashDotDot => Some("10.666,4,1.333,4,1.333,4"),
        LineStyle::ShortDash => Some("5.333,1.333"),
        LineStyle::ShortDashDot => Some("5.333,1.333,1.333,1.333"),
        LineStyle::ShortDashDotDot => Some("5.333,1.333,1.333,1.333,1.333,1.333"),
        LineStyle::ShortDot => Some("1.333,1.333"),
    }
}

/// Resolved stroke attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
    pub cap: &'static str,
    pub join: &'static str,
    pub miter_limit: f64,
    pub dash: Option<&'static str>,
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 1.0,
            cap: "square",
            join: "miter",
            miter_limit: 4.0,
            dash: None,
        }
    }
}

impl Stroke {
    /// Defaults overridden by whatever the line declares.
    pub fn from_line(line: &LineSymbol) -> Self {
        let mut stroke = Stroke::default();

        if let Some(color) = line.color {
            stroke.color = color;
        }
        if let Some(width) = line.width() {
            stroke.width = width;
        }
        // Unknown caps and joins keep the default
        match line.cap {
            Some(LineCap::Butt) => stroke.cap = "butt",
            Some(LineCap::Round) => stroke.cap = "round",
            Some(LineCap::Square) => stroke.cap = "square",
            Some(LineCap::Unknown(_)) | None => {}
        }
        match line.join {
            Some(LineJoin::Miter) => stroke.join = "miter",
            Some(LineJoin::Round) => stroke.join = "round",
            Some(LineJoin::Bevel) => stroke.join = "bevel",
            Some(LineJoin::Unknown(_)) | None => {}
        }
        if let Some(limit) = line.miter_limit() {
            stroke.miter_limit = limit;
        }

        let style = line.style();
        stroke.dash = dash_array(&style);
        if style == LineStyle::Null {
            stroke.color = Color::TRANSPARENT;
        }

        stroke
    }

    /// Stroke for a marker or fill outline. A missing outline is invisible.
    pub fn from_outline(outline: Option<&Outline>) -> Self {
        match outline {
            Some(outline) => Self::from_line(&outline.line),
            None => Stroke {
                color: Color::TRANSPARENT,
                width: 0.0,
                ..Stroke::default()
            },
        }
    }

    /// SVG presentation attributes, with a leading space.
    pub fn attributes(&self) -> String {
        let mut attrs = format!(
            r#" stroke="{}" stroke-opacity="{}" stroke-width="{}" stroke-linecap="{}" stroke-linejoin="{}" stroke-miterlimit="{}""#,
            self.color.to_hex(),
            fmt_num(self.color.opacity()),
            fmt_num(self.width),
            self.cap,
            self.join,
            fmt_num(self.miter_limit),
        );
        if let Some(dash) = self.dash {
            attrs.push_str(&format!(r#" stroke-dasharray="{}""#, dash));
        }
        attrs
    }
}

/// Fill attributes for a flat color, with a leading space. A missing color
/// is transparent.
pub fn solid_fill(color: Option<Color>) -> String {
    let color = color.unwrap_or(Color::TRANSPARENT);
    format!(
        r#" fill="{}" fill-opacity="{}""#,
        color.to_hex(),
        fmt_num(color.opacity())
    )
}

/// Fill attribute referencing a pattern definition, with a leading space.
pub fn pattern_fill(pattern_id: &str) -> String {
    format!(r#" fill="url(#{})""#, pattern_id)
}
