//! Symbol descriptions in the ArcGIS server JSON schema.
//!
//! Each symbol is tagged by its `type` field (`esriSMS`, `esriSLS`, ...).
//! Unknown `type` values deserialize to [`Symbol::Unsupported`] holding the
//! raw JSON, and unknown style names to the `Unknown` variant of their enum,
//! so one odd symbol never fails a whole renderer document.
//!
//! Symbols re-serialize to the JSON they were parsed from: absent numbers
//! stay absent, integers stay integers and keys the model does not know are
//! kept in `extra`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};

use crate::wire::{
    from_object, impl_wire_object, number, serialize_tagged, tagged_object, wire_enum,
};
use crate::Color;

/// An abstract symbol description.
#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    /// `esriSMS`
    SimpleMarker(MarkerSymbol),
    /// `esriSLS`
    SimpleLine(LineSymbol),
    /// `esriCLS`
    CartographicLine(LineSymbol),
    /// `esriSFS`
    SimpleFill(FillSymbol),
    /// `esriPFS`
    PictureFill(PictureFillSymbol),
    /// `esriPMS`
    PictureMarker(PictureMarkerSymbol),
    /// `esriTS`
    Text(TextSymbol),
    /// Any `type` this crate does not know how to draw, kept as received.
    Unsupported(Value),
}

impl Symbol {
    /// Wire name of the symbol type, for logging.
    pub fn type_name(&self) -> &'static str {
        match self {
            Symbol::SimpleMarker(_) => "esriSMS",
            Symbol::SimpleLine(_) => "esriSLS",
            Symbol::CartographicLine(_) => "esriCLS",
            Symbol::SimpleFill(_) => "esriSFS",
            Symbol::PictureFill(_) => "esriPFS",
            Symbol::PictureMarker(_) => "esriPMS",
            Symbol::Text(_) => "esriTS",
            Symbol::Unsupported(_) => "unsupported",
        }
    }

    /// Whether drawing this symbol may need to fetch or decode image bytes.
    pub fn needs_image(&self) -> bool {
        matches!(self, Symbol::PictureFill(_) | Symbol::PictureMarker(_))
    }
}

impl Serialize for Symbol {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Symbol::SimpleMarker(s) => serialize_tagged(serializer, "esriSMS", s),
            Symbol::SimpleLine(s) => serialize_tagged(serializer, "esriSLS", s),
            Symbol::CartographicLine(s) => serialize_tagged(serializer, "esriCLS", s),
            Symbol::SimpleFill(s) => serialize_tagged(serializer, "esriSFS", s),
            Symbol::PictureFill(s) => serialize_tagged(serializer, "esriPFS", s),
            Symbol::PictureMarker(s) => serialize_tagged(serializer, "esriPMS", s),
            Symbol::Text(s) => serialize_tagged(serializer, "esriTS", s),
            Symbol::Unsupported(raw) => raw.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Symbol {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let (tag, object) = tagged_object::<D::Error>(value)?;
        let symbol = match tag.as_deref() {
            None => return Err(serde::de::Error::missing_field("type")),
            Some("esriSMS") => Symbol::SimpleMarker(from_object::<_, D::Error>(object)?),
            Some("esriSLS") => Symbol::SimpleLine(from_object::<_, D::Error>(object)?),
            Some("esriCLS") => Symbol::CartographicLine(from_object::<_, D::Error>(object)?),
            Some("esriSFS") => Symbol::SimpleFill(from_object::<_, D::Error>(object)?),
            Some("esriPFS") => Symbol::PictureFill(from_object::<_, D::Error>(object)?),
            Some("esriPMS") => Symbol::PictureMarker(from_object::<_, D::Error>(object)?),
            Some("esriTS") => Symbol::Text(from_object::<_, D::Error>(object)?),
            Some(_) => Symbol::Unsupported(Value::Object(object)),
        };
        Ok(symbol)
    }
}

/// Simple marker (`esriSMS`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerSymbol {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<MarkerStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xoffset: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yoffset: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline: Option<Outline>,
    /// SVG path data, only meaningful for `esriSMSPath`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MarkerSymbol {
    pub fn style(&self) -> MarkerStyle {
        self.style.clone().unwrap_or_default()
    }

    /// Marker size in points, 8 when unset.
    pub fn size(&self) -> f64 {
        number(&self.size).unwrap_or(8.0)
    }

    /// Rotation in degrees, counter-clockwise.
    pub fn angle(&self) -> f64 {
        number(&self.angle).unwrap_or(0.0)
    }

    pub fn xoffset(&self) -> f64 {
        number(&self.xoffset).unwrap_or(0.0)
    }

    pub fn yoffset(&self) -> f64 {
        number(&self.yoffset).unwrap_or(0.0)
    }
}

wire_enum! {
    MarkerStyle {
        Circle => "esriSMSCircle",
        Cross => "esriSMSCross",
        X => "esriSMSX",
        Triangle => "esriSMSTriangle",
        Diamond => "esriSMSDiamond",
        Square => "esriSMSSquare",
        Path => "esriSMSPath",
    }
}

impl Default for MarkerStyle {
    fn default() -> Self {
        MarkerStyle::Circle
    }
}

/// Simple (`esriSLS`) or cartographic (`esriCLS`) line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineSymbol {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<LineStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap: Option<LineCap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join: Option<LineJoin>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub miter_limit: Option<Number>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LineSymbol {
    pub fn style(&self) -> LineStyle {
        self.style.clone().unwrap_or_default()
    }

    pub fn width(&self) -> Option<f64> {
        number(&self.width)
    }

    pub fn miter_limit(&self) -> Option<f64> {
        number(&self.miter_limit)
    }
}

/// Outline of a marker or fill. On the wire it is a nested line symbol that
/// usually repeats its own `type`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(flatten)]
    pub line: LineSymbol,
}

wire_enum! {
    LineStyle {
        Solid => "esriSLSSolid",
        Dash => "esriSLSDash",
        DashDot => "esriSLSDashDot",
        DashDotDot => "esriSLSDashDotDot",
        Dot => "esriSLSDot",
        LongDash => "esriSLSLongDash",
        LongDashDot => "esriSLSLongDashDot",
        LongDashDotDot => "esriSLSLongDashDotDot",
        ShortDash => "esriSLSShortDash",
        ShortDashDot => "esriSLSShortDashDot",
        ShortDashDotDot => "esriSLSShortDashDotDot",
        ShortDot => "esriSLSShortDot",
        Null => "esriSLSNull",
    }
}

impl Default for LineStyle {
    fn default() -> Self {
        LineStyle::Solid
    }
}

wire_enum! {
    LineCap {
        Butt => "esriLCSButt",
        Round => "esriLCSRound",
        Square => "esriLCSSquare",
    }
}

wire_enum! {
    LineJoin {
        Miter => "esriLJSMiter",
        Round => "esriLJSRound",
        Bevel => "esriLJSBevel",
    }
}

/// Simple fill (`esriSFS`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FillSymbol {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<FillStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline: Option<Outline>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FillSymbol {
    pub fn style(&self) -> FillStyle {
        self.style.clone().unwrap_or_default()
    }
}

wire_enum! {
    FillStyle {
        Solid => "esriSFSSolid",
        Null => "esriSFSNull",
        Horizontal => "esriSFSHorizontal",
        Vertical => "esriSFSVertical",
        ForwardDiagonal => "esriSFSForwardDiagonal",
        BackwardDiagonal => "esriSFSBackwardDiagonal",
        Cross => "esriSFSCross",
        DiagonalCross => "esriSFSDiagonalCross",
    }
}

impl Default for FillStyle {
    fn default() -> Self {
        FillStyle::Solid
    }
}

/// Where the bytes of a picture symbol come from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Base64 encoded image bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl ImageReference {
    /// Inline bytes.
    pub fn inline(image_data: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            url: None,
            image_data: Some(image_data.into()),
            content_type: Some(content_type.into()),
        }
    }

    pub fn has_source(&self) -> bool {
        self.image_data.as_deref().is_some_and(|d| !d.is_empty())
            || self.url.as_deref().is_some_and(|u| !u.is_empty())
    }
}

/// Picture marker (`esriPMS`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PictureMarkerSymbol {
    #[serde(flatten)]
    pub image: ImageReference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xoffset: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yoffset: Option<Number>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PictureMarkerSymbol {
    pub fn width(&self) -> Option<f64> {
        number(&self.width)
    }

    pub fn height(&self) -> Option<f64> {
        number(&self.height)
    }

    pub fn angle(&self) -> f64 {
        number(&self.angle).unwrap_or(0.0)
    }

    pub fn xoffset(&self) -> f64 {
        number(&self.xoffset).unwrap_or(0.0)
    }

    pub fn yoffset(&self) -> f64 {
        number(&self.yoffset).unwrap_or(0.0)
    }
}

/// Picture fill (`esriPFS`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PictureFillSymbol {
    #[serde(flatten)]
    pub image: ImageReference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xscale: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yscale: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline: Option<Outline>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PictureFillSymbol {
    pub fn width(&self) -> Option<f64> {
        number(&self.width)
    }

    pub fn height(&self) -> Option<f64> {
        number(&self.height)
    }

    pub fn xscale(&self) -> f64 {
        number(&self.xscale).unwrap_or(1.0)
    }

    pub fn yscale(&self) -> f64 {
        number(&self.yscale).unwrap_or(1.0)
    }
}

/// Text symbol (`esriTS`). Parsed so documents load, never drawn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextSymbol {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl_wire_object!(
    MarkerSymbol,
    LineSymbol,
    FillSymbol,
    PictureMarkerSymbol,
    PictureFillSymbol,
    TextSymbol
);
