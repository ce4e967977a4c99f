//! Common test fixtures for symbology tests.
//!
//! Renderer and legend documents in the server JSON format, covering the
//! shapes that show up in real map services.

/// Renderer definitions.
pub mod renderers {
    /// Simple renderer with a red circle marker.
    pub const SIMPLE_MARKER: &str = r#"{
        "type": "simple",
        "label": "Hydrants",
        "symbol": {
            "type": "esriSMS",
            "style": "esriSMSCircle",
            "color": [255, 0, 0, 255],
            "size": 10,
            "outline": {"type": "esriSLS", "style": "esriSLSSolid", "color": [0, 0, 0, 255], "width": 1}
        }
    }"#;

    /// Unique value renderer keyed on two fields, with a default.
    pub const UNIQUE_VALUE_TWO_FIELDS: &str = r#"{
        "type": "uniqueValue",
        "field1": "CLASS",
        "field2": "SURFACE",
        "defaultSymbol": {"type": "esriSLS", "style": "esriSLSDot", "color": [128, 128, 128, 255], "width": 1},
        "defaultLabel": "Other roads",
        "uniqueValueInfos": [
            {"value": "Highway, Paved", "label": "Paved highway", "symbol": {"type": "esriSLS", "style": "esriSLSSolid", "color": [200, 0, 0, 255], "width": 3}},
            {"value": "Local, Paved", "label": "Paved local", "symbol": {"type": "esriSLS", "style": "esriSLSSolid", "color": [0, 0, 0, 255], "width": 1}},
            {"value": ", Gravel", "label": "Unclassified gravel", "symbol": {"type": "esriSLS", "style": "esriSLSDash", "color": [120, 80, 0, 255], "width": 1}}
        ]
    }"#;

    /// Unique value renderer keyed on three fields, no default.
    pub const UNIQUE_VALUE_THREE_FIELDS: &str = r#"{
        "type": "uniqueValue",
        "field1": "A",
        "field2": "B",
        "field3": "C",
        "uniqueValueInfos": [
            {"value": "1, 2, 3", "label": "one-two-three", "symbol": {"type": "esriSFS", "style": "esriSFSSolid", "color": [0, 0, 255, 255]}}
        ]
    }"#;

    /// Class breaks renderer on population with three classes and a default.
    pub const CLASS_BREAKS: &str = r#"{
        "type": "classBreaks",
        "field": "POP",
        "minValue": 0,
        "defaultSymbol": {"type": "esriSFS", "style": "esriSFSNull", "outline": {"type": "esriSLS", "style": "esriSLSSolid", "color": [0, 0, 0, 255], "width": 1}},
        "defaultLabel": "No data",
        "classBreakInfos": [
            {"classMaxValue": 1000, "label": "0 - 1000", "symbol": {"type": "esriSFS", "style": "esriSFSSolid", "color": [255, 255, 178, 255]}},
            {"classMaxValue": 10000, "label": "1000 - 10000", "symbol": {"type": "esriSFS", "style": "esriSFSForwardDiagonal", "color": [254, 204, 92, 255]}},
            {"classMaxValue": 100000, "label": "10000 - 100000", "symbol": {"type": "esriSFS", "style": "esriSFSDiagonalCross", "color": [240, 59, 32, 255]}}
        ]
    }"#;

    /// A renderer kind outside the supported set.
    pub const HEATMAP: &str = r#"{
        "type": "heatmap",
        "blurRadius": 10,
        "colorStops": [{"ratio": 0, "color": [0, 0, 0, 0]}]
    }"#;

    /// Simple renderer whose symbol is a text symbol.
    pub const SIMPLE_TEXT: &str = r#"{
        "type": "simple",
        "label": "Names",
        "symbol": {"type": "esriTS", "text": "abc", "color": [0, 0, 0, 255]}
    }"#;
}

/// Server `legend?f=json` payloads.
pub mod server_legends {
    /// Two sub-layers with relative image URLs and no inline data.
    pub const TWO_LAYERS_URLS: &str = r#"{
        "layers": [
            {"layerId": 0, "layerName": "Wells", "legend": [
                {"label": "Active", "url": "a1b2", "contentType": "image/png", "width": 20, "height": 20},
                {"label": "Capped", "url": "c3d4", "contentType": "image/png", "width": 20, "height": 20}
            ]},
            {"layerId": 2, "layerName": "Pipes", "legend": [
                {"label": "Main", "url": "e5f6", "contentType": "image/png", "width": 20, "height": 20}
            ]}
        ]
    }"#;

    /// Service error body in place of layers.
    pub const ERROR: &str = r#"{
        "error": {"code": 498, "message": "Invalid token.", "details": []}
    }"#;
}

/// Level-of-detail scale lists, index 0 most zoomed out.
pub mod lods {
    /// Four descending scales.
    pub const FOUR_LEVELS: [f64; 4] = [1000.0, 500.0, 250.0, 100.0];

    /// Five descending scales.
    pub const FIVE_LEVELS: [f64; 5] = [16000.0, 8000.0, 4000.0, 2000.0, 1000.0];
}

/// Feature attribute documents.
pub mod features {
    use serde_json::{json, Value};

    /// A road feature matching the `Paved highway` branch.
    pub fn paved_highway() -> Value {
        json!({"OBJECTID": 1, "CLASS": "Highway", "SURFACE": "Paved"})
    }

    /// A feature with a null first key field.
    pub fn null_class_gravel() -> Value {
        json!({"OBJECTID": 2, "CLASS": null, "SURFACE": "Gravel"})
    }

    /// A feature with a population value.
    pub fn with_population(pop: f64) -> Value {
        json!({"OBJECTID": 3, "POP": pop})
    }
}
