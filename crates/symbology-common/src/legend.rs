//! Legend payloads returned by a map service's `legend?f=json` endpoint.

use serde::{Deserialize, Serialize};

use crate::{SymbologyError, SymbologyResult};

/// Top-level legend response. A failed request carries `error` instead of
/// `layers`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerLegendResponse {
    #[serde(default)]
    pub layers: Vec<ServerLayerLegend>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ServiceErrorBody>,
}

impl ServerLegendResponse {
    /// Turn an embedded server error into a [`SymbologyError::ServiceError`].
    pub fn into_result(self) -> SymbologyResult<Self> {
        match self.error {
            Some(err) => Err(SymbologyError::ServiceError {
                code: err.code,
                message: err.message,
            }),
            None => Ok(self),
        }
    }

    /// Legend items for one sub-layer, or every sub-layer's items in order
    /// when `layer_index` is `None`.
    pub fn items(&self, layer_index: Option<u32>) -> Vec<&ServerLegendItem> {
        self.layers
            .iter()
            .filter(|layer| layer_index.map_or(true, |idx| layer.layer_id == idx))
            .flat_map(|layer| layer.legend.iter())
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerLayerLegend {
    pub layer_id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_name: Option<String>,
    #[serde(default)]
    pub legend: Vec<ServerLegendItem>,
}

/// One legend swatch as rendered by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerLegendItem {
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceErrorBody {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub details: Vec<String>,
}
