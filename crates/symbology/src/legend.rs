//! Legends: building them from renderers and adapting server-drawn legends.
//!
//! A server legend (for services with no usable renderer) is turned into a
//! synthetic unique-value renderer whose branches are picture markers, so it
//! goes through the same renderer-to-legend path as real renderers.

use std::sync::Arc;

use futures::future::{ready, try_join_all};
use serde::Serialize;
use symbology_common::{
    to_number, ImageReference, PictureMarkerSymbol, Renderer, ServerLegendItem,
    ServerLegendResponse, Symbol, SymbologyResult, TextSymbol, UniqueValueInfo,
    UniqueValueRenderer,
};
use tracing::{debug, info, instrument, warn};

use crate::enhance::PendingLegendEntry;
use crate::fetch::LegendSource;
use crate::icon::IconImage;
use crate::rasterize::{draw_vector, Rasterizer};

/// One legend swatch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub icon: Arc<IconImage>,
}

impl LegendEntry {
    pub fn new(label: impl Into<String>, icon: IconImage) -> Self {
        Self {
            label: label.into(),
            icon: Arc::new(icon),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerLegend {
    pub layer_id: u32,
    pub legend: Vec<LegendEntry>,
}

/// Legend in the `{layers: [{layerId, legend}]}` shape viewers consume.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LegendResponse {
    pub layers: Vec<LayerLegend>,
}

impl LegendResponse {
    pub fn single(layer_id: u32, legend: Vec<LegendEntry>) -> Self {
        Self {
            layers: vec![LayerLegend { layer_id, legend }],
        }
    }

    pub fn to_json(&self) -> SymbologyResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Labels and symbols in legend order: branches first, the default last.
///
/// A default symbol without a default label is listed under the empty label.
pub fn legend_symbols(renderer: &Renderer) -> Vec<(&str, &Symbol)> {
    match renderer {
        Renderer::Simple(simple) => vec![(simple.label(), &simple.symbol)],
        Renderer::UniqueValue(uv) => uv
            .infos()
            .iter()
            .map(|info| (info.label(), &info.symbol))
            .chain(
                uv.default_symbol
                    .as_ref()
                    .map(|s| (uv.default_label.as_deref().unwrap_or(""), s)),
            )
            .collect(),
        Renderer::ClassBreaks(cb) => cb
            .infos()
            .iter()
            .map(|info| (info.label(), &info.symbol))
            .chain(
                cb.default_symbol
                    .as_ref()
                    .map(|s| (cb.default_label.as_deref().unwrap_or(""), s)),
            )
            .collect(),
        Renderer::Unsupported(_) => {
            warn!("No legend for unsupported renderer type");
            Vec::new()
        }
    }
}

/// Rasterize every legend symbol concurrently. Entries keep legend order.
///
/// Icons that fail on an unsupported type or an unreachable image come back
/// blank; malformed symbols fail the legend.
pub async fn build_legend_from_renderer(
    rasterizer: &Rasterizer,
    renderer: &Renderer,
) -> SymbologyResult<Vec<LegendEntry>> {
    let symbols = legend_symbols(renderer);
    let icons = try_join_all(
        symbols
            .iter()
            .map(|(_, symbol)| rasterizer.rasterize_or_blank(symbol)),
    )
    .await?;

    Ok(symbols
        .into_iter()
        .zip(icons)
        .map(|((label, _), icon)| LegendEntry::new(label, icon))
        .collect())
}

/// Legend icons still to be drawn, for the async enhancer. Failures are left
/// to the enhancer's join policy.
///
/// Vector symbols are drawn right away; only picture symbols are deferred.
pub fn pending_legend(rasterizer: &Rasterizer, renderer: &Renderer) -> Vec<PendingLegendEntry> {
    legend_symbols(renderer)
        .into_iter()
        .map(|(label, symbol)| {
            if !symbol.needs_image() {
                return PendingLegendEntry::new(label, ready(draw_vector(symbol)));
            }
            let rasterizer = rasterizer.clone();
            let symbol = symbol.clone();
            PendingLegendEntry::new(label, async move { rasterizer.rasterize(&symbol).await })
        })
        .collect()
}

/// Legend for one layer drawn from its renderer.
pub async fn renderer_to_legend(
    rasterizer: &Rasterizer,
    renderer: &Renderer,
    layer_index: u32,
) -> SymbologyResult<LegendResponse> {
    let legend = build_legend_from_renderer(rasterizer, renderer).await?;
    debug!(
        layer = layer_index,
        renderer = renderer.type_name(),
        entries = legend.len(),
        "Built legend from renderer"
    );
    Ok(LegendResponse::single(layer_index, legend))
}

/// Branch symbol for one server legend item. Items without an image are
/// kept as label-only text entries.
fn server_item_symbol(item: &ServerLegendItem) -> Symbol {
    let image = ImageReference {
        url: item.url.clone(),
        image_data: item.image_data.clone(),
        content_type: item.content_type.clone(),
    };
    if !image.has_source() {
        debug!(label = %item.label, "Server legend item has no image");
        return Symbol::Text(TextSymbol {
            text: Some(item.label.clone()),
            ..TextSymbol::default()
        });
    }

    Symbol::PictureMarker(PictureMarkerSymbol {
        image,
        width: item.width.and_then(to_number),
        height: item.height.and_then(to_number),
        ..PictureMarkerSymbol::default()
    })
}

/// Unique-value renderer whose branches show the server's legend images.
///
/// Branch values equal their labels. With `layer_index` of `None` every
/// sub-layer's items are merged in order.
pub fn server_legend_to_fake_renderer(
    server: &ServerLegendResponse,
    layer_index: Option<u32>,
) -> Renderer {
    let unique_value_infos = server
        .items(layer_index)
        .into_iter()
        .map(|item| {
            let label = item.label.as_str();
            UniqueValueInfo::new(label, label, server_item_symbol(item))
        })
        .collect();

    Renderer::UniqueValue(UniqueValueRenderer {
        unique_value_infos: Some(unique_value_infos),
        ..UniqueValueRenderer::default()
    })
}

/// Legend item image URLs are relative to `{service}/{layerId}/images/`.
fn absolutize_image_urls(server: &mut ServerLegendResponse, service_url: &str) {
    let base = service_url.trim_end_matches('/');
    for layer in &mut server.layers {
        for item in &mut layer.legend {
            if let Some(url) = item.url.as_mut() {
                let relative = !url.is_empty()
                    && !url.starts_with("http://")
                    && !url.starts_with("https://")
                    && !url.starts_with("data:");
                if relative {
                    *url = format!("{}/{}/images/{}", base, layer.layer_id, url);
                }
            }
        }
    }
}

/// Fetch a service's legend and rebuild it with local icons.
#[instrument(skip(source, rasterizer))]
pub async fn map_server_to_local_legend(
    source: &dyn LegendSource,
    rasterizer: &Rasterizer,
    service_url: &str,
    layer_index: Option<u32>,
) -> SymbologyResult<LegendResponse> {
    let mut server = source.fetch_legend(service_url).await?.into_result()?;
    absolutize_image_urls(&mut server, service_url);

    let renderer = server_legend_to_fake_renderer(&server, layer_index);
    let legend = renderer_to_legend(rasterizer, &renderer, layer_index.unwrap_or(0)).await?;

    info!(
        layers = server.layers.len(),
        entries = legend.layers.iter().map(|l| l.legend.len()).sum::<usize>(),
        "Adapted server legend"
    );
    Ok(legend)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enhance::{enhance_renderer, EnhancedRenderer, JoinPolicy};
    use symbology_common::SymbologyError;

    fn server_response() -> ServerLegendResponse {
        serde_json::from_str(
            r#"{"layers": [
                {"layerId": 0, "legend": [{"label": "A", "url": "abc123", "imageData": "xx", "contentType": "image/png"}]},
                {"layerId": 3, "legend": [{"label": "B", "url": "http://host/b.png"}]}
            ]}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_fake_renderer_merges_layers() {
        let renderer = server_legend_to_fake_renderer(&server_response(), None);
        let Renderer::UniqueValue(uv) = renderer else {
            panic!("expected uniqueValue");
        };
        let labels: Vec<_> = uv.infos().iter().map(|i| i.label()).collect();
        assert_eq!(labels, vec!["A", "B"]);
        assert_eq!(uv.infos()[0].value.as_str(), "A");
        assert!(matches!(uv.infos()[0].symbol, Symbol::PictureMarker(_)));
    }

    #[test]
    fn test_fake_renderer_single_layer() {
        let renderer = server_legend_to_fake_renderer(&server_response(), Some(3));
        let Renderer::UniqueValue(uv) = renderer else {
            panic!("expected uniqueValue");
        };
        assert_eq!(uv.infos().len(), 1);
        assert_eq!(uv.infos()[0].label(), "B");
    }

    #[test]
    fn test_absolutize_image_urls() {
        let mut server = server_response();
        absolutize_image_urls(&mut server, "http://svc/MapServer/");
        assert_eq!(
            server.layers[0].legend[0].url.as_deref(),
            Some("http://svc/MapServer/0/images/abc123")
        );
        assert_eq!(server.layers[1].legend[0].url.as_deref(), Some("http://host/b.png"));
    }

    #[test]
    fn test_legend_symbols_default_last() {
        let json = r#"{
            "type": "uniqueValue",
            "field1": "T",
            "defaultSymbol": {"type": "esriSLS"},
            "uniqueValueInfos": [
                {"value": "1", "label": "one", "symbol": {"type": "esriSLS"}},
                {"value": "2", "label": "two", "symbol": {"type": "esriSLS"}}
            ]
        }"#;
        let renderer = Renderer::from_json(json).unwrap();
        let labels: Vec<_> = legend_symbols(&renderer).into_iter().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["one", "two", ""]);
    }

    #[test]
    fn test_legend_response_json_shape() {
        let response = LegendResponse::single(2, vec![LegendEntry::new("x", IconImage::empty())]);
        let value: serde_json::Value = serde_json::from_str(&response.to_json().unwrap()).unwrap();
        assert_eq!(value["layers"][0]["layerId"], 2);
        assert_eq!(value["layers"][0]["legend"][0]["label"], "x");
        assert_eq!(value["layers"][0]["legend"][0]["icon"]["width"], 32.0);
    }

    #[test]
    fn test_server_item_defaults() {
        let item: ServerLegendItem = serde_json::from_str(r#"{"label": "only"}"#).unwrap();
        assert!(item.url.is_none());
        assert!(matches!(server_item_symbol(&item), Symbol::Text(_)));
    }

    #[tokio::test]
    async fn test_pending_legend_vector_icon_drawn() {
        let renderer = Renderer::from_json(
            r#"{"type": "simple", "label": "Roads", "symbol": {"type": "esriSLS", "width": 2}}"#,
        )
        .unwrap();
        let pending = pending_legend(&Rasterizer::offline(), &renderer);
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].label, "Roads");

        let enhanced = enhance_renderer(&renderer, pending, JoinPolicy::Abort)
            .await
            .unwrap();
        let EnhancedRenderer::Simple(simple) = enhanced else {
            panic!("expected simple");
        };
        assert!(simple.icon.unwrap().markup().contains(r#"stroke-width="2""#));
    }

    #[tokio::test]
    async fn test_malformed_symbol_fails_legend() {
        let renderer =
            Renderer::from_json(r#"{"type": "simple", "symbol": {"type": "esriPFS"}}"#).unwrap();
        let err = renderer_to_legend(&Rasterizer::offline(), &renderer, 0)
            .await
            .unwrap_err();
        assert!(matches!(err, SymbologyError::MalformedInput(_)));
    }
}
