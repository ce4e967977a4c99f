//! Tests for legend construction and server legend adaptation.

mod common;

use std::sync::Arc;

use common::{MockImageLoader, MockLegendSource};
use symbology::{
    map_server_to_local_legend, renderer_to_legend, server_legend_to_fake_renderer, Rasterizer,
    Renderer, Symbol, SymbologyError,
};
use symbology_common::ServerLegendResponse;
use test_utils::{
    fixtures::{renderers, server_legends},
    png_base64, png_bytes,
};

const SERVICE: &str = "https://maps.example.com/arcgis/rest/services/Utilities/MapServer";

fn labels(response: &symbology::LegendResponse) -> Vec<&str> {
    response.layers[0]
        .legend
        .iter()
        .map(|e| e.label.as_str())
        .collect()
}

#[tokio::test]
async fn test_renderer_to_legend_order_default_last() {
    let renderer = Renderer::from_json(renderers::CLASS_BREAKS).unwrap();
    let legend = renderer_to_legend(&Rasterizer::offline(), &renderer, 4)
        .await
        .unwrap();

    assert_eq!(legend.layers.len(), 1);
    assert_eq!(legend.layers[0].layer_id, 4);
    assert_eq!(
        labels(&legend),
        vec!["0 - 1000", "1000 - 10000", "10000 - 100000", "No data"]
    );
    assert!(legend.layers[0].legend.iter().all(|e| e.icon.width() == 32.0));
}

#[tokio::test]
async fn test_renderer_to_legend_simple() {
    let renderer = Renderer::from_json(renderers::SIMPLE_MARKER).unwrap();
    let legend = renderer_to_legend(&Rasterizer::offline(), &renderer, 0)
        .await
        .unwrap();
    assert_eq!(labels(&legend), vec!["Hydrants"]);
    assert!(legend.layers[0].legend[0].icon.markup().contains("<circle"));
}

#[tokio::test]
async fn test_text_symbol_legend_is_blank() {
    let renderer = Renderer::from_json(renderers::SIMPLE_TEXT).unwrap();
    let legend = renderer_to_legend(&Rasterizer::offline(), &renderer, 0)
        .await
        .unwrap();
    assert!(legend.layers[0].legend[0].icon.is_empty());
}

#[test]
fn test_fake_renderer_uses_inline_image_data() {
    let body = format!(
        r#"{{"layers": [{{"layerId": 1, "legend": [{{"label": "Flood", "imageData": "{}", "contentType": "image/png"}}]}}]}}"#,
        png_base64(2, 2, [0, 0, 255, 255])
    );
    let server: ServerLegendResponse = serde_json::from_str(&body).unwrap();
    let Renderer::UniqueValue(uv) = server_legend_to_fake_renderer(&server, Some(1)) else {
        panic!("expected uniqueValue");
    };
    let Symbol::PictureMarker(pms) = &uv.infos()[0].symbol else {
        panic!("expected picture marker");
    };
    assert_eq!(pms.image.content_type.as_deref(), Some("image/png"));
    assert!(pms.image.image_data.is_some());
    assert_eq!(uv.infos()[0].value.as_str(), "Flood");
}

#[tokio::test]
async fn test_map_server_legend_fetches_relative_images() {
    let png = png_bytes(20, 20, [10, 20, 30, 255]);
    let loader = Arc::new(
        MockImageLoader::new()
            .with_image(&format!("{}/0/images/a1b2", SERVICE), png.clone(), Some("image/png"))
            .with_image(&format!("{}/0/images/c3d4", SERVICE), png.clone(), None)
            .with_image(&format!("{}/2/images/e5f6", SERVICE), png, Some("image/png")),
    );
    let source = MockLegendSource::with_body(server_legends::TWO_LAYERS_URLS);
    let rasterizer = Rasterizer::new(loader.clone());

    let legend = map_server_to_local_legend(&source, &rasterizer, SERVICE, None)
        .await
        .unwrap();

    assert_eq!(source.calls(), 1);
    assert_eq!(legend.layers[0].layer_id, 0);
    assert_eq!(labels(&legend), vec!["Active", "Capped", "Main"]);
    assert!(legend.layers[0]
        .legend
        .iter()
        .all(|e| e.icon.markup().contains("data:image/png;base64,")));
    assert_eq!(loader.requests().len(), 3);
}

#[tokio::test]
async fn test_map_server_legend_single_layer() {
    let png = png_bytes(20, 20, [10, 20, 30, 255]);
    let loader = Arc::new(MockImageLoader::new().with_image(
        &format!("{}/2/images/e5f6", SERVICE),
        png,
        Some("image/png"),
    ));
    let source = MockLegendSource::with_body(server_legends::TWO_LAYERS_URLS);

    let legend = map_server_to_local_legend(&source, &Rasterizer::new(loader), SERVICE, Some(2))
        .await
        .unwrap();

    assert_eq!(legend.layers[0].layer_id, 2);
    assert_eq!(labels(&legend), vec!["Main"]);
    assert!(!legend.layers[0].legend[0].icon.is_empty());
}

#[tokio::test]
async fn test_map_server_legend_missing_images_degrade() {
    let source = MockLegendSource::with_body(server_legends::TWO_LAYERS_URLS);
    let legend = map_server_to_local_legend(&source, &Rasterizer::offline(), SERVICE, None)
        .await
        .unwrap();
    assert_eq!(labels(&legend).len(), 3);
    assert!(legend.layers[0].legend.iter().all(|e| e.icon.is_empty()));
}

#[tokio::test]
async fn test_map_server_legend_service_error() {
    let source = MockLegendSource::with_body(server_legends::ERROR);
    let err = map_server_to_local_legend(&source, &Rasterizer::offline(), SERVICE, None)
        .await
        .unwrap_err();
    match err {
        SymbologyError::ServiceError { code, message } => {
            assert_eq!(code, 498);
            assert_eq!(message, "Invalid token.");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_map_server_legend_fetch_failure() {
    let source = MockLegendSource::unreachable();
    let err = map_server_to_local_legend(&source, &Rasterizer::offline(), SERVICE, None)
        .await
        .unwrap_err();
    assert!(matches!(err, SymbologyError::LegendFetch(_)));
}
