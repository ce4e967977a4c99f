//! Shared handle bundling the rasterizer, legend source and join policy.

use std::sync::Arc;

use symbology_common::{Renderer, SymbologyResult};
use tracing::debug;

use crate::enhance::{enhance_renderer, EnhancedRenderer, JoinPolicy};
use crate::fetch::{HttpClient, HttpConfig, ImageLoader, LegendSource};
use crate::legend::{
    map_server_to_local_legend, pending_legend, renderer_to_legend, LegendEntry, LegendResponse,
};
use crate::placeholder::generate_wms_symbology;
use crate::rasterize::Rasterizer;

/// Entry point for layer code: one per process, cheap to clone.
#[derive(Clone)]
pub struct SymbologyService {
    rasterizer: Rasterizer,
    legends: Arc<dyn LegendSource>,
    policy: JoinPolicy,
}

impl SymbologyService {
    pub fn new(loader: Arc<dyn ImageLoader>, legends: Arc<dyn LegendSource>) -> Self {
        Self {
            rasterizer: Rasterizer::new(loader),
            legends,
            policy: JoinPolicy::default(),
        }
    }

    /// Service backed by a single reqwest client for images and legends.
    pub fn from_http(config: &HttpConfig) -> SymbologyResult<Self> {
        let client = Arc::new(HttpClient::new(config)?);
        Ok(Self::new(client.clone(), client))
    }

    pub fn with_join_policy(mut self, policy: JoinPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn rasterizer(&self) -> &Rasterizer {
        &self.rasterizer
    }

    pub fn join_policy(&self) -> JoinPolicy {
        self.policy
    }

    /// Draw the renderer's own legend and attach it.
    pub async fn enhance(&self, renderer: &Renderer) -> SymbologyResult<EnhancedRenderer> {
        let pending = pending_legend(&self.rasterizer, renderer);
        debug!(
            renderer = renderer.type_name(),
            icons = pending.len(),
            policy = ?self.policy,
            "Enhancing renderer"
        );
        enhance_renderer(renderer, pending, self.policy).await
    }

    pub async fn renderer_legend(
        &self,
        renderer: &Renderer,
        layer_index: u32,
    ) -> SymbologyResult<LegendResponse> {
        renderer_to_legend(&self.rasterizer, renderer, layer_index).await
    }

    pub async fn server_legend(
        &self,
        service_url: &str,
        layer_index: Option<u32>,
    ) -> SymbologyResult<LegendResponse> {
        map_server_to_local_legend(
            self.legends.as_ref(),
            &self.rasterizer,
            service_url,
            layer_index,
        )
        .await
    }

    pub async fn wms_symbology(&self, name: &str, image: Option<&str>) -> LegendEntry {
        generate_wms_symbology(&self.rasterizer, name, image).await
    }
}

impl std::fmt::Debug for SymbologyService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbologyService")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
