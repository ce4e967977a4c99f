//! Remote resource access: picture bytes and service legends.
//!
//! Both seams are traits so callers can plug in caching or test doubles; the
//! reqwest-backed [`HttpClient`] implements both.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header, Client};
use serde::Deserialize;
use symbology_common::{ServerLegendResponse, SymbologyError, SymbologyResult};
use tracing::{debug, instrument};

/// Raw bytes of a fetched image.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub bytes: Bytes,
    /// MIME type reported by the server, if any
    pub content_type: Option<String>,
}

/// Fetches image bytes by URL.
#[async_trait]
pub trait ImageLoader: Send + Sync {
    async fn load(&self, url: &str) -> SymbologyResult<LoadedImage>;
}

/// Fetches the legend JSON of a map service.
#[async_trait]
pub trait LegendSource: Send + Sync {
    async fn fetch_legend(&self, service_url: &str) -> SymbologyResult<ServerLegendResponse>;
}

/// Loader for environments without network access. Every request fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineLoader;

#[async_trait]
impl ImageLoader for OfflineLoader {
    async fn load(&self, url: &str) -> SymbologyResult<LoadedImage> {
        Err(SymbologyError::ImageFetch {
            url: url.to_string(),
            message: "remote fetching disabled".to_string(),
        })
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Whole-request timeout in seconds
    pub timeout_secs: u64,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            connect_timeout_secs: 10,
            user_agent: concat!("map-symbology/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Legend endpoint of a map service.
pub fn legend_url(service_url: &str) -> String {
    format!("{}/legend?f=json", service_url.trim_end_matches('/'))
}

/// reqwest-backed image loader and legend source.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(config: &HttpConfig) -> SymbologyResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| SymbologyError::InternalError(format!("HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ImageLoader for HttpClient {
    #[instrument(skip(self))]
    async fn load(&self, url: &str) -> SymbologyResult<LoadedImage> {
        let fetch_err = |message: String| SymbologyError::ImageFetch {
            url: url.to_string(),
            message,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| fetch_err(e.to_string()))?;

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        let bytes = response.bytes().await.map_err(|e| fetch_err(e.to_string()))?;
        debug!(size = bytes.len(), "Fetched image");

        Ok(LoadedImage {
            bytes,
            content_type,
        })
    }
}

#[async_trait]
impl LegendSource for HttpClient {
    #[instrument(skip(self))]
    async fn fetch_legend(&self, service_url: &str) -> SymbologyResult<ServerLegendResponse> {
        let url = legend_url(service_url);
        debug!(url = %url, "Fetching service legend");

        self.client
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| SymbologyError::LegendFetch(e.to_string()))?
            .json::<ServerLegendResponse>()
            .await
            .map_err(|e| SymbologyError::LegendFetch(format!("invalid legend JSON: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legend_url() {
        assert_eq!(
            legend_url("https://example.com/arcgis/rest/services/Roads/MapServer/"),
            "https://example.com/arcgis/rest/services/Roads/MapServer/legend?f=json"
        );
        assert_eq!(legend_url("http://x/MapServer"), "http://x/MapServer/legend?f=json");
    }

    #[tokio::test]
    async fn test_offline_loader_rejects() {
        let err = OfflineLoader.load("http://x/a.png").await.unwrap_err();
        assert!(matches!(err, SymbologyError::ImageFetch { .. }));
    }

    #[test]
    fn test_http_client_builds() {
        assert!(HttpClient::new(&HttpConfig::default()).is_ok());
    }
}
