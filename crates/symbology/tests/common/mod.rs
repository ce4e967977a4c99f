//! In-memory doubles for the remote-access traits.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use symbology::{ImageLoader, LegendSource, LoadedImage};
use symbology_common::{ServerLegendResponse, SymbologyError, SymbologyResult};

/// Serves images from a URL map and records every request.
#[derive(Default)]
pub struct MockImageLoader {
    images: HashMap<String, LoadedImage>,
    requests: Mutex<Vec<String>>,
}

impl MockImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(mut self, url: &str, bytes: Vec<u8>, content_type: Option<&str>) -> Self {
        self.images.insert(
            url.to_string(),
            LoadedImage {
                bytes: Bytes::from(bytes),
                content_type: content_type.map(str::to_string),
            },
        );
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageLoader for MockImageLoader {
    async fn load(&self, url: &str) -> SymbologyResult<LoadedImage> {
        self.requests.lock().unwrap().push(url.to_string());
        self.images
            .get(url)
            .cloned()
            .ok_or_else(|| SymbologyError::ImageFetch {
                url: url.to_string(),
                message: "404 Not Found".to_string(),
            })
    }
}

/// Returns one canned legend document, or a fetch failure.
pub struct MockLegendSource {
    body: Option<String>,
    calls: AtomicUsize,
}

impl MockLegendSource {
    pub fn with_body(body: &str) -> Self {
        Self {
            body: Some(body.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            body: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LegendSource for MockLegendSource {
    async fn fetch_legend(&self, _service_url: &str) -> SymbologyResult<ServerLegendResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.body {
            Some(body) => Ok(serde_json::from_str(body)?),
            None => Err(SymbologyError::LegendFetch("connection refused".to_string())),
        }
    }
}
