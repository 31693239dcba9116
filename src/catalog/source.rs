//! Where the catalog document comes from

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{Result, ToolchatError};

/// A remote catalog document provider
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the raw catalog document
    async fn fetch(&self) -> Result<Vec<u8>>;

    /// Human-readable origin, for logs
    fn describe(&self) -> String;
}

/// Fetches the catalog with a plain HTTP GET
#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    client: Client,
    url: String,
}

impl HttpCatalogSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ToolchatError::CatalogFetch(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch(&self) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ToolchatError::CatalogFetch(format!("GET {} failed: {}", self.url, e)))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ToolchatError::CatalogFetch(format!("Reading {} failed: {}", self.url, e)))?;

        Ok(bytes.to_vec())
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// In-memory source for tests and offline runs. `None` simulates an unreachable endpoint.
#[derive(Debug, Default)]
pub struct StaticCatalogSource {
    body: Mutex<Option<Vec<u8>>>,
    fetches: AtomicUsize,
}

impl StaticCatalogSource {
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        Self {
            body: Mutex::new(Some(body.into())),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn unreachable() -> Self {
        Self::default()
    }

    /// Replace the document served by later fetches
    pub fn set_body(&self, body: impl Into<Vec<u8>>) {
        let mut current = self.body.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *current = Some(body.into());
    }

    /// Number of fetch attempts so far
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogSource for StaticCatalogSource {
    async fn fetch(&self) -> Result<Vec<u8>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let body = self.body.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        body.clone()
            .ok_or_else(|| ToolchatError::CatalogFetch("catalog source unreachable".to_string()))
    }

    fn describe(&self) -> String {
        "static".to_string()
    }
}
