//! Local catalog cache with a once-per-calendar-day refresh.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::source::CatalogSource;
use super::tool::parse_catalog;
use super::Catalog;
use crate::error::{Result, ToolchatError};
use crate::storage;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Contents of the refresh record file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RefreshRecord {
    #[serde(default)]
    last_update: Option<String>,
}

/// Loads the cached catalog and refreshes it from a [`CatalogSource`]
pub struct CatalogStore {
    catalog_path: PathBuf,
    record_path: PathBuf,
    source: Arc<dyn CatalogSource>,
}

impl CatalogStore {
    pub fn new(
        catalog_path: impl Into<PathBuf>,
        record_path: impl Into<PathBuf>,
        source: Arc<dyn CatalogSource>,
    ) -> Self {
        Self {
            catalog_path: catalog_path.into(),
            record_path: record_path.into(),
            source,
        }
    }

    /// Load the catalog, refreshing it first unless it was refreshed today
    pub async fn load_catalog(&self) -> Catalog {
        self.load_catalog_on(Local::now().date_naive()).await
    }

    /// [`load_catalog`](Self::load_catalog) with an explicit "today"
    pub async fn load_catalog_on(&self, today: NaiveDate) -> Catalog {
        if !self.catalog_path.exists() || !self.is_fresh_on(today) {
            if !self.refresh_catalog_on(today).await && !self.catalog_path.exists() {
                log::warn!("No catalog available from {} and no local copy", self.source.describe());
                return Catalog::default();
            }
        } else {
            log::debug!("Catalog already refreshed on {}, using local copy", today);
        }

        match self.read_local() {
            Ok(catalog) => catalog,
            Err(e) => {
                log::warn!("Local catalog unusable, continuing without tools: {}", e);
                Catalog::default()
            }
        }
    }

    /// Fetch the remote catalog and replace the local copy. Returns whether it succeeded.
    pub async fn refresh_catalog(&self) -> bool {
        self.refresh_catalog_on(Local::now().date_naive()).await
    }

    /// [`refresh_catalog`](Self::refresh_catalog) with an explicit "today"
    pub async fn refresh_catalog_on(&self, today: NaiveDate) -> bool {
        match self.try_refresh(today).await {
            Ok(count) => {
                log::info!("Catalog refreshed from {}: {} tools", self.source.describe(), count);
                true
            }
            Err(e) => {
                log::warn!("Catalog refresh from {} failed: {}", self.source.describe(), e);
                false
            }
        }
    }

    async fn try_refresh(&self, today: NaiveDate) -> Result<usize> {
        let bytes = self.source.fetch().await?;
        let tools = parse_catalog(&bytes)?;

        storage::write_atomic(&self.catalog_path, &bytes)?;
        storage::write_json(
            &self.record_path,
            &RefreshRecord {
                last_update: Some(today.format(DATE_FORMAT).to_string()),
            },
        )?;

        Ok(tools.len())
    }

    /// Date of the last successful refresh, if recorded and readable
    pub fn last_refresh(&self) -> Option<NaiveDate> {
        let record: RefreshRecord = match storage::read_json(&self.record_path) {
            Ok(record) => record?,
            Err(e) => {
                log::warn!("Ignoring refresh record: {}", e);
                return None;
            }
        };

        let raw = record.last_update?;
        match NaiveDate::parse_from_str(&raw, DATE_FORMAT) {
            Ok(date) => Some(date),
            Err(e) => {
                log::warn!("Ignoring refresh record date '{}': {}", raw, e);
                None
            }
        }
    }

    /// Whether the last refresh happened on `today`'s calendar date
    pub fn is_fresh_on(&self, today: NaiveDate) -> bool {
        self.last_refresh() == Some(today)
    }

    /// Read the local catalog without refreshing
    pub fn read_local(&self) -> Result<Catalog> {
        if !self.catalog_path.exists() {
            return Ok(Catalog::default());
        }

        let bytes = std::fs::read(&self.catalog_path).map_err(|e| {
            ToolchatError::CacheIo(format!(
                "Failed to read {}: {}",
                self.catalog_path.display(),
                e
            ))
        })?;
        let tools = parse_catalog(&bytes).map_err(|e| {
            ToolchatError::CacheIo(format!(
                "Failed to parse {}: {}",
                self.catalog_path.display(),
                e
            ))
        })?;
        Ok(Catalog::new(tools))
    }
}

impl std::fmt::Debug for CatalogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogStore")
            .field("catalog_path", &self.catalog_path)
            .field("source", &self.source.describe())
            .finish()
    }
}
