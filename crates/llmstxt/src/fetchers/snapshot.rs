//! Snapshot fetcher
//!
//! Reads a catalog previously exported as JSON, so documents can be
//! generated without platform credentials.

use crate::error::CatalogError;
use crate::fetchers::CatalogFetcher;
use crate::types::Catalog;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Fetcher backed by a catalog JSON file
pub struct SnapshotFetcher {
    path: PathBuf,
}

impl SnapshotFetcher {
    /// Create a fetcher for the snapshot at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Write `catalog` as a snapshot readable by [`SnapshotFetcher`]
    pub async fn write(path: impl AsRef<Path>, catalog: &Catalog) -> Result<(), CatalogError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(catalog)
            .map_err(|e| CatalogError::Snapshot(format!("Failed to serialize catalog: {}", e)))?;
        tokio::fs::write(path, json)
            .await
            .map_err(|e| CatalogError::Snapshot(format!("{}: {}", path.display(), e)))
    }
}

#[async_trait]
impl CatalogFetcher for SnapshotFetcher {
    fn name(&self) -> &'static str {
        "snapshot"
    }

    async fn fetch_catalog(&self) -> Result<Catalog, CatalogError> {
        debug!(path = %self.path.display(), "Reading catalog snapshot");

        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| CatalogError::Snapshot(format!("{}: {}", self.path.display(), e)))?;

        serde_json::from_str(&raw).map_err(|e| {
            CatalogError::Snapshot(format!("{}: invalid catalog JSON: {}", self.path.display(), e))
        })
    }
}
