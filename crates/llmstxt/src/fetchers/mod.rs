//! Catalog fetchers
//!
//! Design: a fetcher produces a complete [`Catalog`] per call, with no
//! caching and no retries. The generator never sees platform wire shapes;
//! each fetcher flattens its source into the plain catalog types.

mod admin_api;
mod snapshot;

pub use admin_api::{
    AdminApiConfig, AdminApiFetcher, DEFAULT_API_VERSION, PRODUCT_LIMIT, VARIANT_LIMIT,
};
pub use snapshot::SnapshotFetcher;

use crate::error::CatalogError;
use crate::types::Catalog;
use async_trait::async_trait;

/// Trait for catalog sources
///
/// Implement this trait to feed the generator from a new source.
#[async_trait]
pub trait CatalogFetcher: Send + Sync {
    /// Unique identifier for this fetcher (for logging/debugging)
    fn name(&self) -> &'static str;

    /// Fetch shop metadata and products from scratch
    async fn fetch_catalog(&self) -> Result<Catalog, CatalogError>;
}
