//! Fetch-then-generate entry points
//!
//! Each call fetches the catalog from scratch and regenerates the whole
//! document. Nothing is cached between calls.

use crate::error::CatalogError;
use crate::fetchers::{AdminApiConfig, AdminApiFetcher, CatalogFetcher};
use crate::generate::generate_document;
use crate::types::{Catalog, GeneratedDocument};
use tracing::debug;

/// Fetch a catalog and render it as llms.txt
pub async fn generate_llms_txt(
    fetcher: &dyn CatalogFetcher,
) -> Result<GeneratedDocument, CatalogError> {
    let catalog = fetch_catalog(fetcher).await?;
    Ok(generate_document(&catalog))
}

/// Fetch a catalog through `fetcher`, logging which source was used
pub async fn fetch_catalog(fetcher: &dyn CatalogFetcher) -> Result<Catalog, CatalogError> {
    debug!(fetcher = fetcher.name(), "Fetching catalog");
    let catalog = fetcher.fetch_catalog().await?;
    debug!(
        fetcher = fetcher.name(),
        shop = %catalog.shop.name,
        products = catalog.products.len(),
        "Catalog fetched"
    );
    Ok(catalog)
}

/// Generate llms.txt for a store through the Admin API
///
/// For snapshots or custom sources, use [`generate_llms_txt`] with a
/// [`CatalogFetcher`] directly.
pub async fn generate_for_store(
    config: AdminApiConfig,
) -> Result<GeneratedDocument, CatalogError> {
    let fetcher = AdminApiFetcher::new(config)?;
    generate_llms_txt(&fetcher).await
}
