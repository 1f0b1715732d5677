//! llmstxt - llms.txt generation for Shopify stores
//!
//! This crate turns a store's metadata and product catalog into a single
//! markdown-flavored document following the llms.txt convention, so AI
//! agents can read a summary of the store at `{site}/llms.txt`.
//!
//! ## Pipeline
//!
//! A [`CatalogFetcher`] produces a [`Catalog`]; [`generate`] renders it.
//! Generation is pure and deterministic; all I/O lives in the fetchers.
//!
//! Built-in fetchers:
//! - [`AdminApiFetcher`] - Shopify Admin GraphQL API (shop + first 50 products)
//! - [`SnapshotFetcher`] - catalog JSON exported earlier

pub mod client;
mod error;
pub mod facets;
pub mod fetchers;
mod generate;
mod types;

pub use client::{fetch_catalog, generate_for_store, generate_llms_txt};
pub use error::CatalogError;
pub use facets::{CatalogFacets, GroupedProducts, PriceRange, UniqueSeq, OTHER_CATEGORY};
pub use fetchers::{AdminApiConfig, AdminApiFetcher, CatalogFetcher, SnapshotFetcher};
pub use generate::{
    generate, generate_document, truncate_description, MAX_DESCRIPTION_CHARS,
    MAX_PRODUCTS_PER_CATEGORY, MAX_VENDORS,
};
pub use types::{
    Catalog, GeneratedDocument, ProductRecord, ProductVariant, ShopInfo, ACTIVE_STATUS,
};

/// Default User-Agent string
pub const DEFAULT_USER_AGENT: &str = "Everruns llmstxt/1.0";

/// Extended documentation for LLM consumption (llmtxt)
pub const TOOL_LLMTXT: &str = r#"# llmstxt

Generates an llms.txt document describing a Shopify store for AI agents.

## Capabilities
- Reads shop metadata and the first 50 products (10 variants each) from the Admin GraphQL API
- Reads a previously exported catalog snapshot instead of calling the API
- Groups products by product type, 10 per category
- Summarizes totals, active products, price range, categories and vendors
- Links the store's policy, catalog and contact pages

## Commands
- `llmstxt generate --shop <domain> --token <token>`: print llms.txt for a store
- `llmstxt generate --snapshot <file>`: print llms.txt for an exported catalog
- `llmstxt generate ... --output <path>`: write llms.txt (a directory gets `llms.txt` inside)
- `llmstxt export --shop <domain> --token <token> --output <file>`: save a catalog snapshot

## Environment
- `SHOPIFY_SHOP_DOMAIN`: store handle, e.g. `acme.myshopify.com`
- `SHOPIFY_ACCESS_TOKEN`: Admin API access token
- `SHOPIFY_API_VERSION`: Admin API version (default: 2024-10)
- `RUST_LOG`: log filter, logs go to stderr

## Publishing
Place the generated file at your website's root so it is reachable at
`yourstore.com/llms.txt`.

## Error Handling
- Rejected or expired tokens are reported as authentication failures
- Malformed or unreachable API responses are reported as upstream failures
- A failed run never overwrites an existing output file
"#;
