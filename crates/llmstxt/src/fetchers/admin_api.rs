//! Shopify Admin GraphQL API fetcher
//!
//! Issues exactly two queries per call (shop metadata, then the first page
//! of products with their first variants) and flattens the edge/node
//! connections into plain [`Catalog`] sequences.

use crate::error::CatalogError;
use crate::fetchers::CatalogFetcher;
use crate::types::{Catalog, ProductRecord, ProductVariant, ShopInfo};
use crate::DEFAULT_USER_AGENT;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Admin API version used when none is configured
pub const DEFAULT_API_VERSION: &str = "2024-10";

/// Number of products fetched per call
pub const PRODUCT_LIMIT: usize = 50;

/// Number of variants fetched per product
pub const VARIANT_LIMIT: usize = 10;

/// Timeout for each API request
const API_TIMEOUT: Duration = Duration::from_secs(10);

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

const SHOP_QUERY: &str = r#"query getShop {
  shop {
    name
    description
    url
    email
    myshopifyDomain
    currencyCode
    primaryDomain {
      url
    }
  }
}"#;

const PRODUCTS_QUERY: &str = r#"query getProducts($first: Int!, $variants: Int!) {
  products(first: $first) {
    edges {
      node {
        id
        title
        description
        handle
        productType
        vendor
        tags
        status
        totalInventory
        variants(first: $variants) {
          edges {
            node {
              price
              compareAtPrice
            }
          }
        }
      }
    }
  }
}"#;

/// Connection settings for the Admin API
#[derive(Debug, Clone)]
pub struct AdminApiConfig {
    /// Store handle, e.g. `acme.myshopify.com`
    pub shop_domain: String,
    /// Admin API access token
    pub access_token: String,
    /// API version segment, e.g. `2024-10`
    pub api_version: String,
    /// Custom User-Agent
    pub user_agent: Option<String>,
    /// Full GraphQL endpoint, replacing the one derived from `shop_domain`
    pub endpoint: Option<String>,
}

impl AdminApiConfig {
    /// Create a config for a store with the default API version
    pub fn new(shop_domain: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            shop_domain: shop_domain.into(),
            access_token: access_token.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            user_agent: None,
            endpoint: None,
        }
    }

    /// Set the API version
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Set a custom User-Agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Override the GraphQL endpoint
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Resolve the GraphQL endpoint URL
    pub fn graphql_url(&self) -> Result<Url, CatalogError> {
        let raw = match &self.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => format!(
                "https://{}/admin/api/{}/graphql.json",
                normalize_shop_domain(&self.shop_domain),
                self.api_version
            ),
        };
        Url::parse(&raw).map_err(|e| CatalogError::InvalidEndpoint(format!("{}: {}", raw, e)))
    }
}

/// Strip scheme and trailing slashes from a store handle
fn normalize_shop_domain(domain: &str) -> &str {
    domain
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/')
}

/// Admin API fetcher
///
/// Authenticates with an access token and reads the shop and its first
/// [`PRODUCT_LIMIT`] products in two GraphQL requests.
pub struct AdminApiFetcher {
    client: reqwest::Client,
    endpoint: Url,
    access_token: HeaderValue,
}

impl AdminApiFetcher {
    /// Create a fetcher, validating the config and building the HTTP client
    pub fn new(config: AdminApiConfig) -> Result<Self, CatalogError> {
        if config.endpoint.is_none() && normalize_shop_domain(&config.shop_domain).is_empty() {
            return Err(CatalogError::MissingConfig("shop_domain"));
        }
        if config.access_token.trim().is_empty() {
            return Err(CatalogError::MissingConfig("access_token"));
        }

        let endpoint = config.graphql_url()?;
        let access_token = HeaderValue::from_str(config.access_token.trim())
            .map_err(|_| CatalogError::Auth("access token contains invalid characters".to_string()))?;

        let user_agent = config.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_USER_AGENT)),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(API_TIMEOUT)
            .timeout(API_TIMEOUT)
            .build()
            .map_err(CatalogError::ClientBuildError)?;

        Ok(Self {
            client,
            endpoint,
            access_token,
        })
    }

    /// Run one GraphQL query and return its `data` object
    async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
    ) -> Result<T, CatalogError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(ACCESS_TOKEN_HEADER, self.access_token.clone())
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(CatalogError::from_reqwest)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(CatalogError::Auth(format!(
                "Admin API rejected credentials: HTTP {}",
                status.as_u16()
            )));
        }
        if !status.is_success() {
            return Err(CatalogError::Upstream(format!(
                "Admin API error: HTTP {}",
                status.as_u16()
            )));
        }

        let body: GraphQlResponse<T> = response
            .json()
            .await
            .map_err(|e| CatalogError::Upstream(format!("Failed to parse response: {}", e)))?;

        if !body.errors.is_empty() {
            return Err(CatalogError::GraphQl(
                body.errors.into_iter().map(|e| e.message).collect(),
            ));
        }

        body.data
            .ok_or_else(|| CatalogError::Upstream("Response is missing data".to_string()))
    }
}

#[async_trait]
impl CatalogFetcher for AdminApiFetcher {
    fn name(&self) -> &'static str {
        "admin_api"
    }

    async fn fetch_catalog(&self) -> Result<Catalog, CatalogError> {
        debug!(endpoint = %self.endpoint, "Querying shop metadata");
        let shop: ShopData = self.query(SHOP_QUERY, json!({})).await?;

        debug!(
            endpoint = %self.endpoint,
            first = PRODUCT_LIMIT,
            "Querying products"
        );
        let products: ProductsData = self
            .query(
                PRODUCTS_QUERY,
                json!({ "first": PRODUCT_LIMIT, "variants": VARIANT_LIMIT }),
            )
            .await?;

        let products: Vec<ProductRecord> = products
            .products
            .into_nodes()
            .into_iter()
            .map(ProductRecord::from)
            .collect();

        if products.len() > PRODUCT_LIMIT {
            warn!(
                count = products.len(),
                limit = PRODUCT_LIMIT,
                "Admin API returned more products than requested"
            );
        }
        debug!(products = products.len(), "Fetched catalog");

        Ok(Catalog {
            shop: shop.shop.into(),
            products,
        })
    }
}

/// GraphQL response envelope
#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlErrorMessage>,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorMessage {
    message: String,
}

/// Paginated `edges { node }` connection
#[derive(Debug, Deserialize)]
struct Connection<T> {
    edges: Vec<Edge<T>>,
}

#[derive(Debug, Deserialize)]
struct Edge<T> {
    node: T,
}

impl<T> Connection<T> {
    fn into_nodes(self) -> Vec<T> {
        self.edges.into_iter().map(|edge| edge.node).collect()
    }
}

#[derive(Debug, Deserialize)]
struct ShopData {
    shop: RawShop,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawShop {
    name: String,
    description: Option<String>,
    url: String,
    email: String,
    myshopify_domain: String,
    currency_code: String,
    primary_domain: RawDomain,
}

#[derive(Debug, Deserialize)]
struct RawDomain {
    url: String,
}

impl From<RawShop> for ShopInfo {
    fn from(raw: RawShop) -> Self {
        ShopInfo {
            name: raw.name,
            description: raw.description,
            url: raw.url,
            email: raw.email,
            domain: raw.myshopify_domain,
            currency_code: raw.currency_code,
            primary_domain_url: raw.primary_domain.url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProductsData {
    products: Connection<RawProduct>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProduct {
    id: String,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    handle: Option<String>,
    #[serde(default)]
    product_type: Option<String>,
    #[serde(default)]
    vendor: Option<String>,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    total_inventory: Option<i64>,
    variants: Connection<RawVariant>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVariant {
    price: String,
    #[serde(default)]
    compare_at_price: Option<String>,
}

impl From<RawProduct> for ProductRecord {
    fn from(raw: RawProduct) -> Self {
        ProductRecord {
            id: raw.id,
            title: raw.title,
            description: raw.description.unwrap_or_default(),
            handle: raw.handle.unwrap_or_default(),
            product_type: raw.product_type.unwrap_or_default(),
            vendor: raw.vendor.unwrap_or_default(),
            tags: raw.tags.unwrap_or_default(),
            status: raw.status.unwrap_or_default(),
            total_inventory: raw.total_inventory.unwrap_or_default(),
            variants: raw
                .variants
                .into_nodes()
                .into_iter()
                .map(|v| ProductVariant {
                    price: v.price,
                    compare_at_price: v.compare_at_price,
                })
                .collect(),
        }
    }
}
