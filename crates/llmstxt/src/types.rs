//! Core catalog types

use serde::{Deserialize, Serialize};

/// Status value that counts a product as active
///
/// Compared exactly; the Admin API reports statuses upper-cased.
pub const ACTIVE_STATUS: &str = "ACTIVE";

/// Shop metadata snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShopInfo {
    /// Store display name
    pub name: String,

    /// Store description; empty counts as absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Store URL as reported by the platform
    pub url: String,

    /// Contact email
    pub email: String,

    /// Platform-internal handle (e.g. `acme.myshopify.com`)
    pub domain: String,

    /// ISO 4217 currency code
    pub currency_code: String,

    /// Public storefront URL (e.g. `https://acme.com`)
    pub primary_domain_url: String,
}

impl ShopInfo {
    /// Description if present and non-empty
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.is_empty())
    }
}

/// A single priced variant of a product
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductVariant {
    /// Price as a decimal string (e.g. `"19.99"`)
    pub price: String,

    /// Pre-sale price as a decimal string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_at_price: Option<String>,
}

impl ProductVariant {
    /// Create a variant with the given price
    pub fn new(price: impl Into<String>) -> Self {
        Self {
            price: price.into(),
            compare_at_price: None,
        }
    }
}

/// A product as handed over by a fetcher
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub handle: String,
    /// Category label; may be empty
    #[serde(default)]
    pub product_type: String,
    /// Brand label; may be empty
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub total_inventory: i64,
    /// Ordered variants; only the first one is shown per product
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
}

impl ProductRecord {
    /// Create a product with the given title and no other data
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Set the category label
    pub fn product_type(mut self, product_type: impl Into<String>) -> Self {
        self.product_type = product_type.into();
        self
    }

    /// Set the vendor
    pub fn vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = vendor.into();
        self
    }

    /// Set the status
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Set the description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append a variant with the given price
    pub fn variant(mut self, price: impl Into<String>) -> Self {
        self.variants.push(ProductVariant::new(price));
        self
    }

    /// True when the status is exactly [`ACTIVE_STATUS`]
    pub fn is_active(&self) -> bool {
        self.status == ACTIVE_STATUS
    }

    /// Price of the first variant, if present and non-empty
    pub fn display_price(&self) -> Option<&str> {
        self.variants
            .first()
            .map(|v| v.price.as_str())
            .filter(|p| !p.is_empty())
    }
}

/// Shop metadata together with its products, as returned by a fetcher
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub shop: ShopInfo,
    #[serde(default)]
    pub products: Vec<ProductRecord>,
}

/// Generated llms.txt document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedDocument {
    pub text: String,
}

impl GeneratedDocument {
    /// File name the document is meant to be published under
    pub const FILE_NAME: &'static str = "llms.txt";
}
