//! Catalog aggregation: ordered facets, category grouping and price range
//!
//! Everything here preserves first-appearance order so the generated
//! document is byte-identical across runs with the same input.

use crate::types::ProductRecord;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::str::FromStr;
use tracing::warn;

/// Category label used for products without a `product_type`
pub const OTHER_CATEGORY: &str = "Other";

/// Insertion-ordered sequence that rejects duplicates
#[derive(Debug, Clone)]
pub struct UniqueSeq<T> {
    items: Vec<T>,
    seen: HashSet<T>,
}

impl<T> Default for UniqueSeq<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            seen: HashSet::new(),
        }
    }
}

impl<T: Eq + Hash + Clone> UniqueSeq<T> {
    /// Create an empty sequence
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `item` unless it was seen before; returns true if appended
    pub fn insert(&mut self, item: T) -> bool {
        if self.seen.insert(item.clone()) {
            self.items.push(item);
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T: Eq + Hash + Clone> FromIterator<T> for UniqueSeq<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut seq = Self::new();
        for item in iter {
            seq.insert(item);
        }
        seq
    }
}

/// Products grouped by category, in the order each category first appears
#[derive(Debug, Default)]
pub struct GroupedProducts<'a> {
    groups: Vec<(&'a str, Vec<&'a ProductRecord>)>,
    index: HashMap<&'a str, usize>,
}

impl<'a> GroupedProducts<'a> {
    /// Group `products` in a single pass
    ///
    /// Empty `product_type` values fall into [`OTHER_CATEGORY`].
    pub fn from_products(products: &'a [ProductRecord]) -> Self {
        let mut grouped = Self::default();
        for product in products {
            let category = if product.product_type.is_empty() {
                OTHER_CATEGORY
            } else {
                product.product_type.as_str()
            };
            grouped.push(category, product);
        }
        grouped
    }

    fn push(&mut self, category: &'a str, product: &'a ProductRecord) {
        match self.index.get(category) {
            Some(&i) => self.groups[i].1.push(product),
            None => {
                self.index.insert(category, self.groups.len());
                self.groups.push((category, vec![product]));
            }
        }
    }

    /// Iterate `(category, members)` in first-insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &[&'a ProductRecord])> {
        self.groups.iter().map(|(c, members)| (*c, members.as_slice()))
    }
}

/// Lowest and highest variant price across a catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PriceRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl PriceRange {
    /// Compute the range over every variant of every product
    ///
    /// Prices that do not parse as decimals are skipped. With no parseable
    /// prices both bounds are zero.
    pub fn from_products(products: &[ProductRecord]) -> Self {
        let mut prices = products
            .iter()
            .flat_map(|p| p.variants.iter())
            .filter_map(|v| match parse_price(&v.price) {
                Some(price) => Some(price),
                None => {
                    warn!(price = %v.price, "Skipping unparseable variant price");
                    None
                }
            });

        let Some(first) = prices.next() else {
            return Self::default();
        };

        prices.fold(
            Self {
                min: first,
                max: first,
            },
            |range, price| Self {
                min: range.min.min(price),
                max: range.max.max(price),
            },
        )
    }
}

/// Parse a decimal price string, tolerating surrounding whitespace
pub fn parse_price(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw.trim()).ok()
}

/// Format a price with exactly two decimals and no thousands separators
pub fn format_price(price: Decimal) -> String {
    let mut rounded = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}

/// Summary figures derived from a product list
#[derive(Debug)]
pub struct CatalogFacets<'a> {
    pub product_types: UniqueSeq<&'a str>,
    pub vendors: UniqueSeq<&'a str>,
    pub total_products: usize,
    pub active_products: usize,
    pub price_range: PriceRange,
}

impl<'a> CatalogFacets<'a> {
    pub fn from_products(products: &'a [ProductRecord]) -> Self {
        Self {
            product_types: products
                .iter()
                .map(|p| p.product_type.as_str())
                .filter(|t| !t.is_empty())
                .collect(),
            vendors: products
                .iter()
                .map(|p| p.vendor.as_str())
                .filter(|v| !v.is_empty())
                .collect(),
            total_products: products.len(),
            active_products: products.iter().filter(|p| p.is_active()).count(),
            price_range: PriceRange::from_products(products),
        }
    }
}
