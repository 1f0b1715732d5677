//! llms.txt document generation
//!
//! [`generate`] is a pure function of the shop metadata and product list:
//! no I/O, no clock, no randomness. Calling it twice with the same input
//! yields byte-identical output.

use crate::facets::{format_price, CatalogFacets, GroupedProducts};
use crate::types::{Catalog, GeneratedDocument, ProductRecord, ShopInfo};

/// Maximum number of products listed per category
pub const MAX_PRODUCTS_PER_CATEGORY: usize = 10;

/// Maximum number of vendors listed in the overview
pub const MAX_VENDORS: usize = 10;

/// Descriptions longer than this many characters are truncated
pub const MAX_DESCRIPTION_CHARS: usize = 100;

const PRICE_VARIES: &str = "Price varies";
const NO_DESCRIPTION: &str = "No description available";
const ELLIPSIS: &str = "...";

/// Store policy links: (label, path, summary)
const POLICY_LINKS: &[(&str, &str, &str)] = &[
    (
        "Shipping Policy",
        "/policies/shipping-policy",
        "Information about shipping methods, costs, and delivery times",
    ),
    (
        "Return Policy",
        "/policies/refund-policy",
        "Details about returns, exchanges, and refunds",
    ),
    (
        "Privacy Policy",
        "/policies/privacy-policy",
        "How customer data is collected and used",
    ),
    (
        "Terms of Service",
        "/policies/terms-of-service",
        "Terms and conditions for using the store",
    ),
];

const OPTIONAL_LINKS: &[(&str, &str, &str)] = &[
    ("All Products", "/collections/all", "Complete product catalog"),
    (
        "Contact Page",
        "/pages/contact",
        "Store contact information and inquiry form",
    ),
];

/// Generate an llms.txt document for a fetched catalog
pub fn generate_document(catalog: &Catalog) -> GeneratedDocument {
    GeneratedDocument {
        text: generate(&catalog.shop, &catalog.products),
    }
}

/// Render shop metadata and products as llms.txt text
///
/// Blocks are emitted in a fixed order and separated by a single blank line.
pub fn generate(shop: &ShopInfo, products: &[ProductRecord]) -> String {
    let facets = CatalogFacets::from_products(products);
    let mut blocks: Vec<String> = Vec::new();

    // Header
    blocks.push(format!("# {}\n", shop.name));
    blocks.push(format!("> {}\n", summary_line(shop, &facets)));

    blocks.push(store_information(shop));
    blocks.push(catalog_overview(shop, &facets));

    if !products.is_empty() {
        blocks.push("## Products\n".to_string());
        for (category, members) in GroupedProducts::from_products(products).iter() {
            if members.is_empty() {
                continue;
            }
            blocks.push(format!("### {}\n", category));
            blocks.push(category_listing(category, members));
        }
    }

    let base_url = shop.primary_domain_url.as_str();

    blocks.push("## Store Policies\n".to_string());
    blocks.push(link_list(base_url, POLICY_LINKS));

    blocks.push("## Optional\n".to_string());
    blocks.push(link_list(base_url, OPTIONAL_LINKS));

    blocks.join("\n")
}

/// Shop description, or a sentence synthesized from the catalog
fn summary_line(shop: &ShopInfo, facets: &CatalogFacets<'_>) -> String {
    match shop.description() {
        Some(desc) => desc.to_string(),
        None => format!(
            "{} is an e-commerce store offering {} products across {} categories.",
            shop.name,
            facets.total_products,
            facets.product_types.len()
        ),
    }
}

fn store_information(shop: &ShopInfo) -> String {
    let mut output = String::from("**Store Information:**\n");
    output.push_str(&format!("- Domain: {}\n", shop.domain));
    output.push_str(&format!("- Primary URL: {}\n", shop.primary_domain_url));
    output.push_str(&format!("- Currency: {}\n", shop.currency_code));
    output.push_str(&format!("- Contact: {}\n", shop.email));
    output
}

fn catalog_overview(shop: &ShopInfo, facets: &CatalogFacets<'_>) -> String {
    let mut output = String::from("**Product Catalog Overview:**\n");
    output.push_str(&format!("- Total Products: {}\n", facets.total_products));
    output.push_str(&format!("- Active Products: {}\n", facets.active_products));
    output.push_str(&format!(
        "- Price Range: ${} - ${} {}\n",
        format_price(facets.price_range.min),
        format_price(facets.price_range.max),
        shop.currency_code
    ));

    if !facets.product_types.is_empty() {
        output.push_str(&format!(
            "- Product Categories: {}\n",
            facets.product_types.as_slice().join(", ")
        ));
    }

    if !facets.vendors.is_empty() {
        let vendors = facets.vendors.as_slice();
        let shown = &vendors[..vendors.len().min(MAX_VENDORS)];
        let more = if vendors.len() > MAX_VENDORS { ELLIPSIS } else { "" };
        output.push_str(&format!("- Brands/Vendors: {}{}\n", shown.join(", "), more));
    }

    output
}

fn category_listing(category: &str, members: &[&ProductRecord]) -> String {
    let mut output = String::new();

    for product in members.iter().take(MAX_PRODUCTS_PER_CATEGORY) {
        output.push_str(&product_line(product));
        output.push('\n');
    }

    if members.len() > MAX_PRODUCTS_PER_CATEGORY {
        output.push_str(&format!(
            "- *...and {} more {} products*\n",
            members.len() - MAX_PRODUCTS_PER_CATEGORY,
            category.to_lowercase()
        ));
    }

    output
}

/// Format one product as `- **{title}** ({price}): {description}`
fn product_line(product: &ProductRecord) -> String {
    let price = match product.display_price() {
        Some(price) => format!("${}", price),
        None => PRICE_VARIES.to_string(),
    };
    format!(
        "- **{}** ({}): {}",
        product.title,
        price,
        truncate_description(&product.description)
    )
}

/// Truncate to [`MAX_DESCRIPTION_CHARS`] characters plus `...`
///
/// Counts Unicode scalar values so multi-byte text is never split mid-char.
pub fn truncate_description(description: &str) -> String {
    if description.is_empty() {
        return NO_DESCRIPTION.to_string();
    }

    match description.char_indices().nth(MAX_DESCRIPTION_CHARS) {
        Some((cut, _)) => format!("{}{}", &description[..cut], ELLIPSIS),
        None => description.to_string(),
    }
}

fn link_list(base_url: &str, links: &[(&str, &str, &str)]) -> String {
    links
        .iter()
        .map(|(label, path, summary)| format!("- [{}]({}{}): {}\n", label, base_url, path, summary))
        .collect()
}
