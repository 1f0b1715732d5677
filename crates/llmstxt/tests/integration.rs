//! Integration tests for llmstxt using wiremock as a fake Admin API

use llmstxt::{
    generate_llms_txt, AdminApiConfig, AdminApiFetcher, CatalogError, CatalogFetcher,
    SnapshotFetcher,
};
use serde_json::{json, Value};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GRAPHQL_PATH: &str = "/admin/api/2024-10/graphql.json";
const TOKEN: &str = "shpat_test";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn fetcher_for(server: &MockServer) -> AdminApiFetcher {
    let config = AdminApiConfig::new("acme.myshopify.com", TOKEN)
        .endpoint(format!("{}{}", server.uri(), GRAPHQL_PATH));
    AdminApiFetcher::new(config).unwrap()
}

fn shop_body() -> Value {
    json!({
        "data": {
            "shop": {
                "name": "Acme",
                "description": null,
                "url": "https://acme.myshopify.com",
                "email": "a@acme.com",
                "myshopifyDomain": "acme.myshopify.com",
                "currencyCode": "USD",
                "primaryDomain": {"url": "https://acme.com"}
            }
        }
    })
}

fn product_node(title: &str, product_type: &str, prices: &[&str]) -> Value {
    let variants: Vec<Value> = prices
        .iter()
        .map(|p| json!({"node": {"price": p, "compareAtPrice": null}}))
        .collect();
    json!({
        "node": {
            "id": format!("gid://shopify/Product/{}", title),
            "title": title,
            "description": "",
            "handle": title.to_lowercase(),
            "productType": product_type,
            "vendor": "",
            "tags": [],
            "status": "ACTIVE",
            "totalInventory": 3,
            "variants": {"edges": variants}
        }
    })
}

fn products_body(edges: Vec<Value>) -> Value {
    json!({"data": {"products": {"edges": edges}}})
}

async fn mount_shop(server: &MockServer, body: Value) {
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("getShop"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_products(server: &MockServer, body: Value) {
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("getProducts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_fetch_and_generate() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(header("X-Shopify-Access-Token", TOKEN))
        .and(body_string_contains("getShop"))
        .respond_with(ResponseTemplate::new(200).set_body_json(shop_body()))
        .expect(1)
        .mount(&server)
        .await;

    let mut widget = product_node("Widget", "Gadgets", &["19.99"]);
    widget["node"]["description"] = json!("A".repeat(150));
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(header("X-Shopify-Access-Token", TOKEN))
        .and(body_string_contains("getProducts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(products_body(vec![widget])))
        .expect(1)
        .mount(&server)
        .await;

    let doc = generate_llms_txt(&fetcher_for(&server)).await.unwrap();

    assert!(doc
        .text
        .contains("> Acme is an e-commerce store offering 1 products across 1 categories."));
    assert!(doc.text.contains("- Domain: acme.myshopify.com\n"));
    assert!(doc.text.contains("### Gadgets\n"));
    assert!(doc
        .text
        .contains(&format!("- **Widget** ($19.99): {}...\n", "A".repeat(100))));
    assert!(doc.text.contains("- Price Range: $19.99 - $19.99 USD\n"));
    assert!(doc
        .text
        .contains("- [Shipping Policy](https://acme.com/policies/shipping-policy)"));
}

#[tokio::test]
async fn test_requests_fixed_page_sizes() {
    let server = MockServer::start().await;
    mount_shop(&server, shop_body()).await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("\"first\":50"))
        .and(body_string_contains("\"variants\":10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(products_body(vec![])))
        .expect(1)
        .mount(&server)
        .await;

    let catalog = fetcher_for(&server).fetch_catalog().await.unwrap();
    assert!(catalog.products.is_empty());
    assert_eq!(catalog.shop.primary_domain_url, "https://acme.com");
}

#[tokio::test]
async fn test_variants_flattened_in_order() {
    let server = MockServer::start().await;
    mount_shop(&server, shop_body()).await;
    mount_products(
        &server,
        products_body(vec![
            product_node("Mug", "Kitchen", &["12.00", "14.00", "9.50"]),
            product_node("Card", "", &[]),
        ]),
    )
    .await;

    let catalog = fetcher_for(&server).fetch_catalog().await.unwrap();
    assert_eq!(catalog.products.len(), 2);

    let prices: Vec<&str> = catalog.products[0]
        .variants
        .iter()
        .map(|v| v.price.as_str())
        .collect();
    assert_eq!(prices, vec!["12.00", "14.00", "9.50"]);
    assert!(catalog.products[1].variants.is_empty());

    let doc = llmstxt::generate_document(&catalog);
    assert!(doc.text.contains("- Price Range: $9.50 - $14.00 USD\n"));
    assert!(doc.text.contains("### Other\n\n- **Card** (Price varies): "));
}

#[tokio::test]
async fn test_unauthorized_is_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
        .mount(&server)
        .await;

    let err = fetcher_for(&server).fetch_catalog().await.unwrap_err();
    assert!(err.is_auth());
    assert!(err.to_string().contains("HTTP 401"));
}

#[tokio::test]
async fn test_forbidden_is_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = fetcher_for(&server).fetch_catalog().await.unwrap_err();
    assert!(matches!(err, CatalogError::Auth(_)));
}

#[tokio::test]
async fn test_server_error_is_upstream() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let err = fetcher_for(&server).fetch_catalog().await.unwrap_err();
    assert!(!err.is_auth());
    assert_eq!(err.to_string(), "Upstream error: Admin API error: HTTP 502");
}

#[tokio::test]
async fn test_graphql_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{"message": "Throttled"}]
        })))
        .mount(&server)
        .await;

    let err = fetcher_for(&server).fetch_catalog().await.unwrap_err();
    assert!(matches!(err, CatalogError::GraphQl(ref msgs) if msgs == &["Throttled"]));
}

#[tokio::test]
async fn test_missing_data_is_upstream() {
    let server = MockServer::start().await;
    mount_shop(&server, json!({"data": null})).await;

    let err = fetcher_for(&server).fetch_catalog().await.unwrap_err();
    assert_eq!(err.to_string(), "Upstream error: Response is missing data");
}

#[tokio::test]
async fn test_partial_product_is_upstream() {
    let server = MockServer::start().await;
    mount_shop(&server, shop_body()).await;
    // Variant without a price
    mount_products(
        &server,
        json!({"data": {"products": {"edges": [{"node": {
            "id": "gid://shopify/Product/1",
            "title": "Broken",
            "variants": {"edges": [{"node": {"compareAtPrice": null}}]}
        }}]}}}),
    )
    .await;

    let err = fetcher_for(&server).fetch_catalog().await.unwrap_err();
    assert!(matches!(err, CatalogError::Upstream(_)));
}

#[tokio::test]
async fn test_products_without_edges_is_upstream() {
    let server = MockServer::start().await;
    mount_shop(&server, shop_body()).await;
    mount_products(&server, json!({"data": {"products": {}}})).await;

    let err = fetcher_for(&server).fetch_catalog().await.unwrap_err();
    assert!(matches!(err, CatalogError::Upstream(_)));
}

#[tokio::test]
async fn test_product_without_variants_is_upstream() {
    let server = MockServer::start().await;
    mount_shop(&server, shop_body()).await;
    let mut widget = product_node("Widget", "Gadgets", &["5.00"]);
    widget["node"]
        .as_object_mut()
        .unwrap()
        .remove("variants");
    mount_products(&server, products_body(vec![widget])).await;

    let err = fetcher_for(&server).fetch_catalog().await.unwrap_err();
    assert!(matches!(err, CatalogError::Upstream(_)));
}

#[tokio::test]
async fn test_export_then_generate_from_snapshot() {
    let server = MockServer::start().await;
    mount_shop(&server, shop_body()).await;
    mount_products(
        &server,
        products_body(vec![product_node("Widget", "Gadgets", &["5.00"])]),
    )
    .await;

    let live = fetcher_for(&server);
    let catalog = live.fetch_catalog().await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    SnapshotFetcher::write(&path, &catalog).await.unwrap();

    let from_api = generate_llms_txt(&live).await.unwrap();
    let from_snapshot = generate_llms_txt(&SnapshotFetcher::new(&path)).await.unwrap();
    assert_eq!(from_api, from_snapshot);
}

#[tokio::test]
async fn test_connect_error() {
    // Nothing listens on port 9 (discard) locally
    let config = AdminApiConfig::new("acme.myshopify.com", TOKEN)
        .endpoint("http://127.0.0.1:9/admin/api/2024-10/graphql.json");
    let fetcher = AdminApiFetcher::new(config).unwrap();

    let err = fetcher.fetch_catalog().await.unwrap_err();
    assert!(!err.is_auth());
}
