//! Integration tests for replenish.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p replenish-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `client_retry` - Shopify client status, content type and retry handling
//! - `inventory_refresh` - `InventoryLive` refresh end to end
//! - `products_export` - `ProductsExport` pagination, filtering and de-duplication
//!
//! Every test runs against a `wiremock` server standing in for the Admin API
//! GraphQL endpoint. Requests are told apart by their `operationName`.

use replenish_sync::shopify::RetryPolicy;
use replenish_sync::{ShopifyClient, ShopifyConfig};
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockBuilder, MockServer, ResponseTemplate};

/// Access token every mocked request must carry.
pub const TEST_TOKEN: &str = "shpat_integration_test_token";

/// Path the client posts to on the mock server.
pub const GRAPHQL_PATH: &str = "/admin/api/2024-10/graphql.json";

/// A client for `server` with the given retry policy.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn client_for(server: &MockServer, retry: RetryPolicy) -> ShopifyClient {
    let mut config = ShopifyConfig::new("autospec-test.myshopify.com", "2024-10", TEST_TOKEN)
        .expect("test config is valid");
    config.retry = retry;
    ShopifyClient::with_endpoint(&config, format!("{}{GRAPHQL_PATH}", server.uri()))
        .expect("client builds")
}

/// A POST to the GraphQL endpoint for `operation`, with the access token.
#[must_use]
pub fn graphql_request(operation: &str) -> MockBuilder {
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(header("X-Shopify-Access-Token", TEST_TOKEN))
        .and(body_partial_json(json!({ "operationName": operation })))
}

/// A 200 JSON response carrying `data`.
#[must_use]
pub fn graphql_data(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "data": data }))
}

/// Mount a location list: `Warehouse` (1) and `Autospec 4x4 Penrith` (2).
pub async fn mount_locations(server: &MockServer) {
    graphql_request("GetLocations")
        .respond_with(graphql_data(json!({
            "locations": { "edges": [
                { "node": { "id": "gid://shopify/Location/1", "name": "Warehouse" } },
                { "node": { "id": "gid://shopify/Location/2", "name": "Autospec 4x4 Penrith" } }
            ] }
        })))
        .mount(server)
        .await;
}

/// An inventory level node holding the four quantities.
#[must_use]
pub fn level(on_hand: i64, available: i64, committed: i64, incoming: i64) -> Value {
    json!({ "quantities": [
        { "name": "on_hand", "quantity": on_hand },
        { "name": "available", "quantity": available },
        { "name": "committed", "quantity": committed },
        { "name": "incoming", "quantity": incoming }
    ] })
}
