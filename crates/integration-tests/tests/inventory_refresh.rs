//! End-to-end tests for the `InventoryLive` refresh.

#![allow(clippy::unwrap_used)]

use std::fs;

use replenish_integration_tests::{
    client_for, graphql_data, graphql_request, level, mount_locations,
};
use replenish_sync::jobs::{self, DEBUG_SHEET, INVENTORY_SHEET, InventoryRefreshOutcome};
use replenish_sync::shopify::RetryPolicy;
use replenish_sync::workbook::{CsvWorkbook, Workbook};
use replenish_sync::SyncError;
use serde_json::json;
use tempfile::TempDir;
use wiremock::MockServer;
use wiremock::matchers::body_partial_json;

const PENRITH: &str = "Autospec 4x4 Penrith";

fn workbook_with(csv: &str) -> (TempDir, CsvWorkbook) {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(format!("{INVENTORY_SHEET}.csv")), csv).unwrap();
    let workbook = CsvWorkbook::new(dir.path());
    (dir, workbook)
}

async fn mount_primary(server: &MockServer, search: &str, edges: serde_json::Value) {
    graphql_request("InventoryItemsBySku")
        .and(body_partial_json(json!({
            "variables": { "q": search, "loc": "gid://shopify/Location/2" }
        })))
        .respond_with(graphql_data(json!({
            "inventoryItems": { "pageInfo": { "hasNextPage": false }, "edges": edges }
        })))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_fallback(server: &MockServer, search: &str, edges: serde_json::Value) {
    graphql_request("ProductVariantsBySku")
        .and(body_partial_json(json!({
            "variables": { "q": search, "loc": "gid://shopify/Location/2" }
        })))
        .respond_with(graphql_data(json!({
            "productVariants": { "pageInfo": { "hasNextPage": false }, "edges": edges }
        })))
        .expect(1)
        .mount(server)
        .await;
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn test_fallback_pass_fills_primary_miss() {
    let server = MockServer::start().await;
    mount_locations(&server).await;
    mount_primary(
        &server,
        r#"sku:("AS-1" OR "AS-2")"#,
        json!([{ "node": { "sku": "AS-1", "inventoryLevel": level(5, 4, 1, 0) } }]),
    )
    .await;
    mount_fallback(
        &server,
        "sku:'AS-2'",
        json!([{
            "node": {
                "sku": "AS-2 ",
                "inventoryItem": { "inventoryLevel": level(0, 2, 1, 6) }
            }
        }]),
    )
    .await;

    let client = client_for(&server, RetryPolicy::default());
    let (_dir, mut workbook) = workbook_with("SKU\nAS-1\nAS-2\n");

    let outcome = jobs::refresh_inventory(&client, &mut workbook, PENRITH)
        .await
        .unwrap();

    let rows = workbook.sheet(INVENTORY_SHEET).unwrap().unwrap();
    assert_eq!(
        rows[0],
        ["SKU", "OnHand", "Available", "Committed", "Inbound", "LastSync"]
    );
    assert_eq!(rows[1][..5], ["AS-1", "5", "4", "1", "0"]);
    assert_eq!(rows[2][..5], ["AS-2", "3", "2", "1", "6"]);
    assert!(!rows[1][5].is_empty());
    assert_eq!(rows[1][5], rows[2][5]);

    assert!(workbook.sheet(DEBUG_SHEET).unwrap().is_none());

    let InventoryRefreshOutcome::Refreshed(summary) = outcome else {
        panic!("expected a refresh, got {outcome:?}");
    };
    assert_eq!(summary.hits, 2);
    assert!(summary.misses.is_empty());
}

#[tokio::test]
async fn test_ghost_sku_zeroed_and_listed() {
    let server = MockServer::start().await;
    mount_locations(&server).await;
    mount_primary(
        &server,
        r#"sku:("AS-1" OR "GHOST")"#,
        json!([{ "node": { "sku": "AS-1", "inventoryLevel": level(5, 4, 1, 0) } }]),
    )
    .await;
    mount_fallback(&server, "sku:'GHOST'", json!([])).await;

    let client = client_for(&server, RetryPolicy::default());
    let (dir, mut workbook) = workbook_with("SKU,OnHand\nAS-1,old\nGHOST,old\n");

    jobs::refresh_inventory(&client, &mut workbook, PENRITH)
        .await
        .unwrap();

    let rows = workbook.sheet(INVENTORY_SHEET).unwrap().unwrap();
    assert_eq!(rows[2][..5], ["GHOST", "0", "0", "0", "0"]);

    let debug = fs::read_to_string(dir.path().join(format!("{DEBUG_SHEET}.csv"))).unwrap();
    assert_eq!(
        debug.lines().collect::<Vec<_>>(),
        ["SKU not returned at location: Autospec 4x4 Penrith", "GHOST"]
    );
}

#[tokio::test]
async fn test_unknown_location_aborts_before_lookups() {
    let server = MockServer::start().await;
    mount_locations(&server).await;
    graphql_request("InventoryItemsBySku")
        .respond_with(graphql_data(json!({ "inventoryItems": { "edges": [] } })))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server, RetryPolicy::default());
    let (_dir, mut workbook) = workbook_with("SKU\nAS-1\n");

    let err = jobs::refresh_inventory(&client, &mut workbook, "Brisbane")
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::LocationNotFound { .. }));
    assert_eq!(
        err.to_string(),
        "Location 'Brisbane' not found. Available: Warehouse, Autospec 4x4 Penrith"
    );
}

#[tokio::test]
async fn test_failed_lookup_leaves_quantities_untouched() {
    let server = MockServer::start().await;
    mount_locations(&server).await;
    graphql_request("InventoryItemsBySku")
        .respond_with(wiremock::ResponseTemplate::new(502).set_body_string("bad gateway"))
        .expect(3)
        .mount(&server)
        .await;

    let client = client_for(&server, RetryPolicy::default());
    let (_dir, mut workbook) = workbook_with("SKU,OnHand\nAS-1,7\n");

    let err = jobs::refresh_inventory(&client, &mut workbook, PENRITH)
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::Shopify(_)));

    let rows = workbook.sheet(INVENTORY_SHEET).unwrap().unwrap();
    assert_eq!(rows[1], ["AS-1", "7"]);
}
