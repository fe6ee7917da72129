//! GraphQL query documents and variables for the Shopify Admin API.
//!
//! Every document names its operation; the name is sent as `operationName`
//! alongside the query.

use serde::Serialize;

/// Result cap of the location and SKU lookup queries, and the catalog page size.
pub const MAX_PAGE_SIZE: i64 = 250;

// =============================================================================
// Location queries
// =============================================================================

pub const GET_LOCATIONS: &str = "GetLocations";

pub const GET_LOCATIONS_QUERY: &str = r"
query GetLocations {
  locations(first: 250) {
    edges { node { id name } }
  }
}";

// =============================================================================
// Inventory queries
// =============================================================================

pub const INVENTORY_ITEMS_BY_SKU: &str = "InventoryItemsBySku";

pub const INVENTORY_ITEMS_BY_SKU_QUERY: &str = r#"
query InventoryItemsBySku($q: String!, $loc: ID!) {
  inventoryItems(first: 250, query: $q) {
    pageInfo { hasNextPage }
    edges { node {
      sku
      inventoryLevel(locationId: $loc) {
        quantities(names: ["on_hand", "available", "committed", "incoming"]) { name quantity }
      }
    } }
  }
}"#;

pub const PRODUCT_VARIANTS_BY_SKU: &str = "ProductVariantsBySku";

pub const PRODUCT_VARIANTS_BY_SKU_QUERY: &str = r#"
query ProductVariantsBySku($q: String!, $loc: ID!) {
  productVariants(first: 250, query: $q) {
    pageInfo { hasNextPage }
    edges { node {
      sku
      inventoryItem {
        inventoryLevel(locationId: $loc) {
          quantities(names: ["on_hand", "available", "committed", "incoming"]) { name quantity }
        }
      }
    } }
  }
}"#;

/// Variables shared by both SKU lookup queries.
#[derive(Debug, Clone, Serialize)]
pub struct SkuLookupVariables<'a> {
    /// Search expression, e.g. `sku:("A" OR "B")`.
    pub q: &'a str,
    /// Location global ID.
    pub loc: &'a str,
}

// =============================================================================
// Product queries
// =============================================================================

pub const PRODUCTS_EXPORT: &str = "ProductsExport";

pub const PRODUCTS_EXPORT_QUERY: &str = r"
query ProductsExport($first: Int!, $after: String, $query: String!) {
  products(first: $first, after: $after, query: $query) {
    pageInfo { hasNextPage endCursor }
    edges {
      node {
        id
        title
        vendor
        productType
        status
        publishedOnCurrentPublication
        updatedAt
        handle
        tags
        priceRangeV2 { minVariantPrice { amount currencyCode } }
        variants(first: 250) {
          edges {
            node {
              id
              title
              sku
              price
              inventoryItem { unitCost { amount currencyCode } }
              selectedOptions { name value }
            }
          }
        }
      }
    }
  }
}";

/// Variables for one page of the catalog export.
#[derive(Debug, Clone, Serialize)]
pub struct ProductsExportVariables<'a> {
    /// Page size.
    pub first: i64,
    /// Cursor of the previous page's last product.
    pub after: Option<&'a str>,
    /// Product search expression.
    pub query: &'a str,
}
