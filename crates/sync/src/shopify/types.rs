//! Response shapes of the Admin API queries in [`super::queries`].
//!
//! Nullable fields are `Option`s; lists the schema declares non-null default
//! to empty. Conversion into domain types happens once, in `conversions`.

use serde::Deserialize;

// =============================================================================
// Envelope
// =============================================================================

/// GraphQL response wrapper.
#[derive(Debug, Deserialize)]
pub(crate) struct GraphQLResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphQLErrorResponse>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQLErrorResponse {
    pub message: String,
    #[serde(default)]
    pub locations: Vec<GraphQLErrorLocationResponse>,
    #[serde(default)]
    pub path: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQLErrorLocationResponse {
    pub line: i64,
    pub column: i64,
}

// =============================================================================
// Connections
// =============================================================================

/// A relay-style connection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub edges: Vec<Edge<T>>,
    pub page_info: Option<PageInfoNode>,
}

impl<T> Connection<T> {
    /// Consume the connection, yielding its nodes in order.
    pub fn into_nodes(self) -> impl Iterator<Item = T> {
        self.edges.into_iter().map(|e| e.node)
    }

    /// Whether the server reported more results than were returned.
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        self.page_info.as_ref().is_some_and(|p| p.has_next_page)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfoNode {
    #[serde(default)]
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

// =============================================================================
// Locations
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct LocationsData {
    pub locations: Option<Connection<LocationNode>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationNode {
    pub id: String,
    pub name: Option<String>,
}

// =============================================================================
// Inventory lookups
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItemsData {
    pub inventory_items: Option<Connection<InventoryItemNode>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItemNode {
    pub sku: Option<String>,
    pub inventory_level: Option<InventoryLevelNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariantsData {
    pub product_variants: Option<Connection<VariantInventoryNode>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantInventoryNode {
    pub sku: Option<String>,
    pub inventory_item: Option<VariantInventoryItem>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantInventoryItem {
    pub inventory_level: Option<InventoryLevelNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InventoryLevelNode {
    pub quantities: Option<Vec<QuantityNode>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuantityNode {
    pub name: String,
    pub quantity: Option<i64>,
}

// =============================================================================
// Products
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ProductsData {
    pub products: Option<Connection<ProductNode>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductNode {
    pub id: String,
    pub title: Option<String>,
    pub vendor: Option<String>,
    pub product_type: Option<String>,
    pub status: Option<String>,
    pub published_on_current_publication: Option<bool>,
    pub updated_at: Option<String>,
    pub handle: Option<String>,
    pub tags: Option<Vec<String>>,
    pub price_range_v2: Option<PriceRangeNode>,
    pub variants: Option<Connection<ProductVariantNode>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRangeNode {
    pub min_variant_price: Option<MoneyNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyNode {
    pub amount: Option<String>,
    pub currency_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariantNode {
    pub id: String,
    pub title: Option<String>,
    pub sku: Option<String>,
    pub price: Option<String>,
    pub inventory_item: Option<UnitCostItem>,
    pub selected_options: Option<Vec<SelectedOptionNode>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitCostItem {
    pub unit_cost: Option<MoneyNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectedOptionNode {
    pub name: Option<String>,
    pub value: Option<String>,
}
