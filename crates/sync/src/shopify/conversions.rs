//! Type conversions from GraphQL response types to domain types.

use replenish_core::{
    CatalogEntry, CatalogVariant, InventoryRecord, LocationId, ProductId, SelectedOption,
    VariantId,
};

use crate::export::CatalogPage;
use crate::location::Location;
use crate::reconcile::{LookupBatch, SkuQuantities};

use super::types::{
    Connection, InventoryItemsData, InventoryLevelNode, LocationsData, MoneyNode, ProductNode,
    ProductVariantNode, ProductVariantsData, ProductsData,
};

// =============================================================================
// Location conversions
// =============================================================================

pub fn convert_locations(data: LocationsData) -> Vec<Location> {
    data.locations
        .map(Connection::into_nodes)
        .into_iter()
        .flatten()
        .map(|node| Location {
            id: LocationId::new(node.id),
            name: node.name.unwrap_or_default(),
        })
        .collect()
}

// =============================================================================
// Inventory conversions
// =============================================================================

pub fn convert_inventory_items(data: InventoryItemsData) -> LookupBatch {
    let Some(connection) = data.inventory_items else {
        return LookupBatch::default();
    };
    let truncated = connection.has_next_page();

    LookupBatch {
        hits: connection
            .into_nodes()
            .map(|node| sku_quantities(node.sku, node.inventory_level.as_ref()))
            .collect(),
        truncated,
    }
}

pub fn convert_product_variants(data: ProductVariantsData) -> LookupBatch {
    let Some(connection) = data.product_variants else {
        return LookupBatch::default();
    };
    let truncated = connection.has_next_page();

    LookupBatch {
        hits: connection
            .into_nodes()
            .map(|node| {
                let level = node
                    .inventory_item
                    .as_ref()
                    .and_then(|item| item.inventory_level.as_ref());
                sku_quantities(node.sku, level)
            })
            .collect(),
        truncated,
    }
}

/// Key a node's quantities by its trimmed SKU text as stored by Shopify.
fn sku_quantities(sku: Option<String>, level: Option<&InventoryLevelNode>) -> SkuQuantities {
    let quantities = level
        .and_then(|l| l.quantities.as_deref())
        .unwrap_or_default();

    SkuQuantities {
        sku: sku.as_deref().unwrap_or_default().trim().to_string(),
        record: InventoryRecord::from_quantities(
            quantities.iter().map(|q| (q.name.as_str(), q.quantity)),
        ),
    }
}

// =============================================================================
// Product conversions
// =============================================================================

pub fn convert_catalog_page(data: ProductsData) -> CatalogPage {
    let Some(connection) = data.products else {
        return CatalogPage::default();
    };
    let page_info = connection.page_info.clone().unwrap_or_default();

    CatalogPage {
        entries: connection.into_nodes().map(convert_product).collect(),
        has_next_page: page_info.has_next_page,
        end_cursor: page_info.end_cursor,
    }
}

fn convert_product(product: ProductNode) -> CatalogEntry {
    CatalogEntry {
        id: ProductId::new(product.id),
        title: product.title.unwrap_or_default(),
        vendor: product.vendor.unwrap_or_default(),
        product_type: product.product_type.unwrap_or_default(),
        status: product.status.unwrap_or_default(),
        published: product.published_on_current_publication.unwrap_or(false),
        updated_at: product.updated_at.unwrap_or_default(),
        handle: product.handle.unwrap_or_default(),
        tags: product.tags.unwrap_or_default(),
        min_variant_price: product
            .price_range_v2
            .and_then(|p| p.min_variant_price)
            .and_then(money_amount),
        variants: product
            .variants
            .map(Connection::into_nodes)
            .into_iter()
            .flatten()
            .map(convert_variant)
            .collect(),
    }
}

fn convert_variant(variant: ProductVariantNode) -> CatalogVariant {
    CatalogVariant {
        id: VariantId::new(variant.id),
        title: variant.title.unwrap_or_default(),
        sku: variant.sku.unwrap_or_default().trim().to_string(),
        price: variant.price.filter(|p| !p.is_empty()),
        unit_cost: variant
            .inventory_item
            .and_then(|item| item.unit_cost)
            .and_then(money_amount),
        selected_options: variant
            .selected_options
            .unwrap_or_default()
            .into_iter()
            .map(|o| SelectedOption {
                name: o.name.unwrap_or_default(),
                value: o.value.unwrap_or_default(),
            })
            .collect(),
    }
}

/// A money amount, treating an empty string as absent.
fn money_amount(money: MoneyNode) -> Option<String> {
    money.amount.filter(|a| !a.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_inventory_items_keyed_by_trimmed_api_sku() {
        let data: InventoryItemsData = serde_json::from_value(serde_json::json!({
            "inventoryItems": {
                "pageInfo": { "hasNextPage": false },
                "edges": [{ "node": {
                    "sku": " AS-1 ",
                    "inventoryLevel": { "quantities": [
                        { "name": "available", "quantity": 2 },
                        { "name": "committed", "quantity": 1 },
                        { "name": "incoming", "quantity": 4 }
                    ] }
                } }]
            }
        }))
        .unwrap();

        let batch = convert_inventory_items(data);
        assert!(!batch.truncated);
        assert_eq!(batch.hits.len(), 1);
        let hit = &batch.hits[0];
        assert_eq!(hit.sku, "AS-1");
        assert_eq!(
            hit.record,
            InventoryRecord {
                on_hand: 3,
                available: 2,
                committed: 1,
                incoming: 4,
            }
        );
    }

    #[test]
    fn test_variant_without_level_yields_zero_record() {
        let data: ProductVariantsData = serde_json::from_value(serde_json::json!({
            "productVariants": {
                "pageInfo": { "hasNextPage": true },
                "edges": [{
                    "node": { "sku": "AS-2", "inventoryItem": { "inventoryLevel": null } }
                }]
            }
        }))
        .unwrap();

        let batch = convert_product_variants(data);
        assert!(batch.truncated);
        assert_eq!(batch.hits[0].sku, "AS-2");
        assert!(batch.hits[0].record.is_zero());
    }

    #[test]
    fn test_locations_default_missing_name() {
        let data: LocationsData = serde_json::from_value(serde_json::json!({
            "locations": { "edges": [
                { "node": { "id": "gid://shopify/Location/1", "name": "Penrith" } },
                { "node": { "id": "gid://shopify/Location/2", "name": null } }
            ] }
        }))
        .unwrap();

        let locations = convert_locations(data);
        assert_eq!(locations.len(), 2);
        assert_eq!(locations[1].name, "");
    }

    #[test]
    fn test_catalog_page_conversion() {
        let data: ProductsData = serde_json::from_value(serde_json::json!({
            "products": {
                "pageInfo": { "hasNextPage": true, "endCursor": "cursor-1" },
                "edges": [{ "node": {
                    "id": "gid://shopify/Product/1",
                    "title": "Rear Bar",
                    "vendor": "Autospec 4x4",
                    "productType": "Bar",
                    "status": "ACTIVE",
                    "publishedOnCurrentPublication": true,
                    "updatedAt": "2024-10-01T00:00:00Z",
                    "handle": "rear-bar",
                    "tags": ["HCT"],
                    "priceRangeV2": { "minVariantPrice": { "amount": "", "currencyCode": "AUD" } },
                    "variants": { "edges": [{ "node": {
                        "id": "gid://shopify/ProductVariant/2",
                        "title": "Black",
                        "sku": " AS-RB-1",
                        "price": "1299.00",
                        "inventoryItem": { "unitCost": null },
                        "selectedOptions": [{ "name": "Colour", "value": "Black" }]
                    } }] }
                } }]
            }
        }))
        .unwrap();

        let page = convert_catalog_page(data);
        assert!(page.has_next_page);
        assert_eq!(page.end_cursor.as_deref(), Some("cursor-1"));

        let product = &page.entries[0];
        assert_eq!(product.min_variant_price, None);
        assert!(product.published);
        let variant = &product.variants[0];
        assert_eq!(variant.sku, "AS-RB-1");
        assert_eq!(variant.price.as_deref(), Some("1299.00"));
        assert_eq!(variant.unit_cost, None);
        assert_eq!(variant.selected_options[0].value, "Black");
    }
}
