//! SKU-keyed inventory lookups for the Admin API.

use tracing::instrument;

use super::{
    ShopifyClient, ShopifyError,
    conversions::{convert_inventory_items, convert_product_variants},
    queries::{
        INVENTORY_ITEMS_BY_SKU, INVENTORY_ITEMS_BY_SKU_QUERY, PRODUCT_VARIANTS_BY_SKU,
        PRODUCT_VARIANTS_BY_SKU_QUERY, SkuLookupVariables,
    },
    types::{InventoryItemsData, ProductVariantsData},
};
use replenish_core::LocationId;

use crate::reconcile::LookupBatch;

impl ShopifyClient {
    /// Search inventory items and read their quantities at a location.
    ///
    /// # Arguments
    ///
    /// * `search` - Inventory item search expression (e.g. `sku:("A" OR "B")`)
    /// * `location_id` - Location whose quantities are read
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, search, location_id), fields(location_id = %location_id))]
    pub async fn get_inventory_items_by_sku(
        &self,
        search: &str,
        location_id: &LocationId,
    ) -> Result<LookupBatch, ShopifyError> {
        let variables = SkuLookupVariables {
            q: search,
            loc: location_id.as_str(),
        };

        let data: InventoryItemsData = self
            .execute(INVENTORY_ITEMS_BY_SKU, INVENTORY_ITEMS_BY_SKU_QUERY, variables)
            .await?;

        Ok(convert_inventory_items(data))
    }

    /// Search product variants and read their inventory item's quantities at
    /// a location.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, search, location_id), fields(location_id = %location_id))]
    pub async fn get_variant_inventory_by_sku(
        &self,
        search: &str,
        location_id: &LocationId,
    ) -> Result<LookupBatch, ShopifyError> {
        let variables = SkuLookupVariables {
            q: search,
            loc: location_id.as_str(),
        };

        let data: ProductVariantsData = self
            .execute(PRODUCT_VARIANTS_BY_SKU, PRODUCT_VARIANTS_BY_SKU_QUERY, variables)
            .await?;

        Ok(convert_product_variants(data))
    }
}
