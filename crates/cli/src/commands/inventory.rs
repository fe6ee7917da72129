//! `replenish inventory`

use replenish_sync::jobs::{self, InventoryRefreshOutcome};
use replenish_sync::workbook::CsvWorkbook;
use replenish_sync::{ShopifyClient, SyncConfig, SyncError};

/// Refresh the `InventoryLive` sheet.
///
/// # Errors
///
/// Returns an error if the client cannot be built or the job fails.
pub async fn run(config: &SyncConfig) -> Result<(), SyncError> {
    let client = ShopifyClient::new(&config.shopify)?;
    let mut workbook = CsvWorkbook::new(&config.workbook_dir);

    tracing::info!(
        location = %config.location_name,
        workbook = %config.workbook_dir.display(),
        "Refreshing inventory"
    );

    match jobs::refresh_inventory(&client, &mut workbook, &config.location_name).await? {
        InventoryRefreshOutcome::NoSkus => {
            tracing::warn!("No SKUs in {}!A", jobs::INVENTORY_SHEET);
        }
        InventoryRefreshOutcome::NoValidSkus => {
            tracing::warn!("No valid SKUs in {}!A", jobs::INVENTORY_SHEET);
        }
        InventoryRefreshOutcome::Refreshed(summary) => {
            tracing::info!(
                rows = summary.rows,
                unique_skus = summary.unique_skus,
                hits = summary.hits,
                not_found = summary.misses.len(),
                "Inventory refresh complete"
            );
        }
    }

    Ok(())
}
