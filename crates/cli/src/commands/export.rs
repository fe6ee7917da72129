//! `replenish export`

use replenish_sync::export::{ExportFilters, SupplierRule};
use replenish_sync::jobs;
use replenish_sync::workbook::CsvWorkbook;
use replenish_sync::{ShopifyClient, SyncConfig, SyncError};

/// Rewrite the `ProductsExport` sheet.
///
/// # Errors
///
/// Returns an error if the client cannot be built or the job fails.
pub async fn run(config: &SyncConfig) -> Result<(), SyncError> {
    let client = ShopifyClient::new(&config.shopify)?;
    let mut workbook = CsvWorkbook::new(&config.workbook_dir);

    let rows = jobs::refresh_products_export(
        &client,
        &mut workbook,
        &ExportFilters::default(),
        &SupplierRule::default(),
    )
    .await?;

    tracing::info!(rows, sheet = jobs::EXPORT_SHEET, "Products export complete");
    Ok(())
}
