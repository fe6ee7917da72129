//! The two workbook refresh jobs.
//!
//! - [`refresh_inventory`]: fills `OnHand..LastSync` for the SKUs an operator
//!   typed into column A of `InventoryLive`
//! - [`refresh_products_export`]: rewrites `ProductsExport` from the catalog

use replenish_core::{EXPORT_HEADERS, ExportRow, InventoryRecord, Sku, unique_skus};
use tracing::instrument;

use crate::error::SyncError;
use crate::export::{CatalogSource, ExportFilters, SupplierRule, export_catalog};
use crate::location::{LocationSource, list_location_names, resolve_location_id};
use crate::reconcile::{InventorySource, ReconciliationResult, reconcile};
use crate::workbook::{Row, Workbook, cell};

/// Sheet holding operator SKUs and their quantities.
pub const INVENTORY_SHEET: &str = "InventoryLive";

/// Sheet listing SKUs that came back with nothing at the location.
pub const DEBUG_SHEET: &str = "Debug_NotFound";

/// Sheet holding the catalog export.
pub const EXPORT_SHEET: &str = "ProductsExport";

/// Header of the first six columns of [`INVENTORY_SHEET`].
pub const INVENTORY_HEADERS: [&str; 6] = [
    "SKU",
    "OnHand",
    "Available",
    "Committed",
    "Inbound",
    "LastSync",
];

/// Timestamp format of the `LastSync` column.
pub const LAST_SYNC_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// What an inventory refresh did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryRefreshOutcome {
    /// The sheet has no rows below the header.
    NoSkus,
    /// Every SKU cell is blank after normalization.
    NoValidSkus,
    /// Quantities were written.
    Refreshed(InventoryRefreshSummary),
}

/// Counts of a completed inventory refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryRefreshSummary {
    /// Data rows written.
    pub rows: usize,
    /// Distinct SKUs looked up.
    pub unique_skus: usize,
    /// Distinct SKUs found at the location.
    pub hits: usize,
    /// SKUs of the rows that ended up all zero, one per row.
    pub misses: Vec<Sku>,
}

/// Refresh `InventoryLive` with quantities at `location_name`.
///
/// # Errors
///
/// Returns an error if the sheet is missing, the location does not exist, a
/// lookup fails or the workbook cannot be written.
pub async fn refresh_inventory<S, W>(
    source: &S,
    workbook: &mut W,
    location_name: &str,
) -> Result<InventoryRefreshOutcome, SyncError>
where
    S: LocationSource + InventorySource,
    W: Workbook,
{
    let timestamp = chrono::Local::now().format(LAST_SYNC_FORMAT).to_string();
    refresh_inventory_at(source, workbook, location_name, &timestamp).await
}

/// [`refresh_inventory`] with a fixed `LastSync` value.
///
/// # Errors
///
/// See [`refresh_inventory`].
#[instrument(skip(source, workbook, timestamp))]
pub async fn refresh_inventory_at<S, W>(
    source: &S,
    workbook: &mut W,
    location_name: &str,
    timestamp: &str,
) -> Result<InventoryRefreshOutcome, SyncError>
where
    S: LocationSource + InventorySource,
    W: Workbook,
{
    let mut rows = workbook
        .sheet(INVENTORY_SHEET)?
        .ok_or_else(|| SyncError::MissingSheet(INVENTORY_SHEET.to_string()))?;

    write_inventory_header(&mut rows);
    workbook.write_sheet(INVENTORY_SHEET, &rows)?;

    if rows.len() <= 1 {
        tracing::info!("No SKUs in {INVENTORY_SHEET}");
        return Ok(InventoryRefreshOutcome::NoSkus);
    }

    let skus = unique_skus(rows.iter().skip(1).map(|row| cell(row, 0)));
    if skus.is_empty() {
        tracing::info!("No valid SKUs in {INVENTORY_SHEET}");
        return Ok(InventoryRefreshOutcome::NoValidSkus);
    }

    let Some(location_id) = resolve_location_id(source, location_name).await? else {
        return Err(SyncError::LocationNotFound {
            name: location_name.to_string(),
            available: list_location_names(source).await,
        });
    };

    let found = reconcile(source, &skus, &location_id).await?;
    let misses = fill_inventory_rows(&mut rows, &found, timestamp);
    workbook.write_sheet(INVENTORY_SHEET, &rows)?;

    write_debug_sheet(workbook, location_name, &misses)?;

    let summary = InventoryRefreshSummary {
        rows: rows.len() - 1,
        unique_skus: skus.len(),
        hits: found.len(),
        misses,
    };
    tracing::info!(
        rows = summary.rows,
        unique_skus = summary.unique_skus,
        hits = summary.hits,
        misses = summary.misses.len(),
        "Refreshed inventory"
    );

    Ok(InventoryRefreshOutcome::Refreshed(summary))
}

/// Overwrite the first six header cells, keeping anything after them.
fn write_inventory_header(rows: &mut Vec<Row>) {
    if rows.is_empty() {
        rows.push(Vec::new());
    }
    if let Some(header) = rows.first_mut() {
        overwrite_columns(header, INVENTORY_HEADERS.map(String::from));
    }
}

/// Write quantities into columns B:F of every data row and return the SKUs
/// of rows left all zero.
///
/// Column A and anything past column F are left as they are. Rows with a
/// blank or unknown SKU get zeros.
fn fill_inventory_rows(
    rows: &mut [Row],
    found: &ReconciliationResult,
    timestamp: &str,
) -> Vec<Sku> {
    let mut misses = Vec::new();

    for row in rows.iter_mut().skip(1) {
        let sku = Sku::parse(cell(row, 0));
        let record = sku
            .as_ref()
            .and_then(|sku| found.get(sku))
            .copied()
            .unwrap_or(InventoryRecord::ZERO);

        let sku_cell = cell(row, 0).to_string();
        overwrite_columns(
            row,
            [
                sku_cell,
                record.on_hand.to_string(),
                record.available.to_string(),
                record.committed.to_string(),
                record.incoming.to_string(),
                timestamp.to_string(),
            ],
        );

        if let Some(sku) = sku
            && record.is_zero()
        {
            misses.push(sku);
        }
    }

    misses
}

/// Set the first six cells of `row`, padding it if shorter.
fn overwrite_columns(row: &mut Row, values: [String; 6]) {
    if row.len() < values.len() {
        row.resize(values.len(), String::new());
    }
    for (slot, value) in row.iter_mut().zip(values) {
        *slot = value;
    }
}

/// Replace the debug sheet; it only exists while there are misses.
fn write_debug_sheet<W: Workbook>(
    workbook: &mut W,
    location_name: &str,
    misses: &[Sku],
) -> Result<(), SyncError> {
    workbook.delete_sheet(DEBUG_SHEET)?;
    if misses.is_empty() {
        return Ok(());
    }

    let mut rows = Vec::with_capacity(misses.len() + 1);
    rows.push(vec![format!("SKU not returned at location: {location_name}")]);
    rows.extend(misses.iter().map(|sku| vec![sku.to_string()]));
    workbook.write_sheet(DEBUG_SHEET, &rows)?;

    tracing::warn!(misses = misses.len(), "SKUs not returned at location");
    Ok(())
}

/// Rewrite `ProductsExport` from the catalog and return the number of rows.
///
/// Nothing is written unless every page was fetched.
///
/// # Errors
///
/// Returns an error if a catalog page fails or the workbook cannot be written.
#[instrument(skip_all)]
pub async fn refresh_products_export<S, W>(
    source: &S,
    workbook: &mut W,
    filters: &ExportFilters,
    supplier_rule: &SupplierRule,
) -> Result<usize, SyncError>
where
    S: CatalogSource,
    W: Workbook,
{
    let export = export_catalog(source, filters, supplier_rule).await?;

    let mut rows: Vec<Row> = Vec::with_capacity(export.len() + 1);
    rows.push(EXPORT_HEADERS.iter().map(|h| (*h).to_string()).collect());
    rows.extend(export.iter().map(ExportRow::to_record));
    workbook.write_sheet(EXPORT_SHEET, &rows)?;

    tracing::info!(rows = export.len(), "Refreshed products export");
    Ok(export.len())
}
