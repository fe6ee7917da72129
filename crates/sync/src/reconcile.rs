//! Inventory reconciliation across the two Shopify SKU search backends.
//!
//! Inventory item search and product variant search index SKUs differently
//! and do not always agree on hits. Every SKU is first looked up through
//! inventory items in batches of [`PRIMARY_BATCH_SIZE`]; whatever that pass
//! did not find is looked up again through product variants in batches of
//! [`FALLBACK_BATCH_SIZE`]. Hits of the first pass are never replaced.
//!
//! A failed batch aborts the whole reconciliation. SKUs neither pass finds
//! are absent from the result.

use std::collections::{HashMap, HashSet};

use replenish_core::{InventoryRecord, LocationId, Sku};
use tracing::instrument;

use crate::shopify::{ShopifyClient, ShopifyError};

/// SKUs per inventory item search.
pub const PRIMARY_BATCH_SIZE: usize = 50;

/// SKUs per product variant search.
pub const FALLBACK_BATCH_SIZE: usize = 25;

/// Quantities keyed by the SKU exactly as a lookup returned it (trimmed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkuQuantities {
    pub sku: String,
    pub record: InventoryRecord,
}

/// Result of one batched lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupBatch {
    /// One entry per matched item or variant, in response order.
    pub hits: Vec<SkuQuantities>,
    /// The server had more matches than the 250 it returned.
    pub truncated: bool,
}

/// Quantities per SKU at one location.
pub type ReconciliationResult = HashMap<Sku, InventoryRecord>;

/// The two SKU lookups reconciliation is built on.
#[allow(async_fn_in_trait)]
pub trait InventorySource {
    /// Inventory item search, quantities scoped to `location_id`.
    async fn inventory_items_by_sku(
        &self,
        search: &str,
        location_id: &LocationId,
    ) -> Result<LookupBatch, ShopifyError>;

    /// Product variant search, quantities of each variant's inventory item
    /// scoped to `location_id`.
    async fn variants_by_sku(
        &self,
        search: &str,
        location_id: &LocationId,
    ) -> Result<LookupBatch, ShopifyError>;
}

impl InventorySource for ShopifyClient {
    async fn inventory_items_by_sku(
        &self,
        search: &str,
        location_id: &LocationId,
    ) -> Result<LookupBatch, ShopifyError> {
        self.get_inventory_items_by_sku(search, location_id).await
    }

    async fn variants_by_sku(
        &self,
        search: &str,
        location_id: &LocationId,
    ) -> Result<LookupBatch, ShopifyError> {
        self.get_variant_inventory_by_sku(search, location_id).await
    }
}

/// Which lookup a batch goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    Primary,
    Fallback,
}

impl Pass {
    const fn batch_size(self) -> usize {
        match self {
            Self::Primary => PRIMARY_BATCH_SIZE,
            Self::Fallback => FALLBACK_BATCH_SIZE,
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "inventory_items",
            Self::Fallback => "product_variants",
        }
    }
}

/// Inventory item search expression: `sku:("A" OR "B")`.
///
/// SKUs are quoted as JSON strings.
#[must_use]
pub fn primary_search_expression(skus: &[Sku]) -> String {
    let terms: Vec<String> = skus
        .iter()
        .map(|sku| serde_json::Value::from(sku.as_str()).to_string())
        .collect();
    format!("sku:({})", terms.join(" OR "))
}

/// Product variant search expression: `sku:'A' OR sku:'B'`.
///
/// Single quotes inside a SKU are backslash-escaped.
#[must_use]
pub fn fallback_search_expression(skus: &[Sku]) -> String {
    skus.iter()
        .map(|sku| format!("sku:'{}'", sku.as_str().replace('\'', "\\'")))
        .collect::<Vec<_>>()
        .join(" OR ")
}

/// Look up quantities for `skus` at `location_id`.
///
/// Keys of the result are always members of `skus`; matches for SKUs that
/// were not asked for are discarded. Within one pass a later match for the
/// same SKU replaces an earlier one.
///
/// # Errors
///
/// Returns the first failed lookup's error; nothing gathered so far is kept.
#[instrument(
    skip(source, skus, location_id),
    fields(skus = skus.len(), location_id = %location_id)
)]
pub async fn reconcile<S: InventorySource>(
    source: &S,
    skus: &[Sku],
    location_id: &LocationId,
) -> Result<ReconciliationResult, ShopifyError> {
    let mut seen = HashSet::new();
    let queried: Vec<Sku> = skus
        .iter()
        .filter(|sku| seen.insert(sku.as_str()))
        .cloned()
        .collect();
    let wanted: HashSet<Sku> = queried.iter().cloned().collect();

    let mut result = ReconciliationResult::new();
    run_pass(source, Pass::Primary, &queried, &wanted, location_id, &mut result).await?;
    let primary_hits = result.len();

    let missing: Vec<Sku> = queried
        .into_iter()
        .filter(|sku| !result.contains_key(sku))
        .collect();

    if !missing.is_empty() {
        run_pass(source, Pass::Fallback, &missing, &wanted, location_id, &mut result).await?;
    }

    tracing::info!(
        primary_hits,
        fallback_hits = result.len() - primary_hits,
        not_found = wanted.len() - result.len(),
        "Reconciled inventory"
    );

    Ok(result)
}

async fn run_pass<S: InventorySource>(
    source: &S,
    pass: Pass,
    skus: &[Sku],
    wanted: &HashSet<Sku>,
    location_id: &LocationId,
    result: &mut ReconciliationResult,
) -> Result<(), ShopifyError> {
    let mut found: HashMap<Sku, InventoryRecord> = HashMap::new();

    for (batch, chunk) in skus.chunks(pass.batch_size()).enumerate() {
        let lookup = match pass {
            Pass::Primary => {
                source
                    .inventory_items_by_sku(&primary_search_expression(chunk), location_id)
                    .await?
            }
            Pass::Fallback => {
                source
                    .variants_by_sku(&fallback_search_expression(chunk), location_id)
                    .await?
            }
        };

        if lookup.truncated {
            tracing::warn!(
                pass = pass.as_str(),
                batch,
                skus = chunk.len(),
                "Lookup returned more than 250 matches; only the first 250 were read"
            );
        }

        tracing::debug!(
            pass = pass.as_str(),
            batch,
            skus = chunk.len(),
            hits = lookup.hits.len(),
            "Lookup batch done"
        );

        for hit in lookup.hits {
            if let Some(sku) = wanted.get(hit.sku.as_str()) {
                found.insert(sku.clone(), hit.record.with_on_hand_fallback());
            }
        }
    }

    for (sku, record) in found {
        result.entry(sku).or_insert(record);
    }

    Ok(())
}
