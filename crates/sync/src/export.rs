//! Catalog export: paginate products, filter, flatten variants into rows.

use std::cmp::Ordering;
use std::collections::HashSet;

use icu_collator::options::CollatorOptions;
use icu_collator::{Collator, CollatorBorrowed, CollatorPreferences};
use replenish_core::{
    CatalogEntry, CatalogVariant, ExportRow, MAX_FLATTENED_OPTIONS, SelectedOption,
};
use tracing::instrument;

use crate::shopify::{ShopifyClient, ShopifyError};

/// One page of the catalog query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogPage {
    pub entries: Vec<CatalogEntry>,
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

/// Anything that can page through the product catalog.
#[allow(async_fn_in_trait)]
pub trait CatalogSource {
    /// The page of products matching `search` that follows `after`.
    async fn catalog_page(
        &self,
        search: &str,
        after: Option<&str>,
    ) -> Result<CatalogPage, ShopifyError>;
}

impl CatalogSource for ShopifyClient {
    async fn catalog_page(
        &self,
        search: &str,
        after: Option<&str>,
    ) -> Result<CatalogPage, ShopifyError> {
        self.get_catalog_page(search, after).await
    }
}

// =============================================================================
// Filters
// =============================================================================

/// Which products make it into the export.
///
/// A product failing any check is skipped with all of its variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFilters {
    /// Product statuses to keep, compared case-insensitively.
    pub allowed_statuses: Vec<String>,
    /// Exact vendor name.
    pub vendor: String,
    /// Case-sensitive title prefixes to drop.
    pub excluded_title_prefixes: Vec<String>,
    /// Exact product types to drop.
    pub excluded_product_types: Vec<String>,
}

impl Default for ExportFilters {
    fn default() -> Self {
        Self {
            allowed_statuses: vec!["ACTIVE".to_string(), "UNLISTED".to_string()],
            vendor: "Autospec 4x4".to_string(),
            excluded_title_prefixes: vec!["Scratch & Dent -".to_string()],
            excluded_product_types: [
                "GWM Bundle",
                "Bolt Fitting Kit",
                "Bolt",
                "Washer",
                "Nut",
                "Screw",
                "Suspension",
                "Nuts & Bolts",
                "Colour Coding",
                "Freight",
                "Nutsert",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

impl ExportFilters {
    /// Whether a product passes status, vendor, title and type checks, in
    /// that order.
    #[must_use]
    pub fn admits(&self, entry: &CatalogEntry) -> bool {
        let status = entry.status.to_uppercase();
        if !self
            .allowed_statuses
            .iter()
            .any(|allowed| allowed.to_uppercase() == status)
        {
            return false;
        }

        if entry.vendor != self.vendor {
            return false;
        }

        if self
            .excluded_title_prefixes
            .iter()
            .any(|prefix| entry.title.starts_with(prefix.as_str()))
        {
            return false;
        }

        !self.excluded_product_types.contains(&entry.product_type)
    }

    /// Server-side search narrowing the catalog to the allowed statuses and
    /// the vendor, e.g. `(status:active OR status:unlisted) vendor:'Autospec 4x4'`.
    ///
    /// The local checks in [`Self::admits`] still run on every product.
    #[must_use]
    pub fn search_query(&self) -> String {
        let statuses = self
            .allowed_statuses
            .iter()
            .map(|status| format!("status:{}", status.to_lowercase()))
            .collect::<Vec<_>>()
            .join(" OR ");
        let vendor = self.vendor.replace('\'', "\\'");

        if statuses.is_empty() {
            format!("vendor:'{vendor}'")
        } else {
            format!("({statuses}) vendor:'{vendor}'")
        }
    }
}

// =============================================================================
// Supplier
// =============================================================================

/// Derives the supplier column from product tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplierRule {
    /// `(tag, supplier)` pairs, checked in order; tags compare
    /// case-insensitively after trimming.
    pub table: Vec<(String, String)>,
    /// Use the vendor when no tag matches instead of an empty supplier.
    pub fallback_to_vendor: bool,
}

impl Default for SupplierRule {
    fn default() -> Self {
        Self {
            table: vec![("hct".to_string(), "Hangzhou Case Tools".to_string())],
            fallback_to_vendor: false,
        }
    }
}

impl SupplierRule {
    /// Supplier for a product.
    #[must_use]
    pub fn supplier_for(&self, entry: &CatalogEntry) -> String {
        let tags: HashSet<String> = entry
            .tags
            .iter()
            .map(|tag| tag.trim().to_lowercase())
            .filter(|tag| !tag.is_empty())
            .collect();

        self.table
            .iter()
            .find(|(tag, _)| tags.contains(&tag.trim().to_lowercase()))
            .map(|(_, supplier)| supplier.clone())
            .unwrap_or_else(|| {
                if self.fallback_to_vendor {
                    entry.vendor.clone()
                } else {
                    String::new()
                }
            })
    }
}

// =============================================================================
// Export
// =============================================================================

/// Accumulates export rows across pages.
///
/// Each SKU is emitted once for the whole export; the first variant carrying
/// it wins.
#[derive(Debug)]
pub struct CatalogExporter<'a> {
    filters: &'a ExportFilters,
    supplier_rule: &'a SupplierRule,
    seen_skus: HashSet<String>,
    rows: Vec<ExportRow>,
}

impl<'a> CatalogExporter<'a> {
    #[must_use]
    pub fn new(filters: &'a ExportFilters, supplier_rule: &'a SupplierRule) -> Self {
        Self {
            filters,
            supplier_rule,
            seen_skus: HashSet::new(),
            rows: Vec::new(),
        }
    }

    /// Flatten the admitted products of one page.
    pub fn ingest_page(&mut self, entries: &[CatalogEntry]) {
        for entry in entries {
            if !self.filters.admits(entry) {
                continue;
            }

            let supplier = self.supplier_rule.supplier_for(entry);
            for variant in &entry.variants {
                if variant.sku.is_empty() || !self.seen_skus.insert(variant.sku.clone()) {
                    continue;
                }
                self.rows.push(flatten(entry, variant, &supplier));
            }
        }
    }

    /// Rows emitted so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no row has been emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows, stably sorted by product title then SKU.
    #[must_use]
    pub fn finish(mut self) -> Vec<ExportRow> {
        let order = LocaleOrder::new();
        self.rows.sort_by(|a, b| {
            order
                .compare(&a.product_title, &b.product_title)
                .then_with(|| order.compare(&a.sku, &b.sku))
        });
        self.rows
    }
}

fn flatten(entry: &CatalogEntry, variant: &CatalogVariant, supplier: &str) -> ExportRow {
    let mut options: [SelectedOption; MAX_FLATTENED_OPTIONS] = Default::default();
    for (slot, option) in options.iter_mut().zip(&variant.selected_options) {
        slot.clone_from(option);
    }

    ExportRow {
        product_id: entry.id.clone(),
        product_title: entry.title.clone(),
        vendor: entry.vendor.clone(),
        product_type: entry.product_type.clone(),
        status: entry.status.clone(),
        published: entry.published,
        updated_at: entry.updated_at.clone(),
        handle: entry.handle.clone(),
        options,
        variant_id: variant.id.clone(),
        variant_title: variant.title.clone(),
        sku: variant.sku.clone(),
        supplier: supplier.to_string(),
        rrp: entry
            .min_variant_price
            .clone()
            .or_else(|| variant.price.clone())
            .unwrap_or_default(),
        cost: variant.unit_cost.clone().unwrap_or_default(),
    }
}

/// Root-locale (CLDR) string collation for sorting export rows.
///
/// Accents and case only break ties between otherwise equal letters, and
/// lowercase sorts before uppercase.
pub struct LocaleOrder {
    collator: Option<CollatorBorrowed<'static>>,
}

impl LocaleOrder {
    /// Load the root collation from the compiled-in data.
    #[must_use]
    pub fn new() -> Self {
        let prefs = CollatorPreferences::default();
        let collator = match Collator::try_new(prefs, CollatorOptions::default()) {
            Ok(collator) => Some(collator),
            Err(e) => {
                tracing::warn!(error = %e, "Root collation unavailable; sorting by code point");
                None
            }
        };
        Self { collator }
    }

    /// Compare two strings in root-locale order.
    #[must_use]
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        self.collator
            .as_ref()
            .map_or_else(|| a.cmp(b), |collator| collator.compare(a, b))
    }
}

impl Default for LocaleOrder {
    fn default() -> Self {
        Self::new()
    }
}

/// Page through the catalog and build the sorted export rows.
///
/// # Errors
///
/// Returns the first failed page's error, or `ShopifyError::MissingCursor`
/// when a page reports more results without a cursor. Pages fetched before
/// the failure are discarded.
#[instrument(skip_all, fields(vendor = %filters.vendor))]
pub async fn export_catalog<S: CatalogSource>(
    source: &S,
    filters: &ExportFilters,
    supplier_rule: &SupplierRule,
) -> Result<Vec<ExportRow>, ShopifyError> {
    let search = filters.search_query();
    let mut exporter = CatalogExporter::new(filters, supplier_rule);
    let mut after: Option<String> = None;
    let mut page = 0usize;

    loop {
        let CatalogPage {
            entries,
            has_next_page,
            end_cursor,
        } = source.catalog_page(&search, after.as_deref()).await?;
        page += 1;

        exporter.ingest_page(&entries);
        tracing::debug!(
            page,
            products = entries.len(),
            rows = exporter.len(),
            "Catalog page done"
        );

        if !has_next_page {
            break;
        }
        if end_cursor.is_none() {
            return Err(ShopifyError::MissingCursor { page });
        }
        after = end_cursor;
    }

    let rows = exporter.finish();
    tracing::info!(pages = page, rows = rows.len(), "Exported catalog");
    Ok(rows)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;

    use replenish_core::{ProductId, VariantId};

    use super::*;

    fn variant(sku: &str) -> CatalogVariant {
        CatalogVariant {
            id: VariantId::new(format!("gid://shopify/ProductVariant/{sku}")),
            title: "Default Title".to_string(),
            sku: sku.to_string(),
            price: Some("10.00".to_string()),
            unit_cost: None,
            selected_options: vec![],
        }
    }

    fn product(title: &str, skus: &[&str]) -> CatalogEntry {
        CatalogEntry {
            id: ProductId::new(format!("gid://shopify/Product/{title}")),
            title: title.to_string(),
            vendor: "Autospec 4x4".to_string(),
            product_type: "Bar".to_string(),
            status: "ACTIVE".to_string(),
            published: true,
            updated_at: "2024-10-01T00:00:00Z".to_string(),
            handle: title.to_lowercase(),
            tags: vec![],
            min_variant_price: None,
            variants: skus.iter().map(|sku| variant(sku)).collect(),
        }
    }

    fn export(pages: &[Vec<CatalogEntry>]) -> Vec<ExportRow> {
        let filters = ExportFilters::default();
        let rule = SupplierRule::default();
        let mut exporter = CatalogExporter::new(&filters, &rule);
        for page in pages {
            exporter.ingest_page(page);
        }
        exporter.finish()
    }

    #[test]
    fn test_draft_excluded() {
        let mut draft = product("Draft Bar", &["D-1"]);
        draft.status = "DRAFT".to_string();
        assert!(export(&[vec![draft]]).is_empty());
    }

    #[test]
    fn test_status_case_insensitive() {
        let mut unlisted = product("Unlisted Bar", &["U-1"]);
        unlisted.status = "unlisted".to_string();
        assert_eq!(export(&[vec![unlisted]]).len(), 1);
    }

    #[test]
    fn test_scratch_and_dent_excluded() {
        let entry = product("Scratch & Dent - Widget", &["SD-1"]);
        assert!(export(&[vec![entry]]).is_empty());
    }

    #[test]
    fn test_excluded_product_type() {
        let mut bolt = product("M10 Bolt", &["B-1"]);
        bolt.product_type = "Bolt".to_string();
        assert!(export(&[vec![bolt]]).is_empty());
    }

    #[test]
    fn test_other_vendor_excluded() {
        let mut other = product("Rear Bar", &["R-1"]);
        other.vendor = "Autospec".to_string();
        assert!(export(&[vec![other]]).is_empty());
    }

    #[test]
    fn test_blank_sku_skipped() {
        let rows = export(&[vec![product("Rear Bar", &["", "R-1"])]]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].sku, "R-1");
    }

    #[test]
    fn test_duplicate_sku_first_page_wins() {
        let first = product("First", &["DUP"]);
        let second = product("Second", &["DUP", "OTHER"]);

        let rows = export(&[vec![first], vec![second]]);

        assert_eq!(rows.len(), 2);
        let dup = rows.iter().find(|r| r.sku == "DUP").unwrap();
        assert_eq!(dup.product_title, "First");
    }

    #[test]
    fn test_sort_by_title_then_sku() {
        let rows = export(&[vec![
            product("B", &["S2"]),
            product("A", &["S3"]),
            product("A", &["S1"]),
        ]]);

        let order: Vec<(&str, &str)> = rows
            .iter()
            .map(|r| (r.product_title.as_str(), r.sku.as_str()))
            .collect();
        assert_eq!(order, [("A", "S1"), ("A", "S3"), ("B", "S2")]);
    }

    #[test]
    fn test_locale_order_ignores_case_and_accents_first() {
        let order = LocaleOrder::new();
        assert_eq!(order.compare("apple", "Banana"), Ordering::Less);
        assert_eq!(order.compare("Éclair", "Zebra"), Ordering::Less);
        assert_eq!(order.compare("eclair", "éclair"), Ordering::Less);
        assert_eq!(order.compare("a", "A"), Ordering::Less);
        assert_eq!(order.compare("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_accented_title_sorts_with_its_base_letter() {
        let rows = export(&[vec![
            product("Zebra Bar", &["Z-1"]),
            product("Éclair Bar", &["E-1"]),
            product("apple Bar", &["A-1"]),
        ]]);

        let titles: Vec<&str> = rows.iter().map(|r| r.product_title.as_str()).collect();
        assert_eq!(titles, ["apple Bar", "Éclair Bar", "Zebra Bar"]);
    }

    #[test]
    fn test_rrp_prefers_min_variant_price() {
        let mut entry = product("Rear Bar", &["R-1"]);
        entry.min_variant_price = Some("899.00".to_string());
        entry.variants[0].unit_cost = Some("450.00".to_string());

        let rows = export(&[vec![entry]]);
        assert_eq!(rows[0].rrp, "899.00");
        assert_eq!(rows[0].cost, "450.00");
    }

    #[test]
    fn test_rrp_falls_back_to_variant_price() {
        let rows = export(&[vec![product("Rear Bar", &["R-1"])]]);
        assert_eq!(rows[0].rrp, "10.00");
        assert_eq!(rows[0].cost, "");
    }

    #[test]
    fn test_options_padded_to_three() {
        let mut entry = product("Rear Bar", &["R-1"]);
        entry.variants[0].selected_options = vec![SelectedOption {
            name: "Colour".to_string(),
            value: "Black".to_string(),
        }];

        let rows = export(&[vec![entry]]);
        assert_eq!(rows[0].options[0].value, "Black");
        assert_eq!(rows[0].options[1], SelectedOption::default());
        assert_eq!(rows[0].options[2], SelectedOption::default());
    }

    #[test]
    fn test_supplier_from_tag() {
        let mut entry = product("Case", &["C-1"]);
        entry.tags = vec![" HCT ".to_string(), "tools".to_string()];
        assert_eq!(SupplierRule::default().supplier_for(&entry), "Hangzhou Case Tools");

        entry.tags = vec!["tools".to_string()];
        assert_eq!(SupplierRule::default().supplier_for(&entry), "");

        let rule = SupplierRule {
            fallback_to_vendor: true,
            ..SupplierRule::default()
        };
        assert_eq!(rule.supplier_for(&entry), "Autospec 4x4");
    }

    #[test]
    fn test_search_query_escapes_vendor() {
        assert_eq!(
            ExportFilters::default().search_query(),
            "(status:active OR status:unlisted) vendor:'Autospec 4x4'"
        );

        let filters = ExportFilters {
            vendor: "O'Brien".to_string(),
            ..ExportFilters::default()
        };
        assert!(filters.search_query().ends_with(r"vendor:'O\'Brien'"));
    }

    struct FakeCatalog {
        pages: Vec<CatalogPage>,
        cursors: RefCell<Vec<Option<String>>>,
    }

    impl CatalogSource for FakeCatalog {
        async fn catalog_page(
            &self,
            _search: &str,
            after: Option<&str>,
        ) -> Result<CatalogPage, ShopifyError> {
            let mut cursors = self.cursors.borrow_mut();
            cursors.push(after.map(String::from));
            self.pages
                .get(cursors.len() - 1)
                .cloned()
                .ok_or(ShopifyError::MissingData)
        }
    }

    #[tokio::test]
    async fn test_export_follows_cursors() {
        let source = FakeCatalog {
            pages: vec![
                CatalogPage {
                    entries: vec![product("B", &["S2"])],
                    has_next_page: true,
                    end_cursor: Some("c1".to_string()),
                },
                CatalogPage {
                    entries: vec![product("A", &["S1", "S2"])],
                    has_next_page: false,
                    end_cursor: Some("c2".to_string()),
                },
            ],
            cursors: RefCell::new(vec![]),
        };

        let rows = export_catalog(&source, &ExportFilters::default(), &SupplierRule::default())
            .await
            .unwrap();

        assert_eq!(
            source.cursors.borrow().as_slice(),
            [None, Some("c1".to_string())]
        );
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].sku, "S1");
        assert_eq!(rows[1].product_title, "B");
    }

    #[tokio::test]
    async fn test_export_fails_on_page_error() {
        let source = FakeCatalog {
            pages: vec![CatalogPage {
                entries: vec![product("A", &["S1"])],
                has_next_page: true,
                end_cursor: Some("c1".to_string()),
            }],
            cursors: RefCell::new(vec![]),
        };

        let result =
            export_catalog(&source, &ExportFilters::default(), &SupplierRule::default()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_export_fails_on_next_page_without_cursor() {
        let source = FakeCatalog {
            pages: vec![
                CatalogPage {
                    entries: vec![product("A", &["S1"])],
                    has_next_page: true,
                    end_cursor: None,
                },
                CatalogPage {
                    entries: vec![product("B", &["S2"])],
                    has_next_page: false,
                    end_cursor: None,
                },
            ],
            cursors: RefCell::new(vec![]),
        };

        let err = export_catalog(&source, &ExportFilters::default(), &SupplierRule::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ShopifyError::MissingCursor { page: 1 }));
        assert_eq!(source.cursors.borrow().len(), 1);
    }
}
