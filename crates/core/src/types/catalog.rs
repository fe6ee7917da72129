//! Catalog export domain types.

use serde::{Deserialize, Serialize};

use super::id::{ProductId, VariantId};

/// Number of `(name, value)` option pairs flattened into each export row.
pub const MAX_FLATTENED_OPTIONS: usize = 3;

/// Header row of the products export sheet.
///
/// Column 9 is an intentionally blank spacer.
pub const EXPORT_HEADERS: [&str; 21] = [
    "ProductID",
    "ProductTitle",
    "Vendor",
    "ProductType",
    "Status",
    "PublishedOnline",
    "UpdatedAt",
    "Handle",
    "",
    "Option1Name",
    "Option1Value",
    "Option2Name",
    "Option2Value",
    "Option3Name",
    "Option3Value",
    "VariantID",
    "VariantTitle",
    "VariantSKU",
    "Supplier",
    "RRP",
    "Cost",
];

/// A product option selected by a variant (e.g. `Colour = Black`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    /// Option name.
    pub name: String,
    /// Option value.
    pub value: String,
}

/// A product variant as needed by the export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogVariant {
    /// Variant ID.
    pub id: VariantId,
    /// Variant title.
    pub title: String,
    /// SKU code, trimmed. Empty when the variant has none.
    pub sku: String,
    /// Variant price as a decimal string.
    pub price: Option<String>,
    /// Inventory item unit cost as a decimal string.
    pub unit_cost: Option<String>,
    /// Selected options, in product option order.
    pub selected_options: Vec<SelectedOption>,
}

/// A product as returned by one page of the catalog query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Product ID.
    pub id: ProductId,
    /// Product title.
    pub title: String,
    /// Vendor name.
    pub vendor: String,
    /// Product type.
    pub product_type: String,
    /// Product status as reported by the API (e.g. `ACTIVE`).
    pub status: String,
    /// Whether the product is published on the current publication.
    pub published: bool,
    /// Last update timestamp (ISO 8601).
    pub updated_at: String,
    /// URL handle.
    pub handle: String,
    /// Product tags.
    pub tags: Vec<String>,
    /// Lowest variant price as a decimal string.
    pub min_variant_price: Option<String>,
    /// Product variants.
    pub variants: Vec<CatalogVariant>,
}

/// One flattened `(product, variant)` row of the products export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    pub product_id: ProductId,
    pub product_title: String,
    pub vendor: String,
    pub product_type: String,
    pub status: String,
    pub published: bool,
    pub updated_at: String,
    pub handle: String,
    /// Up to three option pairs; missing options are empty strings.
    pub options: [SelectedOption; MAX_FLATTENED_OPTIONS],
    pub variant_id: VariantId,
    pub variant_title: String,
    pub sku: String,
    pub supplier: String,
    pub rrp: String,
    pub cost: String,
}

impl ExportRow {
    /// Render the row as sheet cells, aligned with [`EXPORT_HEADERS`].
    #[must_use]
    pub fn to_record(&self) -> Vec<String> {
        let mut record = Vec::with_capacity(EXPORT_HEADERS.len());
        record.extend([
            self.product_id.to_string(),
            self.product_title.clone(),
            self.vendor.clone(),
            self.product_type.clone(),
            self.status.clone(),
            if self.published { "Y" } else { "N" }.to_string(),
            self.updated_at.clone(),
            self.handle.clone(),
            String::new(),
        ]);
        for option in &self.options {
            record.push(option.name.clone());
            record.push(option.value.clone());
        }
        record.extend([
            self.variant_id.to_string(),
            self.variant_title.clone(),
            self.sku.clone(),
            self.supplier.clone(),
            self.rrp.clone(),
            self.cost.clone(),
        ]);
        record
    }
}
