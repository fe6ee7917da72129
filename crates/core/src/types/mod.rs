//! Core types for replenish.
//!
//! This module provides type-safe wrappers for the inventory and catalog
//! concepts shared by both sync pipelines.

pub mod catalog;
pub mod id;
pub mod inventory;
pub mod sku;

pub use catalog::{
    CatalogEntry, CatalogVariant, EXPORT_HEADERS, ExportRow, MAX_FLATTENED_OPTIONS,
    SelectedOption,
};
pub use id::*;
pub use inventory::{InventoryRecord, ParseQuantityNameError, QuantityName};
pub use sku::{Sku, normalize_sku, unique_skus};
