//! Job-level error type.

use thiserror::Error;

use crate::config::ConfigError;
use crate::shopify::ShopifyError;
use crate::workbook::SheetError;

/// Errors that abort a sync job.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Shopify(#[from] ShopifyError),

    #[error(transparent)]
    Sheet(#[from] SheetError),

    #[error("Location '{name}' not found. Available: {}", .available.join(", "))]
    LocationNotFound { name: String, available: Vec<String> },

    #[error("Missing sheet: {0}")]
    MissingSheet(String),
}
