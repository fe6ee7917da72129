//! Subcommand implementations.

pub mod export;
pub mod inventory;
pub mod locations;

use replenish_sync::{ConfigError, ShopifyError, SyncError};
use thiserror::Error;

/// Errors that end a command with exit code 1.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Shopify(#[from] ShopifyError),
}
