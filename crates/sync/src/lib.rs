//! Replenish Sync - Shopify inventory reconciliation and catalog export.
//!
//! # Security
//!
//! This crate holds the Shopify Admin API access token (HIGH PRIVILEGE).
//! It only issues read queries.
//!
//! # Jobs
//!
//! - [`jobs::refresh_inventory`] - quantities for the SKUs listed in the
//!   `InventoryLive` sheet, at one location
//! - [`jobs::refresh_products_export`] - the filtered, de-duplicated catalog
//!   in the `ProductsExport` sheet
//!
//! Both run to completion in one invocation; every remote call is awaited
//! before the next is made.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod export;
pub mod jobs;
pub mod location;
pub mod reconcile;
pub mod shopify;
pub mod workbook;

pub use config::{ConfigError, ShopifyConfig, SyncConfig};
pub use error::SyncError;
pub use shopify::{ShopifyClient, ShopifyError};
