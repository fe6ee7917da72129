//! Replenish Core - Shared domain types.
//!
//! This crate provides the types shared by the replenish components:
//! - `sync` - Shopify Admin API client, reconciliation and export engines
//! - `cli` - Command-line trigger for the sync jobs
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. This keeps it lightweight and easy to test.
//!
//! # Modules
//!
//! - [`types`] - SKU normalization, Shopify global IDs, inventory records and
//!   catalog export rows

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
