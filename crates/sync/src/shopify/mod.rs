//! Shopify Admin API client (HIGH PRIVILEGE).
//!
//! # Security
//!
//! **This module holds the Admin API access token.** The token grants access
//! to products, variants, inventory and locations; it is never logged.
//!
//! # Architecture
//!
//! - GraphQL queries are plain strings sent through reqwest, wrapped in the
//!   `graphql_client` request envelope
//! - Each query's response has an explicit serde type in [`types`], converted
//!   once into the domain types of `replenish_core`
//! - Transport failures are retried according to a [`RetryPolicy`]; GraphQL
//!   errors are never retried
//! - Read-only: no mutations are issued
//!
//! # Example
//!
//! ```rust,ignore
//! use replenish_sync::shopify::ShopifyClient;
//!
//! let client = ShopifyClient::new(&config.shopify)?;
//!
//! let locations = client.get_locations().await?;
//! let page = client.get_catalog_page(&search, None).await?;
//! ```

mod client;
mod conversions;
mod inventory;
mod locations;
mod products;
pub mod queries;
mod retry;
pub mod types;

pub use client::ShopifyClient;
pub use retry::{RetryCondition, RetryPolicy};

use thiserror::Error;

/// Maximum number of body characters kept in status and content-type errors.
const ERROR_BODY_PREVIEW: usize = 400;

/// Maximum number of body characters kept in JSON parse errors.
const PARSE_BODY_PREVIEW: usize = 200;

/// Errors that can occur when interacting with Shopify Admin API.
///
/// `Http`, `Status`, `NotJson` and `Parse` are transport failures and may be
/// retried. `GraphQL`, `MissingData` and `MissingCursor` are remote failures
/// and never are.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response status was not 200.
    #[error("Shopify GraphQL HTTP {status}; Content-Type={content_type}; Body[0..400]= {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response content type.
        content_type: String,
        /// Truncated response body.
        body: String,
    },

    /// Response was not JSON.
    #[error("Expected JSON but got Content-Type={content_type}; Body[0..400]= {body}")]
    NotJson {
        /// Response content type.
        content_type: String,
        /// Truncated response body.
        body: String,
    },

    /// Response claimed to be JSON but did not decode.
    #[error("JSON parse error: {source}; Body[0..200]= {body}")]
    Parse {
        /// Decoder error.
        source: serde_json::Error,
        /// Truncated response body.
        body: String,
    },

    /// GraphQL query returned errors.
    #[error("Shopify GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// Response had neither data nor errors.
    #[error("No data in Shopify GraphQL response")]
    MissingData,

    /// A connection page reported more results but no cursor to fetch them.
    #[error("Shopify page {page} reported more results without an end cursor")]
    MissingCursor {
        /// One-based page number.
        page: usize,
    },
}

impl ShopifyError {
    /// Whether this is a transport failure (as opposed to a remote error).
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Status { .. } | Self::NotJson { .. } | Self::Parse { .. }
        )
    }

    /// Whether the failure is likely to succeed on retry: network errors,
    /// rate limiting (429) and server errors (5xx).
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::Status { status, .. } => *status == 429 || (500..600).contains(status),
            _ => false,
        }
    }
}

/// A GraphQL error returned by the Shopify Admin API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    errors
        .iter()
        .map(|e| e.message.clone())
        .collect::<Vec<_>>()
        .join("; ")
}

/// First `max` characters of a response body.
fn preview(body: &str, max: usize) -> String {
    body.chars().take(max).collect()
}
