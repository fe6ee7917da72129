//! Sync configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPIFY_STORE` - Shopify store domain (e.g., autospec-group.myshopify.com)
//! - `SHOPIFY_ADMIN_TOKEN` - Admin API access token (HIGH PRIVILEGE)
//!
//! ## Optional
//! - `SHOPIFY_API_VERSION` - API version (default: 2024-10)
//! - `REPLENISH_LOCATION_NAME` - Location whose stock is reconciled
//!   (default: Autospec 4x4 Penrith)
//! - `REPLENISH_WORKBOOK_DIR` - Directory holding the workbook sheets (default: workbook)
//!
//! ## Optional (retry policy)
//! - `SHOPIFY_MAX_ATTEMPTS` - Attempts per request (default: 3)
//! - `SHOPIFY_RETRY_BACKOFF_MS` - Base delay between attempts, doubled per retry (default: 0)
//! - `SHOPIFY_RETRY_TRANSIENT_ONLY` - Only retry network errors, 429 and 5xx (default: false)

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

use crate::shopify::{RetryCondition, RetryPolicy};

const DEFAULT_API_VERSION: &str = "2024-10";
const DEFAULT_LOCATION_NAME: &str = "Autospec 4x4 Penrith";
const DEFAULT_WORKBOOK_DIR: &str = "workbook";
const SHOP_DOMAIN_SUFFIX: &str = ".myshopify.com";
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "insert",
    "put-your",
    "admin api access token",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Sync job configuration.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Shopify Admin API configuration
    pub shopify: ShopifyConfig,
    /// Display name of the location whose inventory is reconciled
    pub location_name: String,
    /// Directory backing the workbook sheets
    pub workbook_dir: PathBuf,
}

/// Shopify Admin API configuration.
///
/// Implements `Debug` manually to redact the HIGH PRIVILEGE access token.
#[derive(Clone)]
pub struct ShopifyConfig {
    /// Shopify store domain without scheme (e.g., autospec-group.myshopify.com)
    pub store: String,
    /// Shopify API version (e.g., 2024-10)
    pub api_version: String,
    /// Admin API access token (HIGH PRIVILEGE - full store access)
    pub access_token: SecretString,
    /// Retry policy applied to every request
    pub retry: RetryPolicy,
}

impl std::fmt::Debug for ShopifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyConfig")
            .field("store", &self.store)
            .field("api_version", &self.api_version)
            .field("access_token", &"[REDACTED]")
            .field("retry", &self.retry)
            .finish()
    }
}

impl SyncConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or a value
    /// is malformed. No network call is made.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let shopify = ShopifyConfig::from_lookup(&lookup)?;
        let location_name =
            get_or_default(&lookup, "REPLENISH_LOCATION_NAME", DEFAULT_LOCATION_NAME);
        let workbook_dir = get_or_default(&lookup, "REPLENISH_WORKBOOK_DIR", DEFAULT_WORKBOOK_DIR);

        Ok(Self {
            shopify,
            location_name: location_name.trim().to_string(),
            workbook_dir: PathBuf::from(workbook_dir),
        })
    }
}

impl ShopifyConfig {
    /// Build a validated configuration from explicit values.
    ///
    /// The store may carry a scheme (`https://`), which is stripped.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the store is not a
    /// `*.myshopify.com` domain or the token is blank.
    pub fn new(store: &str, api_version: &str, access_token: &str) -> Result<Self, ConfigError> {
        let store = parse_store_domain(store)?;

        let access_token = access_token.trim();
        if access_token.is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "SHOPIFY_ADMIN_TOKEN".to_string(),
                "Admin API access token is empty".to_string(),
            ));
        }

        let api_version = match api_version.trim() {
            "" => DEFAULT_API_VERSION,
            version => version,
        };

        Ok(Self {
            store,
            api_version: api_version.to_string(),
            access_token: SecretString::from(access_token.to_string()),
            retry: RetryPolicy::default(),
        })
    }

    fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store = get_required(lookup, "SHOPIFY_STORE")?;
        let token = get_required(lookup, "SHOPIFY_ADMIN_TOKEN")?;
        let api_version = get_or_default(lookup, "SHOPIFY_API_VERSION", DEFAULT_API_VERSION);

        if let Err(e) = validate_secret_strength(token.trim(), "SHOPIFY_ADMIN_TOKEN") {
            tracing::warn!("SHOPIFY_ADMIN_TOKEN validation warning: {e}");
        }

        let mut config = Self::new(&store, &api_version, &token)?;
        config.retry = retry_policy_from_lookup(lookup)?;
        Ok(config)
    }

    /// The GraphQL endpoint for this store and API version.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!(
            "https://{}/admin/api/{}/graphql.json",
            self.store, self.api_version
        )
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Strip an optional scheme and validate the `*.myshopify.com` domain.
fn parse_store_domain(raw: &str) -> Result<String, ConfigError> {
    let raw = raw.trim();
    let host = raw.split_once("://").map_or(raw, |(_, rest)| rest);
    let host = host.trim_end_matches('/');

    if host.is_empty() || !host.ends_with(SHOP_DOMAIN_SUFFIX) || host.contains('/') {
        return Err(ConfigError::InvalidEnvVar(
            "SHOPIFY_STORE".to_string(),
            format!("must look like 'autospec-group.myshopify.com' (no https://). Got: {raw}"),
        ));
    }

    Ok(host.to_string())
}

fn retry_policy_from_lookup<F>(lookup: &F) -> Result<RetryPolicy, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = RetryPolicy::default();

    let max_attempts = match lookup("SHOPIFY_MAX_ATTEMPTS") {
        Some(value) => parse_env::<u32>("SHOPIFY_MAX_ATTEMPTS", &value)?,
        None => defaults.max_attempts,
    };
    if max_attempts == 0 {
        return Err(ConfigError::InvalidEnvVar(
            "SHOPIFY_MAX_ATTEMPTS".to_string(),
            "must be at least 1".to_string(),
        ));
    }

    let base_delay = match lookup("SHOPIFY_RETRY_BACKOFF_MS") {
        Some(value) => Duration::from_millis(parse_env("SHOPIFY_RETRY_BACKOFF_MS", &value)?),
        None => defaults.base_delay,
    };

    let transient_only = match lookup("SHOPIFY_RETRY_TRANSIENT_ONLY") {
        Some(value) => parse_env::<bool>("SHOPIFY_RETRY_TRANSIENT_ONLY", &value)?,
        None => false,
    };

    Ok(RetryPolicy {
        max_attempts,
        base_delay,
        max_delay: MAX_RETRY_DELAY,
        condition: if transient_only {
            RetryCondition::TransientOnly
        } else {
            RetryCondition::Always
        },
    })
}

fn parse_env<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Get a required variable.
fn get_required<F>(lookup: &F, key: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a variable with a default value.
fn get_or_default<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| default.to_string())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Check that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InvalidEnvVar(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
            ),
        ));
    }

    Ok(())
}
