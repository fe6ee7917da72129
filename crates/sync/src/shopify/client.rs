//! Shopify Admin API GraphQL client.
//!
//! Authenticates with a static Admin API access token and retries transport
//! failures according to the configured [`RetryPolicy`].

use std::sync::Arc;
use std::time::Duration;

use graphql_client::QueryBody;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, de::DeserializeOwned};
use tracing::instrument;

use crate::config::ShopifyConfig;

use super::types::GraphQLResponse;
use super::{
    ERROR_BODY_PREVIEW, GraphQLError, GraphQLErrorLocation, PARSE_BODY_PREVIEW, RetryPolicy,
    ShopifyError, preview,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Shopify Admin API GraphQL client.
///
/// Cheap to clone; clones share the underlying connection pool.
///
/// # Security
///
/// This client holds the Admin API access token which has HIGH PRIVILEGE
/// access to the store.
#[derive(Clone)]
pub struct ShopifyClient {
    inner: Arc<ShopifyClientInner>,
}

struct ShopifyClientInner {
    client: reqwest::Client,
    endpoint: String,
    access_token: SecretString,
    retry: RetryPolicy,
}

impl ShopifyClient {
    /// Create a new Admin API client for the configured store.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::Http` if the HTTP client cannot be built.
    pub fn new(config: &ShopifyConfig) -> Result<Self, ShopifyError> {
        Self::with_endpoint(config, config.endpoint())
    }

    /// Create a client that posts to `endpoint` instead of the store's
    /// Admin API URL (mock servers, proxies).
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::Http` if the HTTP client cannot be built.
    pub fn with_endpoint(
        config: &ShopifyConfig,
        endpoint: impl Into<String>,
    ) -> Result<Self, ShopifyError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            inner: Arc::new(ShopifyClientInner {
                client,
                endpoint: endpoint.into(),
                access_token: config.access_token.clone(),
                retry: config.retry.clone(),
            }),
        })
    }

    /// Get the GraphQL endpoint this client posts to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    /// Get the retry policy.
    #[must_use]
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.inner.retry
    }

    // =========================================================================
    // GraphQL Execution
    // =========================================================================

    /// Execute a GraphQL query, retrying transport failures.
    ///
    /// Attempts run strictly one after another. GraphQL errors end the call
    /// immediately.
    ///
    /// # Errors
    ///
    /// Returns the last attempt's error once the retry policy gives up, or
    /// `ShopifyError::GraphQL` as soon as the response carries errors.
    #[instrument(skip(self, operation_name, query, variables), fields(operation = %operation_name))]
    pub async fn execute<V, T>(
        &self,
        operation_name: &'static str,
        query: &'static str,
        variables: V,
    ) -> Result<T, ShopifyError>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        let body = QueryBody {
            variables,
            query,
            operation_name,
        };

        let mut attempt = 1;
        loop {
            match self.execute_once(&body).await {
                Ok(data) => return Ok(data),
                Err(e) if self.inner.retry.should_retry(&e, attempt) => {
                    let delay = self.inner.retry.delay_after(attempt);
                    tracing::warn!(
                        attempt,
                        max_attempts = self.inner.retry.attempts(),
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %e,
                        "Shopify request failed, retrying"
                    );
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Send one request and decode its response.
    async fn execute_once<V, T>(&self, body: &QueryBody<V>) -> Result<T, ShopifyError>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .header("X-Shopify-Access-Token", self.inner.access_token.expose_secret())
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let text = response.text().await?;

        decode_response(status.as_u16(), &content_type, &text)
    }
}

/// Classify and decode a raw Admin API response.
pub(crate) fn decode_response<T: DeserializeOwned>(
    status: u16,
    content_type: &str,
    body: &str,
) -> Result<T, ShopifyError> {
    if status != 200 {
        return Err(ShopifyError::Status {
            status,
            content_type: content_type.to_string(),
            body: preview(body, ERROR_BODY_PREVIEW),
        });
    }

    if !content_type.to_ascii_lowercase().contains("application/json") {
        return Err(ShopifyError::NotJson {
            content_type: content_type.to_string(),
            body: preview(body, ERROR_BODY_PREVIEW),
        });
    }

    let graphql_response: GraphQLResponse<T> =
        serde_json::from_str(body).map_err(|source| ShopifyError::Parse {
            source,
            body: preview(body, PARSE_BODY_PREVIEW),
        })?;

    if let Some(errors) = graphql_response.errors
        && !errors.is_empty()
    {
        let converted_errors: Vec<GraphQLError> = errors
            .into_iter()
            .map(|e| GraphQLError {
                message: e.message,
                locations: e
                    .locations
                    .into_iter()
                    .map(|l| GraphQLErrorLocation {
                        line: l.line,
                        column: l.column,
                    })
                    .collect(),
                path: e.path,
            })
            .collect();
        return Err(ShopifyError::GraphQL(converted_errors));
    }

    graphql_response.data.ok_or(ShopifyError::MissingData)
}
