//! Retry policy for Admin API requests.

use std::sync::Arc;
use std::time::Duration;

use super::ShopifyError;

/// Predicate deciding whether a transport failure is retried.
pub type RetryPredicate = Arc<dyn Fn(&ShopifyError) -> bool + Send + Sync>;

/// Which transport failures are retried.
///
/// Remote failures (GraphQL errors) are never retried, whatever the condition.
#[derive(Clone, Default)]
pub enum RetryCondition {
    /// Retry every transport failure without inspecting its cause.
    #[default]
    Always,
    /// Retry only network errors, 429 and 5xx responses.
    TransientOnly,
    /// Retry when the predicate returns `true`.
    Custom(RetryPredicate),
}

impl std::fmt::Debug for RetryCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Always => f.write_str("Always"),
            Self::TransientOnly => f.write_str("TransientOnly"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// How many times, how often and on what a request is retried.
///
/// The default makes 3 attempts with no delay and retries every transport
/// failure.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Values below 1 are treated as 1.
    pub max_attempts: u32,
    /// Delay before the first retry; doubled for every further retry.
    pub base_delay: Duration,
    /// Upper bound for the delay between attempts.
    pub max_delay: Duration,
    /// Which failures are retried.
    pub condition: RetryCondition,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::ZERO,
            max_delay: Duration::from_secs(30),
            condition: RetryCondition::Always,
        }
    }
}

impl RetryPolicy {
    /// A policy that makes exactly one attempt.
    #[must_use]
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Set the number of attempts.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the base and maximum backoff delay.
    #[must_use]
    pub const fn with_backoff(mut self, base_delay: Duration, max_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self.max_delay = max_delay;
        self
    }

    /// Set the retry condition.
    #[must_use]
    pub fn with_condition(mut self, condition: RetryCondition) -> Self {
        self.condition = condition;
        self
    }

    /// Total attempts, never less than one.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Whether `error`, raised by attempt number `attempt` (1-based), is retried.
    #[must_use]
    pub fn should_retry(&self, error: &ShopifyError, attempt: u32) -> bool {
        if attempt >= self.attempts() || !error.is_transport() {
            return false;
        }
        match &self.condition {
            RetryCondition::Always => true,
            RetryCondition::TransientOnly => error.is_transient(),
            RetryCondition::Custom(predicate) => predicate(error),
        }
    }

    /// Delay before the attempt following attempt number `attempt`.
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        if self.base_delay.is_zero() {
            return Duration::ZERO;
        }
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(status: u16) -> ShopifyError {
        ShopifyError::Status {
            status,
            content_type: "text/plain".to_string(),
            body: String::new(),
        }
    }

    #[test]
    fn test_default_policy_retries_blindly_three_attempts() {
        let policy = RetryPolicy::default();
        assert!(policy.should_retry(&status(404), 1));
        assert!(policy.should_retry(&status(404), 2));
        assert!(!policy.should_retry(&status(404), 3));
    }

    #[test]
    fn test_graphql_errors_never_retried() {
        let policy = RetryPolicy::default();
        let err = ShopifyError::GraphQL(vec![]);
        assert!(!policy.should_retry(&err, 1));
    }

    #[test]
    fn test_transient_only_condition() {
        let policy = RetryPolicy::default().with_condition(RetryCondition::TransientOnly);
        assert!(policy.should_retry(&status(503), 1));
        assert!(policy.should_retry(&status(429), 1));
        assert!(!policy.should_retry(&status(401), 1));
    }

    #[test]
    fn test_custom_condition() {
        let policy = RetryPolicy::default().with_condition(RetryCondition::Custom(Arc::new(
            |e| matches!(e, ShopifyError::Status { status: 520, .. }),
        )));
        assert!(policy.should_retry(&status(520), 1));
        assert!(!policy.should_retry(&status(500), 1));
    }

    #[test]
    fn test_no_retry_and_zero_attempts() {
        assert!(!RetryPolicy::no_retry().should_retry(&status(500), 1));
        let zero = RetryPolicy::default().with_max_attempts(0);
        assert_eq!(zero.attempts(), 1);
        assert!(!zero.should_retry(&status(500), 1));
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy::default()
            .with_backoff(Duration::from_millis(250), Duration::from_secs(1));
        assert_eq!(policy.delay_after(1), Duration::from_millis(250));
        assert_eq!(policy.delay_after(2), Duration::from_millis(500));
        assert_eq!(policy.delay_after(3), Duration::from_secs(1));
        assert_eq!(policy.delay_after(10), Duration::from_secs(1));
    }

    #[test]
    fn test_default_has_no_delay() {
        assert_eq!(RetryPolicy::default().delay_after(2), Duration::ZERO);
    }
}
