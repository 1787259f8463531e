use std::time::Duration;

use crate::app::PanreelError;

/// How many times a detail page is tried and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    /// At least one attempt is always made.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Whether to try again after `attempt` (1-based) failed with `error`.
    pub fn should_retry(&self, attempt: u32, error: &PanreelError) -> bool {
        attempt < self.max_attempts && error.is_transient()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(5))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retries_until_budget_spent() {
        let policy = RetryPolicy::default();
        let err = PanreelError::UnexpectedStatus(503);
        assert!(policy.should_retry(1, &err));
        assert!(policy.should_retry(2, &err));
        assert!(!policy.should_retry(3, &err));
    }

    #[test]
    fn test_permanent_errors_are_not_retried() {
        let policy = RetryPolicy::default();
        assert!(!policy.should_retry(1, &PanreelError::MissingDoubanUrl));
        assert!(policy.should_retry(1, &PanreelError::PosterNotFound));
    }

    #[test]
    fn test_zero_attempts_becomes_one() {
        let policy = RetryPolicy::new(0, Duration::ZERO);
        assert_eq!(policy.max_attempts, 1);
        assert!(!policy.should_retry(1, &PanreelError::PosterNotFound));
    }
}
