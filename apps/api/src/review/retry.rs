//! Retry policy for the code review call.
//!
//! Kept separate from the reviewer so the classify/decide rules can be tested
//! without a model in the loop.

use std::time::Duration;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(2);

/// What went wrong on a single attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The model answered, but not with a JSON object.
    Unparseable,
    /// Provider said 429 or mentioned quota.
    RateLimited,
    /// Provider rejected the API key. Retrying cannot help.
    InvalidCredentials,
    /// Any other provider or transport error.
    Transient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    RetryAfter(Duration),
    GiveUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Classifies a provider error message. Rate limiting is checked before credentials.
    pub fn classify(message: &str) -> ErrorClass {
        let lower = message.to_lowercase();
        if lower.contains("429") || lower.contains("quota") {
            ErrorClass::RateLimited
        } else if lower.contains("api_key") {
            ErrorClass::InvalidCredentials
        } else {
            ErrorClass::Transient
        }
    }

    /// Decides what to do after `attempt` (1-based) failed with `class`.
    pub fn decide(&self, class: ErrorClass, attempt: u32) -> RetryDecision {
        if class == ErrorClass::InvalidCredentials || attempt >= self.max_attempts {
            return RetryDecision::GiveUp;
        }
        match class {
            ErrorClass::RateLimited => RetryDecision::RetryAfter(self.base_delay * attempt * 2),
            _ => RetryDecision::RetryAfter(self.base_delay),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_rate_limit_by_status_or_quota() {
        assert_eq!(
            RetryPolicy::classify("API error (status 429): Too Many Requests"),
            ErrorClass::RateLimited
        );
        assert_eq!(
            RetryPolicy::classify("Resource exhausted: check QUOTA"),
            ErrorClass::RateLimited
        );
    }

    #[test]
    fn test_classify_api_key_case_insensitive() {
        assert_eq!(
            RetryPolicy::classify("API key not valid. [API_KEY_INVALID]"),
            ErrorClass::InvalidCredentials
        );
        assert_eq!(
            RetryPolicy::classify("missing api_key"),
            ErrorClass::InvalidCredentials
        );
    }

    #[test]
    fn test_classify_rate_limit_wins_over_credentials() {
        assert_eq!(
            RetryPolicy::classify("429 for api_key abc"),
            ErrorClass::RateLimited
        );
    }

    #[test]
    fn test_classify_other_is_transient() {
        assert_eq!(
            RetryPolicy::classify("HTTP error: connection reset"),
            ErrorClass::Transient
        );
    }

    #[test]
    fn test_fixed_delay_for_unparseable_and_transient() {
        let policy = RetryPolicy::default();
        for class in [ErrorClass::Unparseable, ErrorClass::Transient] {
            assert_eq!(
                policy.decide(class, 1),
                RetryDecision::RetryAfter(Duration::from_secs(2))
            );
            assert_eq!(
                policy.decide(class, 2),
                RetryDecision::RetryAfter(Duration::from_secs(2))
            );
            assert_eq!(policy.decide(class, 3), RetryDecision::GiveUp);
        }
    }

    #[test]
    fn test_rate_limit_backoff_grows_with_attempt() {
        let policy = RetryPolicy::default();
        assert_eq!(
            policy.decide(ErrorClass::RateLimited, 1),
            RetryDecision::RetryAfter(Duration::from_secs(4))
        );
        assert_eq!(
            policy.decide(ErrorClass::RateLimited, 2),
            RetryDecision::RetryAfter(Duration::from_secs(8))
        );
        assert_eq!(policy.decide(ErrorClass::RateLimited, 3), RetryDecision::GiveUp);
    }

    #[test]
    fn test_invalid_credentials_never_retries() {
        let policy = RetryPolicy::default();
        assert_eq!(
            policy.decide(ErrorClass::InvalidCredentials, 1),
            RetryDecision::GiveUp
        );
    }

    #[test]
    fn test_custom_policy_scales_delay() {
        let policy = RetryPolicy {
            max_attempts: 5,
            base_delay: Duration::from_millis(100),
        };
        assert_eq!(
            policy.decide(ErrorClass::RateLimited, 4),
            RetryDecision::RetryAfter(Duration::from_millis(800))
        );
        assert_eq!(policy.decide(ErrorClass::Transient, 5), RetryDecision::GiveUp);
    }
}
