//! Retry policy attached to a protected operation.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::errors::RetryError;
use crate::types::FailureKind;

/// Configuration for retrying a protected operation.
///
/// A policy declares how many total attempts are allowed, which failure
/// kinds justify a retry, and whether invoking the operation inside an
/// already-active transaction is a fatal precondition violation.
///
/// Construction is permissive: an invalid policy (zero attempts, empty kind
/// set) can be built and serialized, but is rejected by the executor before
/// the first attempt. This keeps validation at the invocation boundary,
/// where the configuration error is actually observable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total number of attempts to allow, including the first one.
    pub times: u32,
    /// Failure kinds for which retrying is considered safe.
    pub on: BTreeSet<FailureKind>,
    /// When true, an active ambient transaction fails the call immediately.
    #[serde(default = "default_fail_in_transaction")]
    pub fail_in_transaction: bool,
}

const fn default_fail_in_transaction() -> bool {
    true
}

impl RetryPolicy {
    /// Creates a policy retrying on the given failure kinds.
    ///
    /// Starts with a single attempt and `fail_in_transaction` enabled;
    /// adjust with [`with_times`](Self::with_times) and
    /// [`allow_in_transaction`](Self::allow_in_transaction).
    pub fn on_kinds<I>(kinds: I) -> Self
    where
        I: IntoIterator<Item = FailureKind>,
    {
        Self {
            times: 1,
            on: kinds.into_iter().collect(),
            fail_in_transaction: default_fail_in_transaction(),
        }
    }

    /// Sets the total number of attempts to allow.
    #[must_use]
    pub fn with_times(mut self, times: u32) -> Self {
        self.times = times;
        self
    }

    /// Permits invoking the protected operation inside an active transaction.
    #[must_use]
    pub fn allow_in_transaction(mut self) -> Self {
        self.fail_in_transaction = false;
        self
    }

    /// Checks the invocation-time preconditions on this policy.
    ///
    /// # Errors
    ///
    /// Returns [`RetryError::InvalidAttemptCount`] when `times` is zero, then
    /// [`RetryError::NoRetryableKinds`] when no retryable kind is configured.
    pub fn validate(&self) -> Result<(), RetryError> {
        if self.times == 0 {
            return Err(RetryError::InvalidAttemptCount {
                attempts: self.times,
            });
        }
        if self.on.is_empty() {
            return Err(RetryError::NoRetryableKinds);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(name: &str) -> FailureKind {
        FailureKind::try_new(name).unwrap()
    }

    #[test]
    fn defaults_match_single_attempt_guarded_policy() {
        let policy = RetryPolicy::on_kinds([kind("conflict")]);
        assert_eq!(policy.times, 1);
        assert!(policy.fail_in_transaction);
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn builder_adjusts_times_and_transaction_guard() {
        let policy = RetryPolicy::on_kinds([kind("conflict")])
            .with_times(5)
            .allow_in_transaction();
        assert_eq!(policy.times, 5);
        assert!(!policy.fail_in_transaction);
    }

    #[test]
    fn zero_attempts_fails_validation() {
        let policy = RetryPolicy::on_kinds([kind("conflict")]).with_times(0);
        assert_eq!(
            policy.validate(),
            Err(RetryError::InvalidAttemptCount { attempts: 0 })
        );
    }

    #[test]
    fn empty_kind_set_fails_validation() {
        let policy = RetryPolicy::on_kinds([]);
        assert_eq!(policy.validate(), Err(RetryError::NoRetryableKinds));
    }

    #[test]
    fn attempt_count_is_checked_before_kind_set() {
        let policy = RetryPolicy::on_kinds([]).with_times(0);
        assert_eq!(
            policy.validate(),
            Err(RetryError::InvalidAttemptCount { attempts: 0 })
        );
    }

    #[test]
    fn duplicate_kinds_collapse() {
        let policy = RetryPolicy::on_kinds([kind("conflict"), kind("conflict")]);
        assert_eq!(policy.on.len(), 1);
    }

    #[test]
    fn roundtrip_serialization() {
        let policy = RetryPolicy::on_kinds([kind("conflict"), kind("stale-state")]).with_times(3);
        let json = serde_json::to_string(&policy).unwrap();
        let deserialized: RetryPolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(policy, deserialized);
    }

    #[test]
    fn fail_in_transaction_defaults_to_true_when_absent() {
        let json = r#"{"times":2,"on":["conflict"]}"#;
        let policy: RetryPolicy = serde_json::from_str(json).unwrap();
        assert!(policy.fail_in_transaction);
    }
}
