//! The conflict retry interceptor.
//!
//! [`RetryExecutor`] wraps a fallible operation and re-invokes it until it
//! succeeds, exhausts the policy's attempts, or fails with a kind that is
//! not retryable. Retries are immediate: no backoff, no delay, no effect
//! beyond a log line per retry. Each call runs synchronously on the calling
//! thread and the executor holds no per-call state, so a single executor
//! can be shared freely.
//!
//! Because every retry re-invokes the same operation with the same
//! arguments, the protected operation must be safe to re-run after a failed
//! attempt; the executor provides no compensation for partial effects.

use tracing::{debug, info, instrument};

use crate::errors::{OperationFailure, RetryError, RetryResult};
use crate::policy::RetryPolicy;
use crate::registry::PolicyRegistry;
use crate::taxonomy::KindTaxonomy;
use crate::types::{FailureKind, OperationId};

/// Executes protected operations under a retry policy.
///
/// Carries the failure-kind taxonomy used for retryable matching and a
/// policy registry for callers that resolve policies by operation identity
/// instead of passing them explicitly.
#[derive(Debug, Default)]
pub struct RetryExecutor {
    taxonomy: KindTaxonomy,
    registry: PolicyRegistry,
}

impl RetryExecutor {
    /// Creates an executor with an empty taxonomy and registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an executor with the given failure-kind taxonomy.
    pub fn with_taxonomy(taxonomy: KindTaxonomy) -> Self {
        Self {
            taxonomy,
            registry: PolicyRegistry::new(),
        }
    }

    /// The registry policies are resolved from in [`execute`](Self::execute).
    pub fn registry(&self) -> &PolicyRegistry {
        &self.registry
    }

    /// The failure-kind taxonomy used for retryable matching.
    pub fn taxonomy(&self) -> &KindTaxonomy {
        &self.taxonomy
    }

    /// Invokes `operation` under `policy`, retrying on retryable failures.
    ///
    /// The policy is validated and the transaction precondition checked
    /// before the first attempt; on either violation the operation is never
    /// invoked. A success on any attempt returns immediately. A failure is
    /// retried when any failure in its cause chain has a kind matching one
    /// of the policy's retryable kinds (directly or through the taxonomy)
    /// and attempts remain; otherwise it propagates unchanged.
    ///
    /// # Errors
    ///
    /// - [`RetryError::InvalidAttemptCount`] when `policy.times` is zero.
    /// - [`RetryError::NoRetryableKinds`] when `policy.on` is empty.
    /// - [`RetryError::TransactionActive`] when `policy.fail_in_transaction`
    ///   is set and `transaction_active` is true.
    /// - [`RetryError::Operation`] carrying the final attempt's failure.
    #[instrument(skip(self, operation))]
    pub fn execute_with_policy<T, F>(
        &self,
        policy: &RetryPolicy,
        transaction_active: bool,
        mut operation: F,
    ) -> RetryResult<T>
    where
        F: FnMut() -> Result<T, OperationFailure>,
    {
        policy.validate()?;
        if policy.fail_in_transaction && transaction_active {
            return Err(RetryError::TransactionActive);
        }
        info!(times = policy.times, kinds = ?policy.on, "applying retry policy");

        let mut remaining = policy.times;
        loop {
            match operation() {
                Ok(value) => return Ok(value),
                Err(failure) => {
                    remaining -= 1;
                    let matched = self.retryable_cause(&failure, policy).cloned();
                    match matched {
                        Some(kind) if remaining > 0 => {
                            info!(remaining, matched = %kind, "retryable failure detected, retrying");
                        }
                        _ => return Err(RetryError::Operation(failure)),
                    }
                }
            }
        }
    }

    /// Invokes `operation` under the policy registered for it.
    ///
    /// The policy is resolved with the registry's two-step lookup: `primary`
    /// first, then `fallback`. When neither key is registered the operation
    /// is invoked exactly once with no retry handling.
    ///
    /// # Errors
    ///
    /// Same as [`execute_with_policy`](Self::execute_with_policy); without a
    /// registered policy only [`RetryError::Operation`] can occur.
    #[instrument(skip(self, operation))]
    pub fn execute<T, F>(
        &self,
        primary: &OperationId,
        fallback: Option<&OperationId>,
        transaction_active: bool,
        mut operation: F,
    ) -> RetryResult<T>
    where
        F: FnMut() -> Result<T, OperationFailure>,
    {
        match self.registry.resolve(primary, fallback) {
            Some(policy) => self.execute_with_policy(&policy, transaction_active, operation),
            None => {
                debug!(operation = %primary, "no retry policy registered, invoking once");
                operation().map_err(RetryError::Operation)
            }
        }
    }

    /// Finds the first failure in the cause chain whose kind matches a
    /// retryable kind of `policy`, outermost first.
    fn retryable_cause<'a>(
        &self,
        failure: &'a OperationFailure,
        policy: &RetryPolicy,
    ) -> Option<&'a FailureKind> {
        failure.causes().map(OperationFailure::kind).find(|observed| {
            policy
                .on
                .iter()
                .any(|configured| self.taxonomy.is_refinement_of(observed, configured))
        })
    }
}
