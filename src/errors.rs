//! Error types for the `ConflictRetry` library.
//!
//! Two families of failure exist:
//!
//! - [`OperationFailure`]: a failure produced by the protected operation
//!   itself, carrying a [`FailureKind`] tag and an optional cause chain.
//! - [`RetryError`]: everything the executor can surface to the caller -
//!   configuration errors detected before the first attempt, the
//!   transaction-state precondition violation, and the protected
//!   operation's own failure carried verbatim.
//!
//! The executor never synthesizes a new failure to represent retry
//! exhaustion: the caller always sees exactly the failure the last attempt
//! produced.

use crate::types::FailureKind;
use thiserror::Error;

/// A failure raised by a protected operation.
///
/// Each failure carries a kind tag, a human-readable message, and an
/// optional cause - the failure that triggered this one. Causes form a
/// chain inspected by the executor when deciding whether to retry, so a
/// wrapper failure whose root cause is retryable is still retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct OperationFailure {
    kind: FailureKind,
    message: String,
    #[source]
    cause: Option<Box<OperationFailure>>,
}

impl OperationFailure {
    /// Creates a failure with no underlying cause.
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: None,
        }
    }

    /// Creates a failure triggered by another failure.
    pub fn caused_by(
        kind: FailureKind,
        message: impl Into<String>,
        cause: OperationFailure,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: Some(Box::new(cause)),
        }
    }

    /// The kind tag of this failure.
    pub const fn kind(&self) -> &FailureKind {
        &self.kind
    }

    /// The human-readable message of this failure.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The failure that triggered this one, if any.
    pub fn cause(&self) -> Option<&OperationFailure> {
        self.cause.as_deref()
    }

    /// Iterates over the full cause chain, starting with this failure
    /// (outermost) and ending with the root cause (innermost).
    pub fn causes(&self) -> impl Iterator<Item = &OperationFailure> {
        std::iter::successors(Some(self), |failure| failure.cause.as_deref())
    }
}

/// Errors surfaced by the retry executor.
///
/// Configuration and transaction-state errors are detected before the
/// first attempt and the protected operation is never invoked. The
/// [`Operation`](RetryError::Operation) variant carries the protected
/// operation's failure unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetryError {
    /// The policy allowed zero attempts.
    #[error("retry attempts must be greater than 0 (was {attempts})")]
    InvalidAttemptCount {
        /// The configured attempt count.
        attempts: u32,
    },

    /// The policy named no retryable failure kinds.
    #[error("retry policy must name at least one retryable failure kind")]
    NoRetryableKinds,

    /// Declaring a kind refinement would make a kind its own ancestor.
    #[error("declaring '{kind}' as a refinement would create a cycle")]
    TaxonomyCycle {
        /// The kind whose declaration was rejected.
        kind: FailureKind,
    },

    /// Retry was requested while a transaction is already active.
    ///
    /// A retry must restart the whole unit of work; a transaction that may
    /// already carry a pending rollback cannot be re-entered.
    #[error("cannot retry inside an active transaction: the transaction may already be marked for rollback")]
    TransactionActive,

    /// The protected operation failed and was not (or no longer) retryable.
    #[error(transparent)]
    Operation(#[from] OperationFailure),
}

/// Type alias for retry executor results.
pub type RetryResult<T> = Result<T, RetryError>;
