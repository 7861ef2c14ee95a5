//! `ConflictRetry` - Bounded retry of data-access operations on
//! optimistic concurrency conflicts.
//!
//! This library wraps a fallible operation and re-invokes it up to a
//! configured number of attempts when the failure, or any failure in its
//! cause chain, matches a configured set of retryable failure kinds.
//! Retrying inside an already-active transaction is treated as a fatal
//! misuse and rejected before the first attempt, because a transaction
//! with a pending rollback cannot be re-entered by a retry.
//!
//! # Example
//!
//! ```rust
//! use conflict_retry::{FailureKind, RetryExecutor, RetryPolicy};
//!
//! let conflict = FailureKind::try_new("optimistic-lock-conflict").unwrap();
//! let policy = RetryPolicy::on_kinds([conflict]).with_times(3);
//! let executor = RetryExecutor::new();
//!
//! let result: Result<u32, _> =
//!     executor.execute_with_policy(&policy, false, || Ok(42));
//! assert_eq!(result.unwrap(), 42);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod errors;
pub mod executor;
pub mod model;
pub mod policy;
pub mod registry;
pub mod taxonomy;
pub mod types;

pub use errors::{OperationFailure, RetryError, RetryResult};
pub use executor::RetryExecutor;
pub use policy::RetryPolicy;
pub use registry::PolicyRegistry;
pub use taxonomy::KindTaxonomy;
pub use types::{FailureKind, OperationId};
