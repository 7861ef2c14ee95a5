//! Static registration of retry policies keyed by operation identity.
//!
//! The original design resolved its configuration reflectively from method
//! metadata, first checking the declared method and then falling back to
//! the runtime-argument-typed method. That generalizes here to an explicit
//! two-step lookup: callers register a policy under an [`OperationId`] and
//! resolve with a primary key plus an optional fallback key.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::policy::RetryPolicy;
use crate::types::OperationId;

/// Thread-safe registry mapping operation identities to retry policies.
#[derive(Debug, Default)]
pub struct PolicyRegistry {
    policies: RwLock<HashMap<OperationId, RetryPolicy>>,
}

impl PolicyRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `policy` under `operation`, replacing any previous entry.
    pub fn register(&self, operation: OperationId, policy: RetryPolicy) {
        self.policies
            .write()
            .expect("RwLock poisoned")
            .insert(operation, policy);
    }

    /// Resolves a policy with a two-step lookup.
    ///
    /// Tries `primary` first; on a miss, tries `fallback` if one is given.
    /// Returns `None` when neither key is registered.
    pub fn resolve(
        &self,
        primary: &OperationId,
        fallback: Option<&OperationId>,
    ) -> Option<RetryPolicy> {
        let policies = self.policies.read().expect("RwLock poisoned");
        policies
            .get(primary)
            .or_else(|| fallback.and_then(|id| policies.get(id)))
            .cloned()
    }

    /// Returns true if a policy is registered under `operation`.
    pub fn contains(&self, operation: &OperationId) -> bool {
        self.policies
            .read()
            .expect("RwLock poisoned")
            .contains_key(operation)
    }

    /// The number of registered policies.
    pub fn len(&self) -> usize {
        self.policies.read().expect("RwLock poisoned").len()
    }

    /// Returns true if no policies are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
