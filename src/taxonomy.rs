//! Failure-kind hierarchy for retryable-failure matching.
//!
//! The original formulation of "retry on these failures" leans on
//! class-hierarchy matching: a configured failure class matches any observed
//! failure of that class or a subclass. This module replaces that with an
//! explicit taxonomy over [`FailureKind`] tags: each kind may declare at most
//! one parent, and a configured kind matches an observed kind when the
//! observed kind is the same or a declared refinement of it.

use std::collections::HashMap;

use crate::errors::RetryError;
use crate::types::FailureKind;

/// Declared child-to-parent refinements between failure kinds.
///
/// The default taxonomy is empty: every kind matches only itself. Declaring
/// `optimistic-lock-conflict` as a refinement of `concurrency-conflict` makes
/// a policy configured on `concurrency-conflict` also retry failures tagged
/// `optimistic-lock-conflict`.
#[derive(Debug, Clone, Default)]
pub struct KindTaxonomy {
    parents: HashMap<FailureKind, FailureKind>,
}

impl KindTaxonomy {
    /// Creates an empty taxonomy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `child` to be a more specific form of `parent`.
    ///
    /// Re-declaring a child replaces its previous parent. A kind has at most
    /// one parent; deeper hierarchies are built by chaining declarations.
    ///
    /// # Errors
    ///
    /// Returns [`RetryError::TaxonomyCycle`] if the declaration would make
    /// `child` an ancestor of itself (including `child == parent`).
    pub fn declare_refinement(
        &mut self,
        child: FailureKind,
        parent: FailureKind,
    ) -> Result<(), RetryError> {
        if child == parent || self.ancestors(&parent).any(|ancestor| *ancestor == child) {
            return Err(RetryError::TaxonomyCycle { kind: child });
        }
        self.parents.insert(child, parent);
        Ok(())
    }

    /// Iterates over the declared-parent chain of `kind`, nearest first.
    pub fn ancestors<'a>(&'a self, kind: &FailureKind) -> impl Iterator<Item = &'a FailureKind> {
        std::iter::successors(self.parents.get(kind), move |parent| {
            self.parents.get(*parent)
        })
    }

    /// Returns true when `observed` is `configured` or a declared refinement
    /// of it.
    pub fn is_refinement_of(&self, observed: &FailureKind, configured: &FailureKind) -> bool {
        observed == configured || self.ancestors(observed).any(|ancestor| ancestor == configured)
    }

    /// The number of declared refinements.
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    /// Returns true if no refinements have been declared.
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}
