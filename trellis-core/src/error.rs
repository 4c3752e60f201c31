//! Error types.
//!
//! The runtime has a single error condition of its own: building a view whose
//! starting state is already invalid. Everything else (panicking lenses,
//! mappers or predicates) propagates straight to the caller of `get`/`set`.

use thiserror::Error;

/// Errors produced while constructing derived signals and atoms.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A construction-time invariant did not hold, so no value could be built.
    #[error("invariant violation: {reason}")]
    InvariantViolation {
        /// What went wrong.
        reason: &'static str,
    },
}

impl Error {
    pub(crate) fn filter_rejected_initial() -> Self {
        Self::InvariantViolation {
            reason: "initial value does not satisfy the predicate",
        }
    }
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invariant_violation_message() {
        let err = Error::filter_rejected_initial();
        assert_eq!(
            err.to_string(),
            "invariant violation: initial value does not satisfy the predicate"
        );
    }
}
