//! Error types for the merge pipeline.
//!
//! [`MergeError`] is returned by every fallible stage. Failures are
//! deterministic: they come from inconsistent caller data or bad arguments,
//! never from transient conditions, so nothing is retried.

use thiserror::Error;

use crate::config::ConfigError;
use crate::model::FluxDirection;

/// Errors returned by the merge pipeline.
#[derive(Debug, Error)]
pub enum MergeError {
    /// A flux entry names a reaction that is absent from its specification's
    /// `Reactions` table.
    #[error(
        "specification {specification}: {direction} of object `{object}` references reaction `{reaction}`, which is not in its Reactions table"
    )]
    DanglingReference {
        /// 1-based position of the specification in the input batch.
        specification: usize,
        /// Key of the object in its model-object table.
        object: String,
        /// Which flux map held the entry.
        direction: FluxDirection,
        /// The unresolved reaction identifier.
        reaction: String,
    },

    /// Renumbering would take the reaction counter past `u64::MAX`.
    #[error(
        "specification {specification}: renumbering {reactions} reaction(s) from {start} overflows the reaction counter"
    )]
    CounterOverflow {
        /// 1-based position of the specification in the input batch.
        specification: usize,
        /// Counter value the specification started from.
        start: u64,
        /// Number of reactions in the specification.
        reactions: usize,
    },

    /// No specifications were supplied.
    #[error("no specifications to merge")]
    EmptyInput,

    /// The number of model-object tables differs from the number of specifications.
    #[error(
        "expected one model-object table per specification, got {specifications} specification(s) and {object_tables} table(s)"
    )]
    LengthMismatch {
        specifications: usize,
        object_tables: usize,
    },

    /// The merge configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl MergeError {
    /// Returns `true` for the invalid-argument class of errors.
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::EmptyInput | Self::LengthMismatch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dangling_reference_message_names_everything() {
        let err = MergeError::DanglingReference {
            specification: 2,
            object: "ATP".to_owned(),
            direction: FluxDirection::Outflux,
            reaction: "r9".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("specification 2"));
        assert!(msg.contains("Outflux"));
        assert!(msg.contains("`ATP`"));
        assert!(msg.contains("`r9`"));
        assert!(!err.is_invalid_argument());
    }

    #[test]
    fn counter_overflow_message() {
        let err = MergeError::CounterOverflow {
            specification: 1,
            start: u64::MAX,
            reactions: 2,
        };
        assert!(err.to_string().contains("2 reaction(s) from 18446744073709551615"));
        assert!(!err.is_invalid_argument());
    }

    #[test]
    fn invalid_argument_class() {
        assert!(MergeError::EmptyInput.is_invalid_argument());
        let err = MergeError::LengthMismatch {
            specifications: 3,
            object_tables: 2,
        };
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("3 specification(s) and 2 table(s)"));
    }
}
