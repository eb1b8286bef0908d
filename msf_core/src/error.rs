// msf_core/src/error.rs

use thiserror::Error;

use crate::state::identifier::StateIdentifier;

/// Everything that can be wrong with a state definition.
///
/// All of these are detected once, when a layout is built, and none of them
/// is recoverable: a filter must not start on a rejected definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("state identifier `{id}` is declared twice (positions {first} and {second})")]
    DuplicateIdentifier {
        id: StateIdentifier,
        first: usize,
        second: usize,
    },

    #[error("state ordering violated at position {position}: {reason}")]
    OrderingViolation { position: usize, reason: String },

    #[error(
        "error-state dimension {actual} does not match the allocated covariance size {expected}"
    )]
    DimensionMismatch { expected: usize, actual: usize },

    #[error(
        "block `{id}` reports storage width {storage_width} and manifold dimension {manifold_dim}, expected {expected_storage}/{expected_manifold}"
    )]
    InvalidBlockDimension {
        id: StateIdentifier,
        storage_width: usize,
        manifold_dim: usize,
        expected_storage: usize,
        expected_manifold: usize,
    },
}

impl ConfigError {
    pub(crate) fn ordering(position: usize, reason: impl Into<String>) -> Self {
        ConfigError::OrderingViolation {
            position,
            reason: reason.into(),
        }
    }
}
