// msf_core/src/state/descriptor.rs

use serde::{Deserialize, Serialize};

use crate::state::identifier::StateIdentifier;

/// How a block is represented in the flat state buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    /// A single scalar (e.g. visual scale).
    Scalar1,
    /// A 3-vector (positions, velocities, biases).
    Vector3,
    /// A unit quaternion, stored as `[x, y, z, w]`.
    Quaternion4,
}

impl StorageKind {
    /// Number of raw scalars the block occupies in the state buffer.
    pub const fn storage_width(self) -> usize {
        match self {
            StorageKind::Scalar1 => 1,
            StorageKind::Vector3 => 3,
            StorageKind::Quaternion4 => 4,
        }
    }

    /// Number of error-state (covariance) dimensions of the block.
    /// A quaternion is perturbed by a 3D rotation vector.
    pub const fn manifold_dim(self) -> usize {
        match self {
            StorageKind::Scalar1 => 1,
            StorageKind::Vector3 => 3,
            StorageKind::Quaternion4 => 3,
        }
    }
}

/// How a block evolves in time. Declared per block; the filter relies on
/// core blocks preceding auxiliary ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropagationCategory {
    /// Evolved by the process model at every time step (`p`, `v`, `q`).
    CoreWithPropagation,
    /// Part of the core state but held constant by the process model (biases).
    CoreWithoutPropagation,
    /// Not propagated, but its covariance is allowed to grow over time.
    AuxiliaryNonTemporalDrifting,
    /// Not propagated and not drifting. Calibration-like quantities.
    #[default]
    AuxiliaryStatic,
}

impl PropagationCategory {
    pub const fn is_core(self) -> bool {
        matches!(
            self,
            PropagationCategory::CoreWithPropagation | PropagationCategory::CoreWithoutPropagation
        )
    }

    pub const fn is_auxiliary(self) -> bool {
        !self.is_core()
    }

    /// Whether the update side may inflate this block's covariance between measurements.
    pub const fn is_drifting(self) -> bool {
        matches!(self, PropagationCategory::AuxiliaryNonTemporalDrifting)
    }
}

/// Full description of one named quantity in the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockDescriptor {
    pub id: StateIdentifier,
    pub kind: StorageKind,
    #[serde(default)]
    pub category: PropagationCategory,
}

impl BlockDescriptor {
    pub const fn new(id: StateIdentifier, kind: StorageKind, category: PropagationCategory) -> Self {
        Self { id, kind, category }
    }

    /// A block evolved by the process model.
    pub const fn propagated(id: StateIdentifier, kind: StorageKind) -> Self {
        Self::new(id, kind, PropagationCategory::CoreWithPropagation)
    }

    /// A core block held constant during propagation.
    pub const fn core_static(id: StateIdentifier, kind: StorageKind) -> Self {
        Self::new(id, kind, PropagationCategory::CoreWithoutPropagation)
    }

    /// An auxiliary block with the default (static) category.
    pub const fn auxiliary(id: StateIdentifier, kind: StorageKind) -> Self {
        Self::new(id, kind, PropagationCategory::AuxiliaryStatic)
    }

    /// An auxiliary block whose covariance may drift.
    pub const fn drifting(id: StateIdentifier, kind: StorageKind) -> Self {
        Self::new(id, kind, PropagationCategory::AuxiliaryNonTemporalDrifting)
    }

    pub const fn storage_width(&self) -> usize {
        self.kind.storage_width()
    }

    pub const fn manifold_dim(&self) -> usize {
        self.kind.manifold_dim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quaternion_storage_exceeds_manifold() {
        assert_eq!(StorageKind::Quaternion4.storage_width(), 4);
        assert_eq!(StorageKind::Quaternion4.manifold_dim(), 3);
    }

    #[test]
    fn vector_and_scalar_widths_match() {
        for kind in [StorageKind::Scalar1, StorageKind::Vector3] {
            assert_eq!(kind.storage_width(), kind.manifold_dim());
        }
    }

    #[test]
    fn category_predicates() {
        use PropagationCategory::*;
        assert!(CoreWithPropagation.is_core());
        assert!(CoreWithoutPropagation.is_core());
        assert!(AuxiliaryStatic.is_auxiliary());
        assert!(AuxiliaryNonTemporalDrifting.is_auxiliary());
        assert!(AuxiliaryNonTemporalDrifting.is_drifting());
        assert!(!AuxiliaryStatic.is_drifting());
        assert_eq!(PropagationCategory::default(), AuxiliaryStatic);
    }

    #[test]
    fn constructors_set_category() {
        let d = BlockDescriptor::drifting(StateIdentifier::QWv, StorageKind::Quaternion4);
        assert_eq!(d.category, PropagationCategory::AuxiliaryNonTemporalDrifting);
        assert_eq!(d.storage_width(), 4);
        assert_eq!(d.manifold_dim(), 3);
    }
}
