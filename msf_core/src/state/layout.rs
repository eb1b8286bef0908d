// msf_core/src/state/layout.rs

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::error::ConfigError;
use crate::state::container::EkfState;
use crate::state::identifier::StateIdentifier;
use crate::state::list::StateList;
use crate::state::offsets::{BlockOffsets, OffsetTable};
use crate::state::validator;

/// A state definition that passed validation, together with its offsets.
///
/// This is the only way to obtain an [`EkfState`]: the fields are private and
/// the single constructor runs the validator, so every live container is
/// backed by a checked layout.
#[derive(Debug, PartialEq, Eq)]
pub struct StateLayout {
    list: StateList,
    offsets: OffsetTable,
}

impl StateLayout {
    /// Validates `list` and resolves its offsets.
    ///
    /// # Arguments
    /// * `list`: The ordered state definition chosen by the application.
    /// * `expected_covariance_dim`: The covariance size the filter core allocated.
    ///
    /// # Returns
    /// The shared, validated layout, or the first configuration error found.
    pub fn build(
        list: StateList,
        expected_covariance_dim: usize,
    ) -> Result<Arc<Self>, ConfigError> {
        Self::checked(list, expected_covariance_dim)
            .map(Arc::new)
            .inspect_err(|e| error!("Rejected state definition: {}", e))
    }

    fn checked(list: StateList, expected_covariance_dim: usize) -> Result<Self, ConfigError> {
        // Duplicates would make the offsets meaningless, so check them first.
        validator::check_unique(&list)?;
        let offsets = OffsetTable::resolve(&list);
        validator::validate(&list, &offsets, expected_covariance_dim)?;

        for e in offsets.entries() {
            debug!(
                "  `{}` {:?}: storage {:?}, covariance {:?}",
                e.id,
                e.category,
                e.storage_range(),
                e.covariance_range()
            );
        }
        info!(
            "Validated state definition: {} blocks, storage width {}, error-state dim {} (core {})",
            offsets.len(),
            offsets.total_storage_width(),
            offsets.total_manifold_dim(),
            offsets.core_manifold_dim()
        );

        Ok(Self { list, offsets })
    }

    /// Creates a fresh container with every block at its default and a zero covariance.
    pub fn new_state(self: &Arc<Self>) -> EkfState {
        EkfState::new(Arc::clone(self))
    }

    pub fn list(&self) -> &StateList {
        &self.list
    }

    pub fn offsets(&self) -> &OffsetTable {
        &self.offsets
    }

    pub fn block(&self, id: StateIdentifier) -> Option<&BlockOffsets> {
        self.offsets.get(id)
    }

    /// Offsets of `id`. Asking for a block the state does not declare is a
    /// logic error in the caller.
    pub fn expect_block(&self, id: StateIdentifier) -> &BlockOffsets {
        match self.offsets.get(id) {
            Some(b) => b,
            None => panic!("state identifier `{}` is not part of this state definition", id),
        }
    }

    pub fn total_storage_width(&self) -> usize {
        self.offsets.total_storage_width()
    }

    pub fn total_manifold_dim(&self) -> usize {
        self.offsets.total_manifold_dim()
    }

    pub fn core_storage_width(&self) -> usize {
        self.offsets.core_storage_width()
    }

    pub fn core_manifold_dim(&self) -> usize {
        self.offsets.core_manifold_dim()
    }

    /// Blocks whose covariance may grow between measurements.
    pub fn drifting_blocks(&self) -> impl Iterator<Item = &BlockOffsets> + '_ {
        self.offsets
            .entries()
            .iter()
            .filter(|e| e.category.is_drifting())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::descriptor::{BlockDescriptor, StorageKind};
    use StateIdentifier::*;
    use StorageKind::*;

    fn pose_list() -> StateList {
        StateList::new(vec![
            BlockDescriptor::propagated(P, Vector3),
            BlockDescriptor::propagated(V, Vector3),
            BlockDescriptor::propagated(Q, Quaternion4),
            BlockDescriptor::core_static(BW, Vector3),
            BlockDescriptor::core_static(BA, Vector3),
            BlockDescriptor::auxiliary(L, Scalar1),
            BlockDescriptor::drifting(QWv, Quaternion4),
            BlockDescriptor::auxiliary(PWv, Vector3),
        ])
    }

    #[test]
    fn build_resolves_totals() {
        let layout = StateLayout::build(pose_list(), 22).unwrap();
        assert_eq!(layout.total_storage_width(), 24);
        assert_eq!(layout.total_manifold_dim(), 22);
        assert_eq!(layout.core_storage_width(), 16);
        assert_eq!(layout.core_manifold_dim(), 15);
        assert_eq!(layout.expect_block(PWv).cov_offset, 19);
    }

    #[test]
    fn duplicates_rejected_before_resolution() {
        let mut blocks = pose_list().as_slice().to_vec();
        blocks.push(BlockDescriptor::auxiliary(Q, Quaternion4));
        // The dimension is also wrong; the duplicate must be reported first.
        let err = StateLayout::build(StateList::new(blocks), 0).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateIdentifier { id: Q, .. }));
    }

    #[test]
    fn drifting_blocks_are_listed() {
        let layout = StateLayout::build(pose_list(), 22).unwrap();
        let drifting: Vec<_> = layout.drifting_blocks().map(|b| b.id).collect();
        assert_eq!(drifting, vec![QWv]);
    }

    #[test]
    #[should_panic(expected = "not part of this state definition")]
    fn unknown_block_panics() {
        let layout = StateLayout::build(pose_list(), 22).unwrap();
        layout.expect_block(PIp);
    }
}
