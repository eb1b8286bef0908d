// msf_core/src/state/offsets.rs

use std::ops::Range;

use crate::state::descriptor::{PropagationCategory, StorageKind};
use crate::state::identifier::StateIdentifier;
use crate::state::list::StateList;

/// Where one block lives in the two addressing spaces of the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockOffsets {
    pub id: StateIdentifier,
    pub kind: StorageKind,
    pub category: PropagationCategory,
    /// Offset into the raw state buffer.
    pub full_offset: usize,
    /// Offset into the error state, i.e. the row/column of the covariance.
    pub cov_offset: usize,
    pub storage_width: usize,
    pub manifold_dim: usize,
}

impl BlockOffsets {
    pub fn storage_range(&self) -> Range<usize> {
        self.full_offset..self.full_offset + self.storage_width
    }

    pub fn covariance_range(&self) -> Range<usize> {
        self.cov_offset..self.cov_offset + self.manifold_dim
    }
}

/// The offsets of every block of a [`StateList`], in declaration order,
/// plus the aggregate dimensions.
///
/// The table only reports; it does not judge whether the ordering it was
/// built from is acceptable. That is the job of the validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetTable {
    entries: Vec<BlockOffsets>,
    // Position in `entries`, keyed by the identifier's stable value.
    by_id: [Option<usize>; StateIdentifier::COUNT],
    total_storage_width: usize,
    total_manifold_dim: usize,
}

impl OffsetTable {
    /// Walks the list in declared order with one cursor per addressing space.
    pub fn resolve(list: &StateList) -> Self {
        let mut entries = Vec::with_capacity(list.len());
        let mut by_id = [None; StateIdentifier::COUNT];
        let mut storage_cursor = 0;
        let mut cov_cursor = 0;

        for (position, descriptor) in list.iter().enumerate() {
            let entry = BlockOffsets {
                id: descriptor.id,
                kind: descriptor.kind,
                category: descriptor.category,
                full_offset: storage_cursor,
                cov_offset: cov_cursor,
                storage_width: descriptor.storage_width(),
                manifold_dim: descriptor.manifold_dim(),
            };
            storage_cursor += entry.storage_width;
            cov_cursor += entry.manifold_dim;

            // First declaration wins; duplicates are rejected by the validator.
            let slot = &mut by_id[descriptor.id.index()];
            if slot.is_none() {
                *slot = Some(position);
            }
            entries.push(entry);
        }

        Self {
            entries,
            by_id,
            total_storage_width: storage_cursor,
            total_manifold_dim: cov_cursor,
        }
    }

    pub fn get(&self, id: StateIdentifier) -> Option<&BlockOffsets> {
        self.by_id[id.index()].map(|i| &self.entries[i])
    }

    pub fn contains(&self, id: StateIdentifier) -> bool {
        self.by_id[id.index()].is_some()
    }

    /// All entries, in declaration order.
    pub fn entries(&self) -> &[BlockOffsets] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_storage_width(&self) -> usize {
        self.total_storage_width
    }

    pub fn total_manifold_dim(&self) -> usize {
        self.total_manifold_dim
    }

    /// The leading run of core blocks.
    pub fn core_entries(&self) -> &[BlockOffsets] {
        let n = self
            .entries
            .iter()
            .take_while(|e| e.category.is_core())
            .count();
        &self.entries[..n]
    }

    /// Storage width of the leading core run.
    pub fn core_storage_width(&self) -> usize {
        self.core_entries().iter().map(|e| e.storage_width).sum()
    }

    /// Error-state dimension of the leading core run.
    pub fn core_manifold_dim(&self) -> usize {
        self.core_entries().iter().map(|e| e.manifold_dim).sum()
    }
}
