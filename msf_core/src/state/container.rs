// msf_core/src/state/container.rs

use std::sync::Arc;

use nalgebra::{
    DMatrix, DMatrixView, DMatrixViewMut, DVector, DVectorView, DVectorViewMut, UnitQuaternion,
    Vector3,
};

use crate::error::ConfigError;
use crate::state::identifier::StateIdentifier;
use crate::state::layout::StateLayout;
use crate::state::list::StateList;
use crate::state::offsets::BlockOffsets;
use crate::state::value::BlockValue;

/// A read-only state shared with other consumers (e.g. a history buffer).
/// Once frozen it is never mutated again; new states are made by cloning.
pub type EkfStateSnapshot = Arc<EkfState>;

/// A borrowed window onto a contiguous range of the state and its covariance.
#[derive(Debug)]
pub struct StateView<'a> {
    pub vector: DVectorView<'a, f64>,
    pub covariance: DMatrixView<'a, f64>,
    /// The blocks covered by this view, in declaration order.
    pub blocks: &'a [BlockOffsets],
}

/// Mutable counterpart of [`StateView`].
#[derive(Debug)]
pub struct StateViewMut<'a> {
    pub vector: DVectorViewMut<'a, f64>,
    pub covariance: DMatrixViewMut<'a, f64>,
    pub blocks: &'a [BlockOffsets],
}

/// One step of a block traversal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockRef<'a> {
    pub offsets: &'a BlockOffsets,
    pub value: BlockValue,
}

/// The live filter state: a flat value buffer, the error-state covariance,
/// and the inputs that belong to this instant.
///
/// All storage is allocated once in the constructor; accessors only read or
/// write in place.
#[derive(Debug, Clone)]
pub struct EkfState {
    layout: Arc<StateLayout>,
    /// The raw state buffer `x`, `total_storage_width` long.
    vector: DVector<f64>,
    /// The error-state covariance `P`, `total_manifold_dim` square.
    covariance: DMatrix<f64>,
    /// Timestamp of this state, in seconds.
    pub time: f64,
    /// Angular rate measurement that drove the propagation into this state.
    pub w_m: Vector3<f64>,
    /// Specific force measurement that drove the propagation into this state.
    pub a_m: Vector3<f64>,
}

impl EkfState {
    pub(crate) fn new(layout: Arc<StateLayout>) -> Self {
        let n = layout.total_storage_width();
        let m = layout.total_manifold_dim();
        let mut state = Self {
            layout,
            vector: DVector::zeros(n),
            covariance: DMatrix::zeros(m, m),
            time: 0.0,
            w_m: Vector3::zeros(),
            a_m: Vector3::zeros(),
        };
        state.reset();
        state
    }

    /// Validates `list` and builds a container from it in one step.
    pub fn from_list(list: StateList, expected_covariance_dim: usize) -> Result<Self, ConfigError> {
        StateLayout::build(list, expected_covariance_dim).map(|layout| layout.new_state())
    }

    pub fn layout(&self) -> &Arc<StateLayout> {
        &self.layout
    }

    /// Freezes this state for sharing.
    pub fn into_snapshot(self) -> EkfStateSnapshot {
        Arc::new(self)
    }

    // --- Typed block access ---

    /// Returns the value of `id`. Panics if the state does not declare `id`.
    pub fn get(&self, id: StateIdentifier) -> BlockValue {
        let block = self.layout.expect_block(id);
        BlockValue::read(block.kind, &self.vector.as_slice()[block.storage_range()])
    }

    pub fn try_get(&self, id: StateIdentifier) -> Option<BlockValue> {
        self.layout
            .block(id)
            .map(|b| BlockValue::read(b.kind, &self.vector.as_slice()[b.storage_range()]))
    }

    /// Overwrites the value of `id`. The value must have the block's storage kind.
    pub fn set(&mut self, id: StateIdentifier, value: impl Into<BlockValue>) {
        let value = value.into();
        let block = *self.layout.expect_block(id);
        assert_eq!(
            value.kind(),
            block.kind,
            "state `{}` is declared as {:?}, cannot set a {:?}",
            id,
            block.kind,
            value.kind()
        );
        value.write(&mut self.vector.as_mut_slice()[block.storage_range()]);
    }

    pub fn get_scalar(&self, id: StateIdentifier) -> f64 {
        match self.get(id) {
            BlockValue::Scalar(s) => s,
            other => panic!("state `{}` holds a {:?}, not a scalar", id, other.kind()),
        }
    }

    pub fn get_vector3(&self, id: StateIdentifier) -> Vector3<f64> {
        match self.get(id) {
            BlockValue::Vector3(v) => v,
            other => panic!("state `{}` holds a {:?}, not a 3-vector", id, other.kind()),
        }
    }

    pub fn get_quaternion(&self, id: StateIdentifier) -> UnitQuaternion<f64> {
        match self.get(id) {
            BlockValue::Quaternion(q) => q,
            other => panic!("state `{}` holds a {:?}, not a quaternion", id, other.kind()),
        }
    }

    // --- Views ---

    /// The propagated and unpropagated core, for the propagation step.
    /// Auxiliary blocks are not reachable through this view.
    pub fn core_view(&self) -> StateView<'_> {
        let n = self.layout.core_storage_width();
        let m = self.layout.core_manifold_dim();
        StateView {
            vector: self.vector.rows(0, n),
            covariance: self.covariance.view((0, 0), (m, m)),
            blocks: self.layout.offsets().core_entries(),
        }
    }

    pub fn core_view_mut(&mut self) -> StateViewMut<'_> {
        let n = self.layout.core_storage_width();
        let m = self.layout.core_manifold_dim();
        StateViewMut {
            vector: self.vector.rows_mut(0, n),
            covariance: self.covariance.view_mut((0, 0), (m, m)),
            blocks: self.layout.offsets().core_entries(),
        }
    }

    /// The whole state, for measurement updates.
    pub fn full_view(&self) -> StateView<'_> {
        let n = self.vector.nrows();
        let m = self.covariance.nrows();
        StateView {
            vector: self.vector.rows(0, n),
            covariance: self.covariance.view((0, 0), (m, m)),
            blocks: self.layout.offsets().entries(),
        }
    }

    pub fn full_view_mut(&mut self) -> StateViewMut<'_> {
        let n = self.vector.nrows();
        let m = self.covariance.nrows();
        StateViewMut {
            vector: self.vector.rows_mut(0, n),
            covariance: self.covariance.view_mut((0, 0), (m, m)),
            blocks: self.layout.offsets().entries(),
        }
    }

    pub fn vector(&self) -> &DVector<f64> {
        &self.vector
    }

    pub fn covariance(&self) -> &DMatrix<f64> {
        &self.covariance
    }

    /// Replaces the covariance. Panics if `p` is not `total_manifold_dim` square.
    pub fn set_covariance(&mut self, p: &DMatrix<f64>) {
        self.covariance.copy_from(p);
    }

    /// The diagonal covariance block of `id`.
    pub fn block_covariance(&self, id: StateIdentifier) -> DMatrixView<'_, f64> {
        let b = self.layout.expect_block(id);
        self.covariance
            .view((b.cov_offset, b.cov_offset), (b.manifold_dim, b.manifold_dim))
    }

    pub fn block_covariance_mut(&mut self, id: StateIdentifier) -> DMatrixViewMut<'_, f64> {
        let b = *self.layout.expect_block(id);
        self.covariance
            .view_mut((b.cov_offset, b.cov_offset), (b.manifold_dim, b.manifold_dim))
    }

    /// Zeroes the correlation of `id` with every other block, keeping its own
    /// diagonal block.
    pub fn clear_cross_covariance(&mut self, id: StateIdentifier) {
        let range = self.layout.expect_block(id).covariance_range();
        let n = self.covariance.nrows();
        for i in range.clone() {
            for j in (0..n).filter(|j| !range.contains(j)) {
                self.covariance[(i, j)] = 0.0;
                self.covariance[(j, i)] = 0.0;
            }
        }
    }

    // --- Generic operations ---

    /// Lazy traversal of every block in declaration order. Calling it again
    /// restarts from the first block.
    pub fn blocks(&self) -> impl Iterator<Item = BlockRef<'_>> + Clone + '_ {
        self.layout.offsets().entries().iter().map(move |offsets| BlockRef {
            offsets,
            value: BlockValue::read(offsets.kind, &self.vector.as_slice()[offsets.storage_range()]),
        })
    }

    pub fn for_each_block<F>(&self, mut visitor: F)
    where
        F: FnMut(BlockRef<'_>),
    {
        for block in self.blocks() {
            visitor(block);
        }
    }

    /// Puts every block back to its default and zeroes the covariance.
    /// Timestamp and inputs are left untouched.
    pub fn reset(&mut self) {
        let layout = Arc::clone(&self.layout);
        for b in layout.offsets().entries() {
            BlockValue::default_for(b.kind)
                .write(&mut self.vector.as_mut_slice()[b.storage_range()]);
        }
        self.covariance.fill(0.0);
    }
}
