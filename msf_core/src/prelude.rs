// msf_core/src/prelude.rs

// --- Core Abstractions (identifiers and descriptors) ---
pub use crate::state::descriptor::{BlockDescriptor, PropagationCategory, StorageKind};
pub use crate::state::identifier::StateIdentifier;
pub use crate::state::list::StateList;

// --- Derived Layout (offsets and the validated factory) ---
pub use crate::state::layout::StateLayout;
pub use crate::state::offsets::{BlockOffsets, OffsetTable};

// --- Runtime Container ---
pub use crate::state::container::{
    BlockRef, EkfState, EkfStateSnapshot, StateView, StateViewMut,
};
pub use crate::state::value::BlockValue;

// --- Errors ---
pub use crate::error::ConfigError;
