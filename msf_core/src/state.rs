// msf_core/src/state.rs

//! The typed state-vector substrate of the filter.
//!
//! A filter declares its state once as an ordered [`list::StateList`] of
//! [`descriptor::BlockDescriptor`]s. The list is resolved into an
//! [`offsets::OffsetTable`] with two addressing spaces (raw storage and
//! error-state/covariance), checked by the [`validator`], and wrapped in a
//! [`layout::StateLayout`] from which live [`container::EkfState`]s are built.

pub mod container;
pub mod descriptor;
pub mod identifier;
pub mod layout;
pub mod list;
pub mod offsets;
pub mod validator;
pub mod value;
