// msf_core/src/lib.rs

// This file defines the public modules of the state-definition library.
pub mod error;
pub mod prelude;
pub mod state;
