// msf_updates/src/prelude.rs

pub use crate::config::{
    load_state_definition, parse_state_definition, LoadError, StateDefinitionConfig,
};
pub use crate::definitions::{
    pose_state_list, position_pose_state_list, position_state_list, StateDefinition,
};

// Re-export the core so applications only need this crate.
pub use msf_core::prelude::*;
