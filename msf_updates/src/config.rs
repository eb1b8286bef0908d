// msf_updates/src/config.rs

//! Loads a state definition from a TOML file and turns it into a validated
//! layout. This is the startup checkpoint: nothing downstream may run on a
//! definition that did not come out of [`StateDefinitionConfig::into_layout`].
//!
//! A file either names a predefined definition:
//!
//! ```toml
//! definition = "position_pose"
//! ```
//!
//! or lists the blocks explicitly together with the covariance size the
//! filter allocates (category defaults to `auxiliary_static`):
//!
//! ```toml
//! expected_covariance_dim = 18
//!
//! [[blocks]]
//! id = "p"
//! kind = "vector3"
//! category = "core_with_propagation"
//! # ...
//! ```

use std::path::Path;
use std::sync::Arc;

use figment::{
    providers::{Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::definitions::StateDefinition;
use msf_core::error::ConfigError;
use msf_core::state::descriptor::BlockDescriptor;
use msf_core::state::layout::StateLayout;
use msf_core::state::list::StateList;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read state definition: {0}")]
    Figment(#[from] figment::Error),

    #[error("unknown state definition `{0}`")]
    UnknownDefinition(String),

    #[error("state definition has no blocks and names no predefined definition")]
    Empty,

    #[error("explicit state blocks require `expected_covariance_dim`, the covariance size the filter allocates")]
    MissingCovarianceDim,

    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

/// The on-disk form of a state definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDefinitionConfig {
    /// Name of a predefined definition (`position_pose`, `pose`, `position`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    /// Covariance size allocated by the filter. Required with explicit blocks;
    /// a predefined definition falls back to its own size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_covariance_dim: Option<usize>,
    /// Explicit blocks, in declaration order. Takes precedence over `definition`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<BlockDescriptor>,
}

impl StateDefinitionConfig {
    /// Describes a predefined definition with its blocks spelled out.
    pub fn from_definition(definition: StateDefinition) -> Self {
        Self {
            definition: None,
            expected_covariance_dim: Some(definition.covariance_dim()),
            blocks: definition.state_list().as_slice().to_vec(),
        }
    }

    /// Renders the configuration as TOML, e.g. to seed a new definition file.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Resolves and validates the definition.
    pub fn into_layout(self) -> Result<Arc<StateLayout>, LoadError> {
        let (list, expected) = if !self.blocks.is_empty() {
            if let Some(name) = &self.definition {
                warn!("Both `definition = \"{name}\"` and explicit blocks given; using the blocks.");
            }
            let list = StateList::new(self.blocks);
            let expected = self
                .expected_covariance_dim
                .ok_or(LoadError::MissingCovarianceDim)?;
            (list, expected)
        } else if let Some(name) = self.definition {
            let definition =
                StateDefinition::by_name(&name).ok_or(LoadError::UnknownDefinition(name))?;
            let expected = self
                .expected_covariance_dim
                .unwrap_or(definition.covariance_dim());
            (definition.state_list(), expected)
        } else {
            return Err(LoadError::Empty);
        };

        Ok(StateLayout::build(list, expected)?)
    }
}

/// Parses a state definition from TOML text.
pub fn parse_state_definition(text: &str) -> Result<StateDefinitionConfig, LoadError> {
    Ok(Figment::new().merge(Toml::string(text)).extract()?)
}

/// Loads a state definition file.
pub fn load_state_definition(path: impl AsRef<Path>) -> Result<StateDefinitionConfig, LoadError> {
    let path = path.as_ref();
    info!("Loading state definition from: {:?}", path);
    let config: StateDefinitionConfig = Figment::new().merge(Toml::file(path)).extract()?;
    info!(
        "Loaded state definition with {} explicit blocks{}",
        config.blocks.len(),
        config
            .definition
            .as_deref()
            .map(|d| format!(", definition `{d}`"))
            .unwrap_or_default()
    );
    Ok(config)
}
