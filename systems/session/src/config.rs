//! Tuning for a whole session, loadable from TOML.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;
use vr_survival_system_armory::ArmoryConfig;
use vr_survival_system_director::DirectorConfig;
use vr_survival_system_enemy_ai::Tuning;
use vr_survival_system_interaction::InteractionConfig;
use vr_survival_system_locomotion::LocomotionConfig;
use vr_survival_world::{ArenaLayout, WorldConfig};

/// Every tuning value of a session. Missing sections and fields keep their
/// defaults.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// World tuning.
    pub world: WorldConfig,
    /// Arena layout.
    pub arena: ArenaLayout,
    /// Director tuning.
    pub director: DirectorConfig,
    /// Enemy behaviour tuning.
    pub enemies: Tuning,
    /// Armory tuning.
    pub armory: ArmoryConfig,
    /// Interaction rig tuning.
    pub interaction: InteractionConfig,
    /// Locomotion tuning.
    pub locomotion: LocomotionConfig,
}

/// Errors raised while loading a [`SessionConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read session config from {path:?}: {source}")]
    Read {
        /// File that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The configuration is not valid TOML for [`SessionConfig`].
    #[error("failed to parse session config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl SessionConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Reads and parses the configuration file at `path`.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        tracing::info!(path = %path.display(), "session config loaded");
        Ok(config)
    }
}
