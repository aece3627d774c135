//! Lighting settings that survive a restart.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use vr_survival_core::Rgba;

/// Scene lighting the host applies; the only state persisted across rounds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lighting {
    /// Ambient light intensity.
    pub ambient_intensity: f32,
    /// Reflection intensity.
    pub reflection_intensity: f32,
    /// Ambient light colour.
    pub ambient_light: Rgba,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            ambient_intensity: 3.0,
            reflection_intensity: 1.0,
            ambient_light: Rgba::WHITE,
        }
    }
}

/// Errors raised while reading or writing persisted settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file exists but could not be read.
    #[error("failed to read settings from {path:?}: {source}")]
    Read {
        /// File that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The settings could not be written.
    #[error("failed to write settings to {path:?}: {source}")]
    Write {
        /// File that was written.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The settings file is not valid TOML for [`Lighting`].
    #[error("failed to parse settings in {path:?}: {source}")]
    Parse {
        /// File that was parsed.
        path: PathBuf,
        /// Underlying parse failure.
        #[source]
        source: toml::de::Error,
    },
    /// The settings could not be encoded.
    #[error("failed to encode settings: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// Persistent home of the lighting settings.
pub trait SettingsStore {
    /// Loads the stored settings, or `None` when nothing was stored yet.
    fn load(&self) -> Result<Option<Lighting>, SettingsError>;

    /// Replaces the stored settings.
    fn save(&mut self, lighting: &Lighting) -> Result<(), SettingsError>;
}

/// Stores settings in a TOML file.
#[derive(Clone, Debug)]
pub struct TomlFileStore {
    path: PathBuf,
}

impl TomlFileStore {
    /// Creates a store backed by the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File the settings live in.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for TomlFileStore {
    fn load(&self) -> Result<Option<Lighting>, SettingsError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(SettingsError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        let lighting = toml::from_str(&contents).map_err(|source| SettingsError::Parse {
            path: self.path.clone(),
            source,
        })?;
        Ok(Some(lighting))
    }

    fn save(&mut self, lighting: &Lighting) -> Result<(), SettingsError> {
        let contents = toml::to_string(lighting)?;
        fs::write(&self.path, contents).map_err(|source| SettingsError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

/// Keeps settings in memory; used by tests and hosts without storage.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    stored: Option<Lighting>,
    saves: usize,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `lighting`.
    #[must_use]
    pub fn with(lighting: Lighting) -> Self {
        Self {
            stored: Some(lighting),
            saves: 0,
        }
    }

    /// Settings currently held.
    #[must_use]
    pub fn stored(&self) -> Option<Lighting> {
        self.stored
    }

    /// Number of successful saves.
    #[must_use]
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> Result<Option<Lighting>, SettingsError> {
        Ok(self.stored)
    }

    fn save(&mut self, lighting: &Lighting) -> Result<(), SettingsError> {
        self.stored = Some(*lighting);
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_file(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "vr-survival-{name}-{}.toml",
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn missing_file_loads_nothing() {
        let store = TomlFileStore::new(scratch_file("missing"));
        assert!(store.load().expect("missing file is not an error").is_none());
    }

    #[test]
    fn file_store_keeps_saved_lighting() {
        let path = scratch_file("saved");
        let mut store = TomlFileStore::new(&path);
        let lighting = Lighting {
            ambient_intensity: 1.5,
            reflection_intensity: 0.25,
            ambient_light: Rgba::new(0.5, 0.4, 0.3, 1.0),
        };
        store.save(&lighting).expect("save succeeds");

        let reopened = TomlFileStore::new(&path);
        assert_eq!(reopened.load().expect("load succeeds"), Some(lighting));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let path = scratch_file("partial");
        fs::write(&path, "ambient_intensity = 2.0\n").expect("write fixture");
        let store = TomlFileStore::new(&path);
        let lighting = store.load().expect("load succeeds").expect("stored");
        assert_eq!(lighting.ambient_intensity, 2.0);
        assert_eq!(lighting.reflection_intensity, 1.0);
        assert_eq!(lighting.ambient_light, Rgba::WHITE);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let path = scratch_file("malformed");
        fs::write(&path, "ambient_intensity = \"bright\"\n").expect("write fixture");
        let store = TomlFileStore::new(&path);
        assert!(matches!(store.load(), Err(SettingsError::Parse { .. })));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn memory_store_counts_saves() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load().expect("infallible"), None);
        store.save(&Lighting::default()).expect("infallible");
        assert_eq!(store.saves(), 1);
        assert_eq!(store.stored(), Some(Lighting::default()));
    }
}
