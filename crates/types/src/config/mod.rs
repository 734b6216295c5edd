// Path: crates/types/src/config/mod.rs

//! Shared configuration structures for the identity resolver and its tooling.
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How a rotation's signing key must rank relative to the key it replaces.
///
/// Lower active-key index means higher priority.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SignerPriority {
    /// The signer's index must be less than or equal to the replaced key's index.
    /// A key may therefore replace itself.
    #[default]
    EqualOrHigher,
    /// The signer's index must be strictly less than the replaced key's index.
    StrictlyHigher,
}

impl SignerPriority {
    /// Returns true if a signer at `signer_index` may replace the key at `old_index`.
    pub fn permits(self, signer_index: usize, old_index: usize) -> bool {
        match self {
            Self::EqualOrHigher => signer_index <= old_index,
            Self::StrictlyHigher => signer_index < old_index,
        }
    }
}

/// Configuration for the identity resolver.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct IdentityConfig {
    /// Priority rule applied by the rotation engine's signer gate.
    #[serde(default)]
    pub signer_priority: SignerPriority,
    /// Where a file-backed cache sink stores the serialized cache.
    #[serde(default)]
    pub cache_path: Option<PathBuf>,
    /// If true, the persistence callback runs after every cache mutation.
    #[serde(default = "default_persist_on_change")]
    pub persist_on_change: bool,
}

fn default_persist_on_change() -> bool {
    true
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            signer_priority: SignerPriority::default(),
            cache_path: None,
            persist_on_change: default_persist_on_change(),
        }
    }
}

impl IdentityConfig {
    /// Parses a configuration from TOML text. Missing fields take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Reads and parses a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}
