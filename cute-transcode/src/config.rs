//! Codec configuration, read from a TOML file such as:
//!
//! ```toml
//! id_prefix = "import-"
//! id_length = 22
//! default_link_type = "Entry"
//! array_comparison = "multiset"
//! ```

use cute_types::{DEFAULT_ID_LENGTH, DEFAULT_ID_PREFIX};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

use crate::ConfigError;

/// How two values of an `Array` field are compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrayComparison {
    /// Items must match in the same order.
    #[default]
    Ordered,
    /// Items must match as a multiset; order is ignored.
    Multiset,
}

/// Tunables shared by every codec compiled from one configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Prefix of ids generated for new entries.
    pub id_prefix: String,
    /// Random characters following the prefix.
    pub id_length: usize,
    /// Link type used when a field does not declare one.
    pub default_link_type: String,
    pub array_comparison: ArrayComparison,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            id_prefix: DEFAULT_ID_PREFIX.to_string(),
            id_length: DEFAULT_ID_LENGTH,
            default_link_type: "Entry".to_string(),
            array_comparison: ArrayComparison::Ordered,
        }
    }
}

impl CodecConfig {
    /// Parses a configuration; absent keys take their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Reads a configuration file, failing on I/O or parse errors.
    pub fn try_load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Reads a configuration file, falling back to defaults when it is
    /// missing or malformed.
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!("No codec config found at {:?}, using defaults", path);
            return Self::default();
        }

        match Self::try_load_from(path) {
            Ok(config) => {
                info!("Loaded codec config from {:?}", path);
                config
            }
            Err(e) => {
                warn!(
                    "Failed to load codec config {:?}: {}. Falling back to defaults.",
                    path, e
                );
                Self::default()
            }
        }
    }
}
