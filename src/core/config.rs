//! Content and registry configuration
//!
//! Defaults applied when species content leaves a field out, and where the
//! content loader looks for its files.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::error::SpeciesError;

/// Configuration for species content loading
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpeciesConfig {
    /// Root directory scanned recursively for species `.toml` files
    pub content_dir: PathBuf,

    /// File name (relative to `content_dir`) holding the census tag order.
    ///
    /// This file is never parsed as a species file.
    pub census_order_file: String,

    /// Spawn rate given to species that do not declare one
    pub default_spawn_rate: f32,

    /// Spawn limit given to species that do not declare one
    pub default_spawn_limit: u32,

    /// Tags starting with this prefix are shown in the encyclopedia
    pub pedia_tag_prefix: String,
}

impl Default for SpeciesConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("data/species"),
            census_order_file: "census_order.toml".to_string(),
            default_spawn_rate: 1.0,
            default_spawn_limit: 99999,
            pedia_tag_prefix: "PEDIA_".to_string(),
        }
    }
}

impl SpeciesConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, SpeciesError> {
        let config: SpeciesConfig =
            toml::from_str(content).map_err(|e| SpeciesError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a config file
    pub fn from_file(path: &Path) -> Result<Self, SpeciesError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SpeciesError::InvalidConfig(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), SpeciesError> {
        if !self.default_spawn_rate.is_finite() || self.default_spawn_rate < 0.0 {
            return Err(SpeciesError::InvalidConfig(format!(
                "default_spawn_rate ({}) must be finite and non-negative",
                self.default_spawn_rate
            )));
        }

        if self.census_order_file.is_empty() {
            return Err(SpeciesError::InvalidConfig(
                "census_order_file must not be empty".into(),
            ));
        }

        if self.pedia_tag_prefix.is_empty() {
            return Err(SpeciesError::InvalidConfig(
                "pedia_tag_prefix must not be empty".into(),
            ));
        }

        Ok(())
    }
}

// === GLOBAL CONFIG ACCESS ===

use std::sync::OnceLock;

static CONFIG: OnceLock<SpeciesConfig> = OnceLock::new();

/// Get the global species config (initializes with defaults if not set)
pub fn config() -> &'static SpeciesConfig {
    CONFIG.get_or_init(SpeciesConfig::default)
}

/// Set the global species config (can only be called once)
///
/// Returns Err if config was already set.
pub fn set_config(config: SpeciesConfig) -> Result<(), SpeciesConfig> {
    CONFIG.set(config)
}
