//! Client configuration loaded from YAML

use crate::batch::DEFAULT_CHUNK_SIZE;
use crate::cache::CachePolicy;
use crate::resolve::LookupOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors reading or validating a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_curie_prefixes() -> Vec<String> {
    ["FBbt", "RO", "BFO"].into_iter().map(String::from).collect()
}

/// Session settings. Every field has a default, so an empty file is valid.
///
/// ```yaml
/// chunk_size: 2500
/// cache:
///   enabled: true
///   capacity: 10000
/// lookup:
///   include_individuals: false
///   prefixes: [FBbt, VFBexp]
/// curie_prefixes: [FBbt, RO, BFO]
/// term_store: /var/cache/vfb/terms.db
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Keys per backend request in batched fetches
    pub chunk_size: usize,
    pub cache: CachePolicy,
    pub lookup: LookupOptions,
    /// Id prefixes written as curies in DL expressions
    pub curie_prefixes: Vec<String>,
    /// SQLite document cache consulted before the backend
    pub term_store: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            cache: CachePolicy::default(),
            lookup: LookupOptions::default(),
            curie_prefixes: default_curie_prefixes(),
            term_store: None,
        }
    }
}

impl ClientConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: ClientConfig = if yaml.trim().is_empty() {
            ClientConfig::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// `<config dir>/vfb-connect/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("vfb-connect").join("config.yaml"))
    }

    /// The file at [`default_path`](Self::default_path) when it exists,
    /// defaults otherwise.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::Invalid("chunk_size must be at least 1".into()));
        }
        if self.cache.capacity == Some(0) {
            return Err(ConfigError::Invalid("cache.capacity must be at least 1".into()));
        }
        Ok(())
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_cache(mut self, cache: CachePolicy) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_lookup(mut self, lookup: LookupOptions) -> Self {
        self.lookup = lookup;
        self
    }

    pub fn with_term_store(mut self, path: impl Into<PathBuf>) -> Self {
        self.term_store = Some(path.into());
        self
    }
}
