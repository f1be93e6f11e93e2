// src/config.rs
//! Runtime configuration loaded from TOML with environment overrides.

use crate::recommender::{UserPreferences, DEFAULT_TOP_N};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_CONFIG_FILE: &str = "recommender.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub storage: StorageConfig,
    pub ranking: RankingConfig,
    /// Defaults merged under whatever the caller supplies per request.
    pub preferences: UserPreferences,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub listings_path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            listings_path: PathBuf::from("data/internships.csv"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Csv,
    Sqlite,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Csv,
            path: PathBuf::from("data/applications.csv"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub top_n: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl AppConfig {
    /// Load configuration. Resolution order for the file: `explicit`,
    /// then `RECOMMENDER_CONFIG`, then `recommender.toml`. A missing file
    /// means defaults; a broken one is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os("RECOMMENDER_CONFIG").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let mut config = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            let config = Self::from_toml_str(&content)
                .with_context(|| format!("Failed to parse config: {}", path.display()))?;
            info!("Loaded configuration from {}", path.display());
            config
        } else {
            info!("No config at {}, using defaults", path.display());
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid TOML configuration")
    }

    fn apply_env_overrides(&mut self) {
        if let Some(listings) = std::env::var_os("RECOMMENDER_LISTINGS") {
            self.data.listings_path = PathBuf::from(listings);
        }
        if let Some(db) = std::env::var_os("RECOMMENDER_DB") {
            self.storage = StorageConfig {
                backend: StorageBackend::Sqlite,
                path: PathBuf::from(db),
            };
        }
    }
}
