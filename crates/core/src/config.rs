//! Application configuration.
//!
//! Values are layered: built-in defaults, then `config.json` under the
//! user's config directory, then `PLAYERDNA_*` environment variables.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Directory under the platform config dir holding our files.
pub const CONFIG_DIR: &str = "playerdna";
/// Configuration file name.
pub const CONFIG_FILE: &str = "config.json";
/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "PLAYERDNA";

/// Upstream Steam data service.
pub const DEFAULT_API_BASE_URL: &str = "https://achievements-colosseumhackaton-backend.onrender.com";
/// Profile shown when none is specified.
pub const DEFAULT_STEAM_ID: &str = "76561198068135033";

/// Runtime settings for sources and curation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the Steam data service.
    pub api_base_url: String,
    /// Steam id used when the caller does not pass one.
    pub steam_id: String,
    /// Per-request timeout.
    pub request_timeout_secs: u64,
    /// Directory holding flat JSON fallback files.
    pub fallback_dir: PathBuf,
    /// Size of the notable showcase.
    pub notable_count: usize,
    /// Number of games sampled for the showcase.
    pub game_limit: usize,
    /// Fixed seed for heuristic jitter; unset means thread RNG.
    pub jitter_seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            steam_id: DEFAULT_STEAM_ID.to_string(),
            request_timeout_secs: 60,
            fallback_dir: PathBuf::from("attached_assets"),
            notable_count: crate::achievement::DEFAULT_NOTABLE_COUNT,
            game_limit: crate::achievement::notable::POPULAR_GAME_LIMIT,
            jitter_seed: None,
        }
    }
}

impl AppConfig {
    /// Load from the default location plus environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load from `path` (optional on disk) plus environment overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .with_context(|| format!("failed to read configuration {}", path.display()))?;
        settings
            .try_deserialize()
            .with_context(|| format!("failed to parse configuration {}", path.display()))
    }

    /// Request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Write this configuration as pretty JSON, creating parent directories.
    pub fn persist(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create config directory {}", parent.display())
            })?;
        }
        let serialized =
            serde_json::to_string_pretty(self).context("failed to serialize configuration")?;
        fs::write(path, serialized)
            .with_context(|| format!("failed to write configuration {}", path.display()))
    }
}

/// Default configuration file path.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join(CONFIG_FILE)
}

/// Write the default configuration if no file exists yet.
pub fn ensure_default_config() -> Result<PathBuf> {
    let path = config_path();
    ensure_config_at(&path)?;
    Ok(path)
}

fn ensure_config_at(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    info!("writing default configuration to {}", path.display());
    AppConfig::default().persist(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = AppConfig::load_from(dir.path().join("absent.json"))?;
        assert_eq!(config.steam_id, DEFAULT_STEAM_ID);
        assert_eq!(config.notable_count, 6);
        assert_eq!(config.game_limit, 5);
        assert_eq!(config.request_timeout(), Duration::from_secs(60));
        Ok(())
    }

    #[test]
    fn file_values_override_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"steam_id":"42","notable_count":4,"jitter_seed":7}"#)?;
        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.steam_id, "42");
        assert_eq!(config.notable_count, 4);
        assert_eq!(config.jitter_seed, Some(7));
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        Ok(())
    }

    #[test]
    fn writes_default_once() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join(CONFIG_FILE);
        ensure_config_at(&path)?;
        assert!(path.exists());

        fs::write(&path, r#"{"steam_id":"custom"}"#)?;
        ensure_config_at(&path)?;
        assert_eq!(AppConfig::load_from(&path)?.steam_id, "custom");
        Ok(())
    }
}
