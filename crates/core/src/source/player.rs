use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::{config::AppConfig, models::Game, profile::{PcsrProfile, PlayerStats}};

use super::fallback::FallbackStore;

/// PCSR snapshot file name.
pub const PCSR_PROFILE_FILE: &str = "steam_pcsr_profile_english.json";

/// Failure to obtain player data from any source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Live service and fallback snapshot both failed.
    #[error("steam data service unavailable for {steam_id}")]
    Unavailable {
        /// Profile that was requested.
        steam_id: String,
    },
    /// A fallback file exists but could not be used.
    #[error(transparent)]
    Fallback(#[from] anyhow::Error),
}

/// Fetches player-level data: stats, PCSR profile and the game library.
#[derive(Debug, Clone)]
pub struct PlayerSource {
    client: reqwest::Client,
    base_url: String,
    fallback: FallbackStore,
}

impl PlayerSource {
    /// Build from configuration.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            fallback: FallbackStore::new(&config.fallback_dir),
        })
    }

    /// Fallback snapshot directory.
    pub fn fallback(&self) -> &FallbackStore {
        &self.fallback
    }

    /// Player stats from the live service.
    ///
    /// A failed request is retried once; if that fails too the stats
    /// snapshot in the fallback directory is used.
    pub async fn player_stats(&self, steam_id: &str) -> Result<PlayerStats, SourceError> {
        let url = format!("{}/steam/datas?steamid={}", self.base_url, steam_id);
        match self.fetch_stats(&url).await {
            Ok(stats) => return Ok(stats),
            Err(err) => warn!("player stats request failed: {err:#}"),
        }

        info!("retrying player stats for {steam_id}");
        match self.fetch_stats(&format!("{url}&retry=true")).await {
            Ok(stats) => return Ok(stats),
            Err(err) => warn!("player stats retry failed: {err:#}"),
        }

        match self.fallback.load_json::<PlayerStats>(&stats_file(steam_id))? {
            Some(stats) => {
                info!("using stored player stats for {steam_id}");
                Ok(stats)
            }
            None => Err(SourceError::Unavailable {
                steam_id: steam_id.to_string(),
            }),
        }
    }

    /// PCSR profile from the snapshot, or the built-in default.
    pub fn pcsr_profile(&self) -> PcsrProfile {
        match self.fallback.load_json::<PcsrProfile>(PCSR_PROFILE_FILE) {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                info!("no stored PCSR profile; using default");
                PcsrProfile::default_profile()
            }
            Err(err) => {
                warn!("stored PCSR profile unusable: {err:#}");
                PcsrProfile::default_profile()
            }
        }
    }

    /// Game library from the snapshot.
    pub fn owned_games(&self, steam_id: &str) -> Result<Vec<Game>> {
        self.fallback.owned_games(steam_id)
    }

    async fn fetch_stats(&self, url: &str) -> Result<PlayerStats> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?
            .error_for_status()?;
        let body: Value = response.json().await.context("invalid player stats body")?;
        stats_from_body(body)
    }
}

/// Stats snapshot file name for `steam_id`.
pub fn stats_file(steam_id: &str) -> String {
    format!("steam_player_stats_{steam_id}.json")
}

/// The service answers with an array whose first element holds the stats.
fn stats_from_body(body: Value) -> Result<PlayerStats> {
    let first = match body {
        Value::Array(mut items) if !items.is_empty() => items.swap_remove(0),
        other => return Err(anyhow!("unexpected player stats payload: {other}")),
    };
    if !first.is_object() {
        return Err(anyhow!("player stats entry is not an object"));
    }
    serde_json::from_value(first).context("failed to decode player stats")
}
