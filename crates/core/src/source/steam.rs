use std::future::Future;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::{
    achievement::{record::parse_envelope, SourceFailure, SourceResult},
    config::AppConfig,
};

use super::AchievementSource;

/// Reads a player's per-game achievements from the Steam data service.
#[derive(Debug, Clone)]
pub struct SteamAchievementSource {
    client: reqwest::Client,
    base_url: String,
    steam_id: String,
}

impl SteamAchievementSource {
    /// Build a source for `steam_id` using the configured endpoint and timeout.
    pub fn new(config: &AppConfig, steam_id: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            steam_id: steam_id.into(),
        })
    }

    /// Endpoint URL for `app_id`.
    pub fn achievements_url(&self, app_id: &str) -> String {
        format!(
            "{}/steam/achievements?steamid={}&appid={}",
            self.base_url, self.steam_id, app_id
        )
    }

    async fn fetch_records(&self, app_id: &str) -> SourceResult {
        let url = self.achievements_url(app_id);
        debug!("requesting {url}");

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(err) => {
                warn!("achievement request for app {app_id} failed: {err}");
                return SourceResult::Failure(classify_error(&err));
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!("achievement request for app {app_id} returned {status}");
            return SourceResult::Failure(SourceFailure::Status(status.as_u16()));
        }

        match response.text().await {
            Ok(body) => parse_envelope(&body),
            Err(err) => SourceResult::Failure(classify_error(&err)),
        }
    }
}

impl AchievementSource for SteamAchievementSource {
    fn fetch(&self, app_id: &str) -> impl Future<Output = SourceResult> + Send {
        self.fetch_records(app_id)
    }
}

pub(crate) fn classify_error(err: &reqwest::Error) -> SourceFailure {
    if err.is_timeout() {
        SourceFailure::Timeout
    } else if let Some(status) = err.status() {
        SourceFailure::Status(status.as_u16())
    } else {
        SourceFailure::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_endpoint_urls() -> Result<()> {
        let config = AppConfig {
            api_base_url: "https://example.invalid/".to_string(),
            ..AppConfig::default()
        };
        let source = SteamAchievementSource::new(&config, "765")?;
        assert_eq!(
            source.achievements_url("440"),
            "https://example.invalid/steam/achievements?steamid=765&appid=440"
        );
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_host_is_a_failure() -> Result<()> {
        let config = AppConfig {
            api_base_url: "http://127.0.0.1:9".to_string(),
            request_timeout_secs: 2,
            ..AppConfig::default()
        };
        let source = SteamAchievementSource::new(&config, "765")?;
        assert!(matches!(source.fetch("440").await, SourceResult::Failure(_)));
        Ok(())
    }
}
