use std::{
    fs,
    future::Future,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    achievement::{RawAchievementRecord, SourceFailure, SourceResult},
    models::Game,
};

use super::AchievementSource;

/// Read-only directory of flat JSON snapshots used when the service is down.
#[derive(Debug, Clone)]
pub struct FallbackStore {
    root: PathBuf,
}

impl FallbackStore {
    /// Store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory the store reads from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load and decode `name`, returning `None` if the file does not exist.
    pub fn load_json<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        let path = self.root.join(name);
        if !path.exists() {
            debug!("fallback file {} not found", path.display());
            return Ok(None);
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("failed to read fallback file {}", path.display()))?;
        let value = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse fallback file {}", path.display()))?;
        Ok(Some(value))
    }

    /// Library snapshot for `steam_id`, empty when no snapshot exists.
    pub fn library(&self, steam_id: &str) -> Result<Vec<LibraryEntry>> {
        Ok(self
            .load_json::<Vec<LibraryEntry>>(&library_file(steam_id))?
            .unwrap_or_default())
    }

    /// Games derived from the library snapshot.
    pub fn owned_games(&self, steam_id: &str) -> Result<Vec<Game>> {
        Ok(self
            .library(steam_id)?
            .iter()
            .map(LibraryEntry::to_game)
            .collect())
    }
}

/// File name of a player's library snapshot.
pub fn library_file(steam_id: &str) -> String {
    format!("steam_achievements_{steam_id}.json")
}

/// One game in a library snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct LibraryEntry {
    /// Steam app id, numeric or string.
    #[serde(default)]
    pub appid: Value,
    /// Game title.
    #[serde(default)]
    pub name: Option<String>,
    /// Achievements recorded for the game.
    #[serde(default, deserialize_with = "deserialize_records")]
    pub achievements: Vec<RawAchievementRecord>,
}

fn deserialize_records<'de, D>(
    deserializer: D,
) -> std::result::Result<Vec<RawAchievementRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Value>>::deserialize(deserializer)?
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(index, value)| RawAchievementRecord::from_value_lenient(index, value))
        .collect())
}

impl LibraryEntry {
    /// App id rendered as a string, empty when absent.
    pub fn app_id(&self) -> String {
        match &self.appid {
            Value::Number(num) => num.to_string(),
            Value::String(s) => s.trim().to_string(),
            _ => String::new(),
        }
    }

    /// Dashboard game entry.
    ///
    /// Snapshots carry no playtime, so hours, completion and achievement
    /// counts are derived deterministically from the app id.
    pub fn to_game(&self) -> Game {
        let app_id = self.app_id();
        let seed = app_id.parse::<u64>().ok().filter(|n| *n > 0).unwrap_or(1);
        Game {
            id: format!("game-{app_id}"),
            app_id: Some(app_id.clone()).filter(|id| !id.is_empty()),
            name: self
                .name
                .clone()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| "Unknown Game".to_string()),
            image_url: Some(format!(
                "https://cdn.cloudflare.steamstatic.com/steam/apps/{app_id}/capsule_231x87.jpg"
            )),
            hours_played: (5 + (seed % 29) * 10) as f64,
            achievement_percentage: (10 + (seed % 17) * 5) as f64,
            total_achievements: Some((15 + (seed % 8) * 5) as u32),
        }
    }
}

/// Serves achievement records out of a library snapshot.
#[derive(Debug, Clone)]
pub struct FallbackAchievementSource {
    store: FallbackStore,
    steam_id: String,
}

impl FallbackAchievementSource {
    /// Source reading `steam_id`'s snapshot from `store`.
    pub fn new(store: FallbackStore, steam_id: impl Into<String>) -> Self {
        Self {
            store,
            steam_id: steam_id.into(),
        }
    }

    fn records_for(&self, app_id: &str) -> SourceResult {
        match self.store.library(&self.steam_id) {
            Ok(entries) if entries.is_empty() => SourceResult::Failure(SourceFailure::Unavailable(
                format!("no snapshot for {}", self.steam_id),
            )),
            Ok(entries) => SourceResult::Records(
                entries
                    .into_iter()
                    .find(|entry| entry.app_id() == app_id)
                    .map(|entry| entry.achievements)
                    .unwrap_or_default(),
            ),
            Err(err) => {
                warn!("fallback snapshot unreadable: {err:#}");
                SourceResult::Failure(SourceFailure::Malformed(err.to_string()))
            }
        }
    }
}

impl AchievementSource for FallbackAchievementSource {
    fn fetch(&self, app_id: &str) -> impl Future<Output = SourceResult> + Send {
        let result = self.records_for(app_id);
        async move { result }
    }
}
