//! Shared domain models.

use serde::{Deserialize, Serialize};

use crate::rarity::{classify_rarity, Rarity};

/// Percentage substituted for missing or garbled unlock statistics.
pub const FALLBACK_UNLOCK_PERCENTAGE: f64 = 100.0;

/// A game in the player's library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    /// Identifier scoped to this dashboard (e.g. `game-440`).
    pub id: String,
    /// Steam catalogue identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    /// Display name.
    pub name: String,
    /// Capsule artwork URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Total playtime in hours.
    #[serde(default)]
    pub hours_played: f64,
    /// Aggregate completion reported by the source, `0..=100`.
    #[serde(default)]
    pub achievement_percentage: f64,
    /// Number of achievements the game offers, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_achievements: Option<u32>,
}

impl Game {
    /// Steam app id, falling back to the numeric suffix of `game-{appid}` ids.
    pub fn resolved_app_id(&self) -> String {
        resolve_app_id(self.app_id.as_deref(), &self.id)
    }

    /// Minimal identity used when retrieving achievements.
    pub fn to_ref(&self) -> GameRef {
        GameRef {
            id: self.id.clone(),
            name: self.name.clone(),
            app_id: Some(self.resolved_app_id()),
        }
    }
}

/// Identity of a game as far as achievement retrieval is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameRef {
    /// Cache key.
    pub id: String,
    /// Display name, also used to pick a fallback template.
    pub name: String,
    /// Steam catalogue identifier.
    pub app_id: Option<String>,
}

impl GameRef {
    /// Build a reference without an app id.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            app_id: None,
        }
    }

    /// Attach a Steam app id.
    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    /// Steam app id, falling back to the numeric suffix of `game-{appid}` ids.
    pub fn resolved_app_id(&self) -> String {
        resolve_app_id(self.app_id.as_deref(), &self.id)
    }
}

fn resolve_app_id(app_id: Option<&str>, id: &str) -> String {
    app_id
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| id.trim_start_matches("game-").to_string())
}

impl From<&Game> for GameRef {
    fn from(game: &Game) -> Self {
        game.to_ref()
    }
}

/// A normalized achievement ready for presentation.
///
/// The rarity tier is computed from the unlock percentage on construction and
/// cannot be set independently.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    id: String,
    name: String,
    description: String,
    game: String,
    unlock_percentage: f64,
    rarity: Rarity,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_url: Option<String>,
}

impl Achievement {
    /// Construct an achievement, sanitizing the percentage and deriving its rarity.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        game: impl Into<String>,
        unlock_percentage: f64,
    ) -> Self {
        let unlock_percentage = sanitize_percentage(unlock_percentage);
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            game: game.into(),
            unlock_percentage,
            rarity: classify_rarity(unlock_percentage),
            image_url: None,
        }
    }

    /// Attach an icon URL, ignoring empty values.
    pub fn with_image_url(mut self, image_url: Option<String>) -> Self {
        self.image_url = image_url.filter(|url| !url.trim().is_empty());
        self
    }
}

#[allow(missing_docs)]
impl Achievement {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn game(&self) -> &str {
        &self.game
    }

    pub fn unlock_percentage(&self) -> f64 {
        self.unlock_percentage
    }

    pub fn rarity(&self) -> Rarity {
        self.rarity
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }
}

/// Clamp a percentage into `[0, 100]`, mapping garbage to the common default.
pub fn sanitize_percentage(value: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value.min(100.0)
    } else {
        FALLBACK_UNLOCK_PERCENTAGE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rarity_follows_percentage() {
        let achievement = Achievement::new("g1-achievement-0", "Head Hunter", "", "CS2", 22.8);
        assert_eq!(achievement.rarity(), Rarity::Common);

        let achievement = Achievement::new("g1-achievement-1", "Global Elite", "", "CS2", 0.4);
        assert_eq!(achievement.rarity(), Rarity::Legendary);
    }

    #[test]
    fn garbled_percentages_become_common() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, -3.0] {
            let achievement = Achievement::new("id", "Name", "", "Game", value);
            assert_eq!(achievement.unlock_percentage(), FALLBACK_UNLOCK_PERCENTAGE);
            assert_eq!(achievement.rarity(), Rarity::Common);
        }
        assert_eq!(sanitize_percentage(140.0), 100.0);
    }

    #[test]
    fn resolves_app_id_from_game_id() {
        let game = Game {
            id: "game-440".to_string(),
            app_id: None,
            name: "Team Fortress 2".to_string(),
            image_url: None,
            hours_played: 120.0,
            achievement_percentage: 65.0,
            total_achievements: Some(520),
        };
        assert_eq!(game.resolved_app_id(), "440");
        assert_eq!(GameRef::from(&game).app_id.as_deref(), Some("440"));

        let empty = GameRef::new("game-730", "Counter-Strike 2").with_app_id("");
        assert_eq!(empty.resolved_app_id(), "730");
        let explicit = GameRef::new("g1", "Portal").with_app_id("400");
        assert_eq!(explicit.resolved_app_id(), "400");
    }

    #[test]
    fn serializes_with_dashboard_field_names() -> anyhow::Result<()> {
        let achievement =
            Achievement::new("a", "Beaconator", "Create a full beacon", "Minecraft", 4.1)
                .with_image_url(Some(String::new()));
        let value = serde_json::to_value(&achievement)?;
        assert_eq!(value["unlockPercentage"], serde_json::json!(4.1));
        assert_eq!(value["rarity"], serde_json::json!("epic"));
        assert!(value.get("imageUrl").is_none());
        Ok(())
    }
}
