//! Per-game retrieval and the notable showcase.

use tracing::{debug, info, warn};

use crate::{
    models::{Achievement, Game, GameRef},
    session::PlayerSession,
    source::AchievementSource,
};

use super::{
    normalize::normalize_record,
    notable::{
        curate_notable, notable_from_records, popular_games, DEFAULT_NOTABLE_COUNT,
        POPULAR_GAME_LIMIT,
    },
    record::SourceResult,
    templates::generate_fallback,
};

/// Turns source payloads into cached, classified achievement lists.
#[derive(Debug, Clone)]
pub struct AchievementCurator {
    notable_count: usize,
    game_limit: usize,
}

impl Default for AchievementCurator {
    fn default() -> Self {
        Self {
            notable_count: DEFAULT_NOTABLE_COUNT,
            game_limit: POPULAR_GAME_LIMIT,
        }
    }
}

impl AchievementCurator {
    /// Curator producing `notable_count` showcase items from the top `game_limit` games.
    pub fn new(notable_count: usize, game_limit: usize) -> Self {
        Self {
            notable_count,
            game_limit,
        }
    }

    /// Target size of the notable showcase.
    pub fn notable_count(&self) -> usize {
        self.notable_count
    }

    /// Normalized achievements for `game`, cached in `session`.
    ///
    /// Empty or failed sources fall back to the title's template; this never
    /// fails. A cache hit ignores `source` entirely.
    pub fn get_achievements_for_game(
        &self,
        session: &PlayerSession,
        game: &GameRef,
        source: SourceResult,
    ) -> Vec<Achievement> {
        if let Some(cached) = session.cached(&game.id) {
            debug!(game_id = %game.id, "achievement cache hit");
            return cached;
        }

        let achievements = match source.usable_records() {
            Some(records) => {
                info!("fetched {} achievements for {}", records.len(), game.name);
                session.with_jitter(|jitter| {
                    records
                        .iter()
                        .enumerate()
                        .map(|(index, record)| normalize_record(game, index, record, jitter))
                        .collect::<Vec<_>>()
                })
            }
            None => {
                match &source {
                    SourceResult::Failure(reason) => {
                        warn!(
                            "achievements for {} unavailable ({reason}); using template",
                            game.name
                        )
                    }
                    SourceResult::Records(_) => {
                        info!("no achievements found for {}; using template", game.name)
                    }
                }
                session.with_jitter(|jitter| generate_fallback(game, jitter))
            }
        };

        session.store(&game.id, achievements.clone());
        achievements
    }

    /// Fetch through `source` unless the game is already cached.
    pub async fn fetch_achievements_for_game<S>(
        &self,
        session: &PlayerSession,
        source: &S,
        game: &GameRef,
    ) -> Vec<Achievement>
    where
        S: AchievementSource + ?Sized,
    {
        if let Some(cached) = session.cached(&game.id) {
            return cached;
        }

        let result = source.fetch(&game.resolved_app_id()).await;
        self.get_achievements_for_game(session, game, result)
    }

    /// Rarity-diverse selection from an already assembled pool.
    pub fn curate_notable(&self, pool: &[Achievement]) -> Vec<Achievement> {
        curate_notable(pool, self.notable_count)
    }

    /// Build the notable showcase from the player's most completed games.
    ///
    /// Each game's batch is normalized in full before it joins the pool;
    /// games whose source fails are skipped.
    pub async fn collect_notable<S>(
        &self,
        session: &PlayerSession,
        source: &S,
        games: &[Game],
    ) -> Vec<Achievement>
    where
        S: AchievementSource + ?Sized,
    {
        let mut pool = Vec::new();
        for game in popular_games(games, self.game_limit) {
            let Some(app_id) = game.app_id.as_deref().filter(|id| !id.is_empty()) else {
                continue;
            };

            match source.fetch(app_id).await {
                SourceResult::Records(records) => {
                    let game_ref = game.to_ref();
                    let batch = session
                        .with_jitter(|jitter| notable_from_records(&game_ref, &records, jitter));
                    pool.extend(batch);
                }
                SourceResult::Failure(reason) => {
                    warn!("skipping {} for notable achievements: {reason}", game.name);
                }
            }
        }

        info!("selecting notable achievements from {} candidates", pool.len());
        self.curate_notable(&pool)
    }
}
