//! Rarity-diverse "notable" selection across games.

use std::collections::HashSet;

use crate::{
    models::{Achievement, Game, GameRef},
    rarity::{compare_by_rarity, Rarity},
};

use super::{
    normalize::{normalize_with_id, JitterSource},
    record::RawAchievementRecord,
};

/// Size of the notable showcase.
pub const DEFAULT_NOTABLE_COUNT: usize = 6;
/// Items taken from each of the legendary, epic and rare tiers.
pub const PER_TIER_QUOTA: usize = 2;
/// Games sampled for the showcase.
pub const POPULAR_GAME_LIMIT: usize = 5;
/// Unlocked achievements contributed by each sampled game.
pub const NOTABLE_PER_GAME: usize = 2;

const QUOTA_TIERS: [Rarity; 3] = [Rarity::Legendary, Rarity::Epic, Rarity::Rare];

/// Pick up to `target_count` achievements spanning as many tiers as possible.
///
/// Up to [`PER_TIER_QUOTA`] items come from each of legendary, epic and rare
/// (rarest first), commons fill the remainder, and a pool too small to reach
/// the target is returned whole in rarity order. Ids are never repeated.
pub fn curate_notable(pool: &[Achievement], target_count: usize) -> Vec<Achievement> {
    if target_count == 0 {
        return Vec::new();
    }

    let mut sorted: Vec<&Achievement> = pool.iter().collect();
    sorted.sort_by(|a, b| compare_by_rarity(a, b));
    let mut seen = HashSet::new();
    sorted.retain(|achievement| {
        let achievement: &Achievement = *achievement;
        seen.insert(achievement.id())
    });

    let mut selected: Vec<&Achievement> = Vec::with_capacity(target_count);
    for tier in QUOTA_TIERS {
        selected.extend(
            sorted
                .iter()
                .filter(|achievement| achievement.rarity() == tier)
                .take(PER_TIER_QUOTA)
                .copied(),
        );
    }

    if selected.len() < target_count {
        let missing = target_count - selected.len();
        selected.extend(
            sorted
                .iter()
                .filter(|achievement| achievement.rarity() == Rarity::Common)
                .take(missing)
                .copied(),
        );
    }

    if selected.len() < target_count {
        selected = sorted;
    }

    selected.truncate(target_count);
    selected.into_iter().cloned().collect()
}

/// The `limit` games with the highest completion percentage.
pub fn popular_games(games: &[Game], limit: usize) -> Vec<&Game> {
    let mut ranked: Vec<&Game> = games.iter().collect();
    ranked.sort_by(|a, b| b.achievement_percentage.total_cmp(&a.achievement_percentage));
    ranked.truncate(limit);
    ranked
}

/// Showcase candidates from one game's live records: the first unlocked ones.
pub fn notable_from_records(
    game: &GameRef,
    records: &[RawAchievementRecord],
    jitter: &mut dyn JitterSource,
) -> Vec<Achievement> {
    records
        .iter()
        .filter(|record| record.achieved)
        .take(NOTABLE_PER_GAME)
        .enumerate()
        .map(|(index, record)| {
            normalize_with_id(format!("notable-{}-{}", game.id, index), &game.name, record, jitter)
        })
        .collect()
}
