//! Turning raw records into [`Achievement`] values.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use regex::{Captures, Regex};

use crate::models::{Achievement, GameRef};

use super::record::RawAchievementRecord;

/// Name substituted when a record carries none.
pub const UNKNOWN_ACHIEVEMENT: &str = "Unknown Achievement";
/// Description used for achievements the player does not hold.
pub const NOT_YET_UNLOCKED: &str = "Not yet unlocked";
/// Width of the uniform jitter added to heuristic scores.
pub const JITTER_SPAN: f64 = 5.0;
/// Floor applied to heuristic scores after jitter.
pub const MIN_HEURISTIC_SCORE: f64 = 0.1;

static WORD_START_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(^|\s)(\w)").expect("invalid word start regex"));

static COMPLETION_KEYWORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)master|complete|perfect|all|platinum|gold|100%|finish")
        .expect("invalid completion keyword regex")
});

/// Source of uniform random samples in `[0, 1)`.
///
/// Heuristic scores and template sizes draw from this so tests can pin the
/// output with [`SeededJitter`] or [`ZeroJitter`].
pub trait JitterSource: Send {
    /// Next sample in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Jitter added to a heuristic seed, in `[0, JITTER_SPAN)`.
    fn jitter(&mut self) -> f64 {
        self.next_unit() * JITTER_SPAN
    }

    /// Uniform integer in `min..=max`.
    fn pick_count(&mut self, min: usize, max: usize) -> usize {
        if max <= min {
            return min;
        }
        let span = (max - min + 1) as f64;
        min + ((self.next_unit() * span) as usize).min(max - min)
    }
}

/// Deterministic jitter backed by a seeded ChaCha stream.
pub struct SeededJitter {
    rng: ChaCha8Rng,
}

impl SeededJitter {
    /// Create a generator from a fixed seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl JitterSource for SeededJitter {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Jitter drawn from the thread-local RNG.
#[derive(Default)]
pub struct ThreadJitter;

impl JitterSource for ThreadJitter {
    fn next_unit(&mut self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Always returns zero; heuristic scores collapse to their seeds.
#[derive(Default)]
pub struct ZeroJitter;

impl JitterSource for ZeroJitter {
    fn next_unit(&mut self) -> f64 {
        0.0
    }
}

/// Replace underscores with spaces and capitalise the first letter of each word.
///
/// Words start at the beginning of the name or after whitespace, so letters
/// following an apostrophe or hyphen keep their case.
pub fn format_achievement_name(raw: Option<&str>) -> String {
    let raw = raw
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(UNKNOWN_ACHIEVEMENT);
    let spaced = raw.replace('_', " ");
    WORD_START_RE
        .replace_all(&spaced, |caps: &Captures| {
            format!("{}{}", &caps[1], caps[2].to_uppercase())
        })
        .into_owned()
}

/// `Unlocked on M/D/YYYY` for held achievements with a timestamp.
pub fn describe_unlock(achieved: bool, unlocktime: Option<i64>) -> String {
    let unlocked_at = unlocktime
        .filter(|secs| achieved && *secs > 0)
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0));
    match unlocked_at {
        Some(at) => format!("Unlocked on {}", at.format("%-m/%-d/%Y")),
        None => NOT_YET_UNLOCKED.to_string(),
    }
}

/// Seed score for a name before jitter is applied.
pub fn heuristic_seed(formatted_name: &str) -> f64 {
    let length = formatted_name.chars().count();
    if COMPLETION_KEYWORD_RE.is_match(formatted_name) {
        0.5
    } else if length > 20 {
        3.0
    } else if length > 15 {
        7.0
    } else {
        15.0
    }
}

/// Synthetic unlock percentage for names without population data.
pub fn heuristic_score(formatted_name: &str, jitter: &mut dyn JitterSource) -> f64 {
    (heuristic_seed(formatted_name) + jitter.jitter()).max(MIN_HEURISTIC_SCORE)
}

/// Normalize one live record.
///
/// Trusted population percentages are used verbatim; everything else goes
/// through [`heuristic_score`].
pub fn normalize_record(
    game: &GameRef,
    index: usize,
    record: &RawAchievementRecord,
    jitter: &mut dyn JitterSource,
) -> Achievement {
    normalize_with_id(
        format!("{}-achievement-{}", game.id, index),
        &game.name,
        record,
        jitter,
    )
}

pub(crate) fn normalize_with_id(
    id: String,
    game_name: &str,
    record: &RawAchievementRecord,
    jitter: &mut dyn JitterSource,
) -> Achievement {
    let name = format_achievement_name(record.machine_name());
    let unlock_percentage = match record.trusted_percent() {
        Some(percent) => percent,
        None => heuristic_score(&name, jitter),
    };
    Achievement::new(
        id,
        name,
        describe_unlock(record.achieved, record.unlocktime),
        game_name,
        unlock_percentage,
    )
    .with_image_url(record.icon.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rarity::Rarity;

    #[test]
    fn formats_machine_names() {
        assert_eq!(format_achievement_name(Some("kill_100_enemies")), "Kill 100 Enemies");
        assert_eq!(format_achievement_name(Some("ACH_WIN_ONE_GAME")), "ACH WIN ONE GAME");
        assert_eq!(format_achievement_name(Some("the end?")), "The End?");
        assert_eq!(format_achievement_name(Some("don't_stop")), "Don't Stop");
        assert_eq!(format_achievement_name(Some("mid-game run")), "Mid-game Run");
        assert_eq!(format_achievement_name(None), "Unknown Achievement");
        assert_eq!(format_achievement_name(Some("  ")), "Unknown Achievement");
    }

    #[test]
    fn formatting_is_idempotent() {
        for name in [
            "Kill 100 Enemies",
            "Head Hunter",
            "DIAMONDS!",
            "Solid Gold, Baby!",
            "The Witcher's Story",
            "Geralt: The Professional",
        ] {
            let once = format_achievement_name(Some(name));
            assert_eq!(once, name);
            assert_eq!(format_achievement_name(Some(&once)), once);
        }
        for raw in ["don't_stop", "kill_100_enemies", "welcome to los santos"] {
            let once = format_achievement_name(Some(raw));
            assert_eq!(format_achievement_name(Some(&once)), once);
        }
    }

    #[test]
    fn describes_unlock_dates() {
        assert_eq!(describe_unlock(true, Some(1_700_000_000)), "Unlocked on 11/14/2023");
        assert_eq!(describe_unlock(false, Some(1_700_000_000)), NOT_YET_UNLOCKED);
        assert_eq!(describe_unlock(true, None), NOT_YET_UNLOCKED);
        assert_eq!(describe_unlock(true, Some(0)), NOT_YET_UNLOCKED);
    }

    #[test]
    fn heuristic_seeds() {
        assert_eq!(heuristic_seed("Platinum Trophy"), 0.5);
        assert_eq!(heuristic_seed("Ball Of Fire"), 0.5);
        assert_eq!(heuristic_seed("Survive Twenty Nights Alone"), 3.0);
        assert_eq!(heuristic_seed("Sixteen Letterss"), 7.0);
        assert_eq!(heuristic_seed("Head Hunter"), 15.0);
        assert_eq!(heuristic_score("Head Hunter", &mut ZeroJitter), 15.0);
    }

    #[test]
    fn seeded_jitter_is_reproducible() {
        let mut first = SeededJitter::new(7);
        let mut second = SeededJitter::new(7);
        for _ in 0..32 {
            let value = first.jitter();
            assert_eq!(value, second.jitter());
            assert!((0.0..JITTER_SPAN).contains(&value));
        }
        for _ in 0..32 {
            let count = first.pick_count(4, 8);
            assert!((4..=8).contains(&count));
        }
    }

    #[test]
    fn trusted_percent_skips_heuristic() {
        let game = GameRef::new("g1", "Counter-Strike 2");
        let record =
            RawAchievementRecord::unlocked("kill_100_enemies", 1_700_000_000).with_percent(22.8);
        let achievement = normalize_record(&game, 0, &record, &mut SeededJitter::new(1));
        assert_eq!(achievement.id(), "g1-achievement-0");
        assert_eq!(achievement.name(), "Kill 100 Enemies");
        assert_eq!(achievement.unlock_percentage(), 22.8);
        assert_eq!(achievement.rarity(), Rarity::Common);
        assert_eq!(achievement.game(), "Counter-Strike 2");
    }

    #[test]
    fn missing_percent_uses_heuristic() {
        let game = GameRef::new("g1", "Portal");
        let record = RawAchievementRecord::unlocked("portal_master", 1_700_000_000);
        let achievement = normalize_record(&game, 3, &record, &mut ZeroJitter);
        assert_eq!(achievement.unlock_percentage(), 0.5);
        assert_eq!(achievement.rarity(), Rarity::Legendary);

        let mut jitter = SeededJitter::new(99);
        let achievement = normalize_record(&game, 4, &record, &mut jitter);
        assert!(achievement.unlock_percentage() >= 0.5);
        assert!(achievement.unlock_percentage() < 5.5);
    }
}
