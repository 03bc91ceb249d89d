//! Achievement normalization, fallback generation and curation.

/// Per-game retrieval with session caching.
pub mod curator;
/// Record to [`crate::models::Achievement`] conversion and heuristic scoring.
pub mod normalize;
/// Diversity-constrained showcase selection.
pub mod notable;
/// Raw source payloads.
pub mod record;
/// Static fallback templates.
pub mod templates;

pub use curator::AchievementCurator;
pub use normalize::{
    format_achievement_name, JitterSource, SeededJitter, ThreadJitter, ZeroJitter,
};
pub use notable::{curate_notable, DEFAULT_NOTABLE_COUNT};
pub use record::{RawAchievementRecord, SourceFailure, SourceResult};
