//! Rarity tiers derived from achievement unlock percentages.

use std::{cmp::Ordering, fmt};

use serde::{Deserialize, Serialize};

use crate::models::Achievement;

/// Upper bound (exclusive) of the legendary band.
pub const LEGENDARY_BELOW: f64 = 1.0;
/// Upper bound (exclusive) of the epic band.
pub const EPIC_BELOW: f64 = 5.0;
/// Upper bound (exclusive) of the rare band.
pub const RARE_BELOW: f64 = 10.0;

/// Discrete rarity band. Ordered rarest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    /// Unlocked by fewer than 1% of players.
    Legendary,
    /// 1% to under 5%.
    Epic,
    /// 5% to under 10%.
    Rare,
    /// 10% and above.
    Common,
}

impl Rarity {
    /// Every tier, rarest first.
    pub const ALL: [Rarity; 4] = [Rarity::Legendary, Rarity::Epic, Rarity::Rare, Rarity::Common];

    /// Sort key, `0` for legendary through `3` for common.
    pub fn rank(self) -> u8 {
        match self {
            Rarity::Legendary => 0,
            Rarity::Epic => 1,
            Rarity::Rare => 2,
            Rarity::Common => 3,
        }
    }

    /// Lowercase label used in JSON and badges.
    pub fn label(self) -> &'static str {
        match self {
            Rarity::Legendary => "legendary",
            Rarity::Epic => "epic",
            Rarity::Rare => "rare",
            Rarity::Common => "common",
        }
    }

    /// CSS class the dashboard uses for the tier badge.
    pub fn badge_class(self) -> String {
        format!("badge-{}", self.label())
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Map an unlock percentage onto its rarity band.
///
/// Bands are half-open with an inclusive lower bound, so `1.0`, `5.0` and
/// `10.0` belong to the less rare tier. Negative values fall into
/// [`Rarity::Legendary`]; `NaN` fails every comparison and lands in
/// [`Rarity::Common`].
pub fn classify_rarity(unlock_percentage: f64) -> Rarity {
    if unlock_percentage < LEGENDARY_BELOW {
        Rarity::Legendary
    } else if unlock_percentage < EPIC_BELOW {
        Rarity::Epic
    } else if unlock_percentage < RARE_BELOW {
        Rarity::Rare
    } else {
        Rarity::Common
    }
}

/// Order by tier, then by ascending unlock percentage within a tier.
pub fn compare_by_rarity(a: &Achievement, b: &Achievement) -> Ordering {
    a.rarity()
        .cmp(&b.rarity())
        .then_with(|| a.unlock_percentage().total_cmp(&b.unlock_percentage()))
}

/// Stable in-place sort, rarest first.
pub fn sort_by_rarity(achievements: &mut [Achievement]) {
    achievements.sort_by(compare_by_rarity);
}
