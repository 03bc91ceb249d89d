#![allow(missing_docs)]

//! Static achievement templates used when live data is unavailable.

use crate::models::{Achievement, GameRef};

use super::normalize::{format_achievement_name, JitterSource};

/// Smallest number of achievements generated from a template.
pub const MIN_GENERATED: usize = 4;
/// Largest number of achievements generated from a template.
pub const MAX_GENERATED: usize = 8;

/// A plausible achievement for a known title.
#[derive(Debug, Clone, Copy)]
pub struct TemplateEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub unlock_percentage: f64,
}

/// Reference achievements for one title.
#[derive(Debug, Clone, Copy)]
pub struct GameTemplate {
    /// Title the template applies to, `None` for the generic template.
    pub title: Option<&'static str>,
    pub entries: &'static [TemplateEntry],
}

const fn entry(
    name: &'static str,
    description: &'static str,
    unlock_percentage: f64,
) -> TemplateEntry {
    TemplateEntry {
        name,
        description,
        unlock_percentage,
    }
}

static TITLED_TEMPLATES: &[GameTemplate] = &[
    GameTemplate {
        title: Some("Counter-Strike 2"),
        entries: &[
            entry("Body Count", "Kill 25 enemies", 65.3),
            entry("Pistolero", "Win a pistol round", 48.7),
            entry("Leet Skills", "Kill 250 enemies", 34.2),
            entry("Head Hunter", "Kill 100 enemies with headshots", 22.8),
            entry("Bomb Specialist", "Plant or defuse 100 bombs", 18.5),
            entry("Marksman", "Kill an enemy with a zoomed-in sniper rifle", 42.1),
            entry("Rampage", "Kill 5 enemies in a single round", 9.6),
            entry("Global Elite", "Reach the Global Elite rank", 1.2),
        ],
    },
    GameTemplate {
        title: Some("Grand Theft Auto V"),
        entries: &[
            entry("Welcome to Los Santos", "Complete the Prologue", 87.4),
            entry("A Friendship Resurrected", "Complete Fame or Shame", 52.6),
            entry("The Government Gimps", "Complete Monkey Business", 38.9),
            entry("Career Criminal", "Attain 100% in the Career Criminal stat", 4.2),
            entry("Los Santos Legend", "Achieve 100% completion", 0.8),
            entry("Kifflom!", "Complete the Epsilon Program", 3.1),
            entry(
                "Three Man Army",
                "Survive a 3-star wanted level with all three characters together",
                14.7,
            ),
            entry(
                "Solid Gold, Baby!",
                "Earn 70 Gold Medals in Missions and Strangers and Freaks",
                1.5,
            ),
        ],
    },
    GameTemplate {
        title: Some("Apex Legends"),
        entries: &[
            entry("Fully Kitted", "Equip a fully kitted weapon", 72.3),
            entry("Team Player", "Revive a teammate", 68.5),
            entry("Apex Predator", "Win a match as the Kill Leader", 22.7),
            entry("Hot Streak", "Win 2 games in a row", 9.4),
            entry("Rapid Elimination", "Kill an entire squad within 20 seconds", 14.8),
            entry("Legendary Hunter", "Loot a Legendary item from a death box", 45.2),
            entry("Well-Rounded", "Deal 5,000 damage with 8 different Legends", 5.1),
            entry("Champion of the Arena", "Win a match with 5+ kills", 18.6),
        ],
    },
    GameTemplate {
        title: Some("The Witcher 3"),
        entries: &[
            entry("Lilac and Gooseberries", "Find Yennefer of Vengerberg", 72.8),
            entry("The Witcher's Story", "Complete the main story", 29.4),
            entry("Geralt: The Professional", "Complete all contracts", 8.7),
            entry("Gwent Master", "Collect all the cards in the base game", 4.3),
            entry("Dressed to Kill", "Acquire all witcher gear", 3.8),
            entry(
                "Walked the Path",
                "Complete the game on the Death March difficulty level",
                2.1,
            ),
            entry("Full Crew", "Gather all possible allies to Kaer Morhen", 15.3),
            entry(
                "Fist of the South Star",
                "Win all fistfights on the highest difficulty",
                6.9,
            ),
        ],
    },
    GameTemplate {
        title: Some("Minecraft"),
        entries: &[
            entry("Getting Wood", "Punch a tree until a block of wood pops out", 91.2),
            entry("DIAMONDS!", "Acquire diamonds with your iron tools", 45.6),
            entry("We Need to Go Deeper", "Build, light and enter a Nether Portal", 36.8),
            entry("The End?", "Enter the End portal", 18.3),
            entry("The End.", "Defeat the Ender Dragon", 12.5),
            entry("Enchanter", "Construct an Enchantment Table", 32.4),
            entry("Adventuring Time", "Discover 17 biomes", 7.9),
            entry("Beaconator", "Create a full beacon", 4.1),
        ],
    },
    GameTemplate {
        title: Some("Cyberpunk 2077"),
        entries: &[
            entry("The Fool", "Finish the first act of the main story", 68.7),
            entry("The Devil", "Finish the game with a specific ending", 21.5),
            entry("The Star", "Finish the game with a specific ending", 19.8),
            entry("The Sun", "Finish the game with a specific ending", 18.2),
            entry("The Temperance", "Finish the game with a specific ending", 14.9),
            entry("Autojock", "Buy all vehicles available for purchase", 3.2),
            entry(
                "Legend of Night City",
                "Complete all gigs and NCPD Scanner Hustles in Night City",
                5.7,
            ),
            entry(
                "Breathtaking",
                "Collect all items that once belonged to Johnny Silverhand",
                8.3,
            ),
        ],
    },
];

static DEFAULT_TEMPLATE: GameTemplate = GameTemplate {
    title: None,
    entries: &[
        entry("First Steps", "Complete the tutorial", 85.3),
        entry("Story Progress", "Complete the first chapter", 62.7),
        entry("Mid-Game Achievement", "Reach the halfway point in the story", 43.1),
        entry("Collector", "Find 50% of all collectibles", 18.5),
        entry("Master Collector", "Find all collectibles in the game", 4.2),
        entry("Expert Player", "Complete a difficult challenge", 12.4),
        entry("Completionist", "Complete all side missions", 7.8),
        entry("Platinum Trophy", "Earn all other achievements", 1.3),
    ],
};

/// Template for `title`, or the generic one when the title is unknown.
pub fn template_for(title: &str) -> &'static GameTemplate {
    let title = title.trim();
    TITLED_TEMPLATES
        .iter()
        .find(|template| template.title == Some(title))
        .unwrap_or(&DEFAULT_TEMPLATE)
}

/// Titles with a dedicated template.
pub fn known_titles() -> impl Iterator<Item = &'static str> {
    TITLED_TEMPLATES.iter().filter_map(|template| template.title)
}

/// Build up to `count` achievements for `game` from its template.
///
/// Names go through [`format_achievement_name`] like live records do.
pub fn generate_from_template(game: &GameRef, count: usize) -> Vec<Achievement> {
    let template = template_for(&game.name);
    template
        .entries
        .iter()
        .take(count)
        .enumerate()
        .map(|(index, entry)| {
            Achievement::new(
                format!("{}-achievement-{}", game.id, index + 1),
                format_achievement_name(Some(entry.name)),
                entry.description,
                game.name.clone(),
                entry.unlock_percentage,
            )
        })
        .collect()
}

/// Template generation with a random size in `MIN_GENERATED..=MAX_GENERATED`.
pub fn generate_fallback(game: &GameRef, jitter: &mut dyn JitterSource) -> Vec<Achievement> {
    let count = jitter.pick_count(MIN_GENERATED, MAX_GENERATED);
    generate_from_template(game, count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{achievement::ZeroJitter, rarity::classify_rarity};

    #[test]
    fn picks_title_or_default() {
        assert_eq!(template_for("Minecraft").title, Some("Minecraft"));
        assert_eq!(template_for("Unknown Title XYZ").title, None);
        assert_eq!(known_titles().count(), 6);
        for template in TITLED_TEMPLATES.iter().chain(std::iter::once(&DEFAULT_TEMPLATE)) {
            assert_eq!(template.entries.len(), MAX_GENERATED);
        }
    }

    #[test]
    fn generated_entries_are_classified() {
        let game = GameRef::new("game-730", "Counter-Strike 2");
        let achievements = generate_from_template(&game, 8);
        assert_eq!(achievements.len(), 8);
        assert_eq!(achievements[0].id(), "game-730-achievement-1");
        for achievement in &achievements {
            assert_eq!(achievement.rarity(), classify_rarity(achievement.unlock_percentage()));
            assert_eq!(achievement.game(), "Counter-Strike 2");
        }
        let elite = achievements
            .iter()
            .find(|a| a.name() == "Global Elite")
            .expect("template entry");
        assert_eq!(elite.unlock_percentage(), 1.2);
    }

    #[test]
    fn template_names_are_formatted() {
        let witcher = generate_from_template(&GameRef::new("g", "The Witcher 3"), 8);
        assert!(witcher.iter().any(|a| a.name() == "The Witcher's Story"));

        let gta = generate_from_template(&GameRef::new("g", "Grand Theft Auto V"), 8);
        assert_eq!(gta[0].name(), "Welcome To Los Santos");
        for achievement in witcher.iter().chain(&gta) {
            assert_eq!(format_achievement_name(Some(achievement.name())), achievement.name());
        }
    }

    #[test]
    fn fallback_size_respects_bounds() {
        let game = GameRef::new("g1", "Unknown Title XYZ");
        assert_eq!(generate_fallback(&game, &mut ZeroJitter).len(), MIN_GENERATED);
        assert_eq!(generate_from_template(&game, 20).len(), MAX_GENERATED);
    }
}
