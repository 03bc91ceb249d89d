//! Text and JSON rendering of curated results.

use anyhow::{Context, Result};
use playerdna_core::{
    profile::{pcsr_profile_description, profile_completeness},
    Achievement, PcsrProfile, PlayerStats,
};
use serde_json::json;

pub fn achievements(list: &[Achievement], as_json: bool) -> Result<()> {
    if as_json {
        let rendered =
            serde_json::to_string_pretty(list).context("failed to serialize achievements")?;
        println!("{rendered}");
        return Ok(());
    }

    if list.is_empty() {
        println!("No achievements found.");
        return Ok(());
    }

    for achievement in list {
        println!("{}", achievement_line(achievement));
    }
    Ok(())
}

pub fn profile(stats: &PlayerStats, profile: &PcsrProfile, as_json: bool) -> Result<()> {
    if as_json {
        let rendered = serde_json::to_string_pretty(&json!({
            "stats": stats,
            "pcsr": profile,
            "completeness": profile_completeness(profile),
        }))
        .context("failed to serialize profile")?;
        println!("{rendered}");
        return Ok(());
    }

    println!("{} (level {})", stats.player_name, stats.steam_level);
    println!(
        "{:.0}h played across {} games, {:.0}% completion",
        stats.total_hours, stats.played_games, stats.completion_percent
    );
    println!("{}: {}", profile.kind, pcsr_profile_description(&profile.kind));
    for (axis, label) in profile.labelled_axes() {
        println!("  {axis}: {label}");
    }
    Ok(())
}

fn achievement_line(achievement: &Achievement) -> String {
    format!(
        "[{:<9}] {:>5.1}%  {} ({}) - {}",
        achievement.rarity().label(),
        achievement.unlock_percentage(),
        achievement.name(),
        achievement.game(),
        achievement.description()
    )
}
