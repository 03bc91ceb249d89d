#![allow(missing_docs)]

//! Player stats and the PCSR play-style profile.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Axes every complete PCSR profile defines.
pub const PCSR_AXES: [&str; 4] = [
    "Progression Style",
    "Challenge Nature",
    "Social Orientation",
    "Rhythm / Engagement",
];

const AXIS_LABELS: &[(&str, &[(&str, &str)])] = &[
    ("Progression Style", &[("C", "Completionist"), ("F", "Freeflow")]),
    (
        "Challenge Nature",
        &[("S", "Story Seeker"), ("M", "Mechanical Mastermind"), ("E", "Explorer")],
    ),
    (
        "Social Orientation",
        &[("T", "Team Player"), ("C", "Competitor"), ("L", "Lone Wolf")],
    ),
    (
        "Rhythm / Engagement",
        &[("H", "High Intensity"), ("B", "Balanced"), ("D", "Drifter")],
    ),
];

const PROFILE_DESCRIPTIONS: &[(&str, &str)] = &[
    ("CSTH", "Dedicated completionist who focuses on story-driven games, enjoys team-based experiences, with high intensity gaming sessions."),
    ("CSLH", "Completionist story-lover who prefers solo play at a steady pace."),
    ("CMTB", "Mechanically-skilled completionist who values teamwork with a balanced approach to gaming."),
    ("FMCB", "Versatile player who hops between games, enjoys mechanical challenges and competitive modes."),
    ("FELH", "Explorer who tries many games without fully completing them, enjoys solo play and intense gaming sessions."),
];

const GENERIC_DESCRIPTION: &str = "A unique gamer with their own distinctive play style.";

/// Headline numbers for a Steam profile.
///
/// Missing or non-numeric fields fall back to placeholder values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    #[serde(default = "default_player_name", deserialize_with = "deserialize_name")]
    pub player_name: String,
    #[serde(default = "default_level", deserialize_with = "deserialize_level")]
    pub steam_level: u32,
    #[serde(default, deserialize_with = "deserialize_number")]
    pub total_hours: f64,
    #[serde(default, deserialize_with = "deserialize_number")]
    pub played_games: f64,
    #[serde(default, deserialize_with = "deserialize_number")]
    pub completion_percent: f64,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            player_name: default_player_name(),
            steam_level: default_level(),
            total_hours: 0.0,
            played_games: 0.0,
            completion_percent: 0.0,
        }
    }
}

fn default_player_name() -> String {
    "Steam Player".to_string()
}

fn default_level() -> u32 {
    1
}

fn lenient_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(num) => num.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

fn deserialize_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_f64(&Value::deserialize(deserializer)?).unwrap_or(0.0))
}

fn deserialize_level<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_f64(&Value::deserialize(deserializer)?)
        .filter(|n| *n >= 1.0)
        .map(|n| n as u32)
        .unwrap_or_else(default_level))
}

fn deserialize_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if !s.trim().is_empty() => s,
        _ => default_player_name(),
    })
}

/// One axis of the PCSR profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PcsrAxis {
    pub code: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub score: f64,
}

/// Four-letter play-style profile with per-axis reasoning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PcsrProfile {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub axes: BTreeMap<String, PcsrAxis>,
}

impl PcsrProfile {
    /// Profile used when no data is available.
    pub fn default_profile() -> Self {
        let axes = [("C", 0.75), ("S", 0.6), ("T", 0.7), ("H", 0.8)]
            .into_iter()
            .zip(PCSR_AXES)
            .map(|((code, score), axis)| {
                (
                    axis.to_string(),
                    PcsrAxis {
                        code: code.to_string(),
                        reason: "Based on available data".to_string(),
                        score,
                    },
                )
            })
            .collect();
        Self {
            kind: "CSTH".to_string(),
            axes,
        }
    }

    /// Label for each axis, in canonical axis order.
    pub fn labelled_axes(&self) -> Vec<(&'static str, String)> {
        PCSR_AXES
            .iter()
            .filter_map(|axis| {
                self.axes
                    .get(*axis)
                    .map(|value| (*axis, pcsr_axis_label(axis, &value.code)))
            })
            .collect()
    }
}

/// Human label for an axis code, or the code itself when unknown.
pub fn pcsr_axis_label(axis: &str, code: &str) -> String {
    AXIS_LABELS
        .iter()
        .find(|(name, _)| *name == axis)
        .and_then(|(_, codes)| codes.iter().find(|(c, _)| *c == code))
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| code.to_string())
}

/// Short description for a profile type.
pub fn pcsr_profile_description(kind: &str) -> &'static str {
    PROFILE_DESCRIPTIONS
        .iter()
        .find(|(code, _)| *code == kind)
        .map(|(_, description)| *description)
        .unwrap_or(GENERIC_DESCRIPTION)
}

/// Percentage of the four axes carrying a positive score.
pub fn profile_completeness(profile: &PcsrProfile) -> f64 {
    let defined = profile
        .axes
        .values()
        .filter(|axis| axis.score > 0.0)
        .count();
    (defined as f64 / PCSR_AXES.len() as f64) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_tolerate_garbage() -> anyhow::Result<()> {
        let stats: PlayerStats = serde_json::from_str(
            r#"{"player_name":"","steam_level":"12","total_hours":"n/a","played_games":87,"completion_percent":41.5}"#,
        )?;
        assert_eq!(stats.player_name, "Steam Player");
        assert_eq!(stats.steam_level, 12);
        assert_eq!(stats.total_hours, 0.0);
        assert_eq!(stats.played_games, 87.0);
        assert_eq!(stats.completion_percent, 41.5);

        let stats: PlayerStats = serde_json::from_str("{}")?;
        assert_eq!(stats, PlayerStats::default());
        Ok(())
    }

    #[test]
    fn labels_axes() {
        assert_eq!(pcsr_axis_label("Social Orientation", "L"), "Lone Wolf");
        assert_eq!(pcsr_axis_label("Social Orientation", "Q"), "Q");
        assert_eq!(pcsr_axis_label("Nonexistent", "C"), "C");

        let labels = PcsrProfile::default_profile().labelled_axes();
        assert_eq!(labels[0], ("Progression Style", "Completionist".to_string()));
        assert_eq!(labels.len(), 4);
    }

    #[test]
    fn describes_profiles() {
        assert!(pcsr_profile_description("CSTH").starts_with("Dedicated completionist"));
        assert_eq!(pcsr_profile_description("ZZZZ"), GENERIC_DESCRIPTION);
    }

    #[test]
    fn completeness_counts_positive_scores() -> anyhow::Result<()> {
        assert_eq!(profile_completeness(&PcsrProfile::default_profile()), 100.0);

        let profile: PcsrProfile = serde_json::from_str(
            r#"{"type":"FMCB","axes":{"Progression Style":{"code":"F","reason":"","score":0.4},"Challenge Nature":{"code":"M","score":0}}}"#,
        )?;
        assert_eq!(profile.kind, "FMCB");
        assert_eq!(profile_completeness(&profile), 25.0);
        Ok(())
    }
}
