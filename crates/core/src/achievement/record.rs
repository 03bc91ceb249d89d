//! Raw achievement payloads as delivered by the upstream source.

use serde::{de, Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

/// One achievement entry from a `playerstats.achievements` array.
///
/// Unknown fields are ignored and loosely typed fields are coerced here so the
/// curator never has to inspect raw JSON.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawAchievementRecord {
    /// Machine name such as `kill_100_enemies`.
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub apiname: Option<String>,
    /// Display name, sent by localized payloads and by the fallback files.
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub name: Option<String>,
    /// Whether the player holds the achievement.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub achieved: bool,
    /// Unlock time in epoch seconds, `0` when never unlocked.
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub unlocktime: Option<i64>,
    /// Global unlock percentage, when the source knows it.
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub percent: Option<f64>,
    /// Human readable description.
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub description: Option<String>,
    /// Icon URL.
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub icon: Option<String>,
}

impl RawAchievementRecord {
    /// Convenience constructor for an unlocked record.
    pub fn unlocked(apiname: impl Into<String>, unlocktime: i64) -> Self {
        Self {
            apiname: Some(apiname.into()),
            achieved: true,
            unlocktime: Some(unlocktime),
            ..Self::default()
        }
    }

    /// Attach a population percentage.
    pub fn with_percent(mut self, percent: f64) -> Self {
        self.percent = Some(percent);
        self
    }

    /// The population percentage if it is usable as-is.
    pub fn trusted_percent(&self) -> Option<f64> {
        self.percent.filter(|value| value.is_finite() && *value >= 0.0)
    }

    /// `apiname`, or `name` when the payload only carries the latter.
    pub fn machine_name(&self) -> Option<&str> {
        self.apiname
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .or(self.name.as_deref())
    }

    /// Decode one array entry, substituting an empty record when its shape is
    /// unusable so the rest of the batch survives.
    pub fn from_value_lenient(index: usize, value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_else(|err| {
            warn!("achievement record {index} is malformed ({err}); using defaults");
            Self::default()
        })
    }
}

/// Reason the achievement source produced no records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceFailure {
    /// Transport-level failure.
    #[error("network error: {0}")]
    Network(String),
    /// Upstream answered with a non-success status.
    #[error("upstream returned status {0}")]
    Status(u16),
    /// The request exceeded its deadline.
    #[error("request timed out")]
    Timeout,
    /// The body could not be interpreted as achievement data.
    #[error("malformed payload: {0}")]
    Malformed(String),
    /// No data exists for the request.
    #[error("no data available: {0}")]
    Unavailable(String),
}

/// Outcome of asking the source for a game's achievements.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceResult {
    /// Records returned by the source, possibly empty.
    Records(Vec<RawAchievementRecord>),
    /// The source could not deliver.
    Failure(SourceFailure),
}

impl SourceResult {
    /// Records if the source succeeded with at least one entry.
    pub fn usable_records(&self) -> Option<&[RawAchievementRecord]> {
        match self {
            SourceResult::Records(records) if !records.is_empty() => Some(records),
            _ => None,
        }
    }
}

impl From<Vec<RawAchievementRecord>> for SourceResult {
    fn from(records: Vec<RawAchievementRecord>) -> Self {
        SourceResult::Records(records)
    }
}

impl From<SourceFailure> for SourceResult {
    fn from(failure: SourceFailure) -> Self {
        SourceResult::Failure(failure)
    }
}

/// Envelope returned by the achievements endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct PlayerStatsEnvelope {
    #[serde(default)]
    pub playerstats: Option<PlayerStatsBody>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlayerStatsBody {
    #[serde(default)]
    pub achievements: Option<Vec<Value>>,
}

/// Interpret an achievements endpoint body.
pub(crate) fn parse_envelope(body: &str) -> SourceResult {
    match serde_json::from_str::<PlayerStatsEnvelope>(body) {
        Ok(envelope) => match envelope.playerstats.and_then(|stats| stats.achievements) {
            Some(entries) => SourceResult::Records(
                entries
                    .into_iter()
                    .enumerate()
                    .map(|(index, value)| RawAchievementRecord::from_value_lenient(index, value))
                    .collect(),
            ),
            None => SourceResult::Failure(SourceFailure::Malformed(
                "missing playerstats.achievements".to_string(),
            )),
        },
        Err(err) => SourceResult::Failure(SourceFailure::Malformed(err.to_string())),
    }
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Bool(flag) => Ok(flag),
        Value::Number(num) => Ok(num.as_f64().map(|n| n != 0.0).unwrap_or(false)),
        Value::String(s) => Ok(matches!(s.trim(), "1" | "true")),
        Value::Null => Ok(false),
        other => Err(de::Error::custom(format!("invalid achieved flag {other}"))),
    }
}

fn deserialize_lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(num) => Some(num.to_string()),
        _ => None,
    })
}

fn deserialize_lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(num) => num.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|value| !value.is_nan()))
}

fn deserialize_lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(num) => num.as_i64().or_else(|| num.as_f64().map(|n| n as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerces_loose_fields() -> anyhow::Result<()> {
        let record: RawAchievementRecord = serde_json::from_str(
            r#"{"apiname":"kill_100_enemies","achieved":1,"unlocktime":1700000000,
                "percent":"22.8","extra":true}"#,
        )?;
        assert_eq!(record.apiname.as_deref(), Some("kill_100_enemies"));
        assert!(record.achieved);
        assert_eq!(record.unlocktime, Some(1_700_000_000));
        assert_eq!(record.trusted_percent(), Some(22.8));

        let record: RawAchievementRecord =
            serde_json::from_str(r#"{"achieved":false,"percent":"n/a"}"#)?;
        assert!(record.apiname.is_none());
        assert!(!record.achieved);
        assert!(record.percent.is_none());
        Ok(())
    }

    #[test]
    fn negative_percent_is_not_trusted() {
        let record = RawAchievementRecord::unlocked("x", 1).with_percent(-2.0);
        assert_eq!(record.trusted_percent(), None);
    }

    #[test]
    fn parses_playerstats_envelope() {
        let body = r#"{"playerstats":{"steamID":"1",
            "achievements":[{"apiname":"a","achieved":1,"unlocktime":5}]}}"#;
        match parse_envelope(body) {
            SourceResult::Records(records) => assert_eq!(records.len(), 1),
            other => panic!("unexpected {other:?}"),
        }

        let body = r#"{"playerstats":{"error":"Requested app has no stats","success":false}}"#;
        assert!(matches!(
            parse_envelope(body),
            SourceResult::Failure(SourceFailure::Malformed(_))
        ));
        assert!(SourceResult::Records(Vec::new()).usable_records().is_none());
    }

    #[test]
    fn localized_records_carry_both_names() {
        let body = r#"{"playerstats":{"achievements":[{"apiname":"kill_100_enemies",
            "name":"Kill 100 Enemies","achieved":1,"unlocktime":1700000000}]}}"#;
        let SourceResult::Records(records) = parse_envelope(body) else {
            panic!("localized payload rejected");
        };
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].machine_name(), Some("kill_100_enemies"));
        assert_eq!(records[0].name.as_deref(), Some("Kill 100 Enemies"));
        assert!(records[0].achieved);

        let record = RawAchievementRecord {
            name: Some("TF_PLAY_GAME_EVERYCLASS".to_string()),
            ..RawAchievementRecord::default()
        };
        assert_eq!(record.machine_name(), Some("TF_PLAY_GAME_EVERYCLASS"));
    }

    #[test]
    fn bad_record_does_not_sink_the_batch() {
        let body = r#"{"playerstats":{"achievements":[
            {"apiname":"good_one","achieved":1,"unlocktime":1700000000,"percent":3.0},
            {"apiname":7,"achieved":1},
            {"apiname":"odd_flag","achieved":[1]}]}}"#;
        let SourceResult::Records(records) = parse_envelope(body) else {
            panic!("batch rejected");
        };
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].machine_name(), Some("good_one"));
        assert_eq!(records[0].trusted_percent(), Some(3.0));
        assert_eq!(records[1].machine_name(), Some("7"));
        assert_eq!(records[2], RawAchievementRecord::default());
    }
}
