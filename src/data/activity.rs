use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ChartError, ChartResult};

/// Workout-type code marking a race-pace effort.
pub const RACE_WORKOUT_TYPE: i64 = 1;

/// One training activity as supplied by the host's fitness-tracking feed.
///
/// Field names follow the upstream JSON payload; anything beyond the fields
/// the chart consumes is ignored during deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: u64,
    pub name: String,
    /// Meters.
    #[serde(default)]
    pub distance: f64,
    /// Seconds.
    pub moving_time: f64,
    pub start_date_local: String,
    #[serde(default)]
    pub workout_type: Option<i64>,
    #[serde(default, rename = "type")]
    pub activity_type: Option<String>,
    #[serde(default)]
    pub sport_type: Option<String>,
    #[serde(default)]
    pub average_heartrate: Option<f64>,
    #[serde(default)]
    pub suffer_score: Option<f64>,
}

impl Activity {
    /// Whether this activity is a race-pace trial.
    ///
    /// Classification uses the explicit workout-type code only.
    #[must_use]
    pub fn is_trial(&self) -> bool {
        self.workout_type == Some(RACE_WORKOUT_TYPE)
    }

    /// Parses `start_date_local`, tolerating RFC 3339, a bare datetime, or a
    /// bare date. Returns `None` when nothing matches.
    #[must_use]
    pub fn local_start(&self) -> Option<DateTime<Utc>> {
        let text = self.start_date_local.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
            return Some(parsed.with_timezone(&Utc));
        }
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
            return Some(parsed.and_utc());
        }
        if let Ok(parsed) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            return Some(parsed.and_time(NaiveTime::MIN).and_utc());
        }
        None
    }

    /// Decodes an activity array from the host's JSON payload.
    ///
    /// Records that fail to deserialize are skipped with a warning; only a
    /// payload that is not a JSON array at all is an error.
    pub fn batch_from_json(json: &str) -> ChartResult<Vec<Activity>> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|err| ChartError::InvalidData(format!("activity payload: {err}")))?;
        let Some(items) = value.as_array() else {
            return Err(ChartError::InvalidData(
                "activity payload must be a JSON array".to_owned(),
            ));
        };

        let mut activities = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            match serde_json::from_value::<Activity>(item.clone()) {
                Ok(activity) => activities.push(activity),
                Err(err) => warn!(index, %err, "skipping malformed activity record"),
            }
        }
        Ok(activities)
    }
}
