use chrono::NaiveDateTime;
use serde::Deserialize;

pub const SHORT_UNIT: &str = "km";
pub const PACE_UNIT: &str = "min/km";

// ============================================================================
// Garmin Connect API Models
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ActivityType {
    #[serde(rename = "typeKey")]
    pub type_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GarminActivity {
    #[serde(rename = "activityId")]
    pub activity_id: u64,
    #[serde(rename = "activityName")]
    pub activity_name: Option<String>,
    #[serde(rename = "startTimeLocal", deserialize_with = "garmin_time::deserialize", default)]
    pub start_time_local: Option<NaiveDateTime>,
    #[serde(rename = "activityType")]
    pub activity_type: Option<ActivityType>,
    /// Metres.
    #[serde(default)]
    pub distance: Option<f64>,
    /// Seconds.
    #[serde(default)]
    pub duration: Option<f64>,
}

mod garmin_time {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|s| NaiveDateTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom))
            .transpose()
    }
}

// ============================================================================
// Display Models
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DurationParts {
    pub hour: u64,
    pub minute: u64,
    pub second: u64,
}

impl DurationParts {
    pub fn from_seconds(total: u64) -> Self {
        let hour = total / 3600;
        let remaining = total - hour * 3600;
        let minute = remaining / 60;
        let second = remaining - minute * 60;
        Self {
            hour,
            minute,
            second,
        }
    }
}

/// Time per unit distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pace {
    pub minute: u64,
    pub second: u64,
}

/// Seconds per unit distance, rounded to the nearest second.
pub fn pace_calculator(total_seconds: u64, total_distance: f64) -> Pace {
    if total_distance <= 0.0 {
        return Pace::default();
    }
    let per_unit = (total_seconds as f64 / total_distance).round() as u64;
    Pace {
        minute: per_unit / 60,
        second: per_unit % 60,
    }
}

pub fn round_distance(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One logged run, in the units shown on the display.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityRecord {
    /// Raw distance, used for pace math.
    pub distance: f64,
    pub distance_short: f64,
    pub short_unit: String,
    pub duration: DurationParts,
    pub duration_seconds: u64,
    pub pace: Pace,
    pub pace_unit: String,
}

impl ActivityRecord {
    pub fn new(distance: f64, duration_seconds: u64) -> Self {
        Self {
            distance,
            distance_short: round_distance(distance),
            short_unit: SHORT_UNIT.to_string(),
            duration: DurationParts::from_seconds(duration_seconds),
            duration_seconds,
            pace: pace_calculator(duration_seconds, distance),
            pace_unit: PACE_UNIT.to_string(),
        }
    }
}

impl From<&GarminActivity> for ActivityRecord {
    fn from(activity: &GarminActivity) -> Self {
        let kilometres = activity.distance.unwrap_or(0.0) / 1000.0;
        let seconds = activity.duration.unwrap_or(0.0).max(0.0).round() as u64;
        ActivityRecord::new(kilometres, seconds)
    }
}

/// Totals across the week's runs.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekSummary {
    pub distance_short: f64,
    pub distance: f64,
    pub duration_seconds: u64,
    pub duration: DurationParts,
    pub pace: Pace,
    pub short_unit: String,
    pub pace_unit: String,
}

impl WeekSummary {
    /// `None` for a week without runs.
    pub fn calculate(week: &[ActivityRecord]) -> Option<Self> {
        let first = week.first()?;

        let mut distance_short = 0.0;
        let mut distance = 0.0;
        let mut duration_seconds = 0;
        for activity in week {
            duration_seconds += activity.duration_seconds;
            distance += activity.distance;
            distance_short += activity.distance_short;
        }

        Some(Self {
            distance_short: round_distance(distance_short),
            distance,
            duration_seconds,
            duration: DurationParts::from_seconds(duration_seconds),
            pace: pace_calculator(duration_seconds, distance),
            short_unit: first.short_unit.clone(),
            pace_unit: first.pace_unit.clone(),
        })
    }
}
