use crate::models::{DurationParts, Pace};

/// `H:MM:S`: the minute is zero-padded, the hour and second are not.
pub fn format_duration(duration: &DurationParts) -> String {
    format!("{}:{:0>2}:{}", duration.hour, duration.minute, duration.second)
}

/// `M:SS unit`
pub fn format_pace(pace: &Pace, unit: &str) -> String {
    format!("{}:{:0>2} {}", pace.minute, pace.second, unit)
}

/// Whole numbers keep a trailing `.0`, everything else prints in its shortest form.
pub fn format_distance(distance: f64, unit: &str) -> String {
    if distance.is_finite() && distance.fract() == 0.0 {
        format!("{:.1} {}", distance, unit)
    } else {
        format!("{} {}", distance, unit)
    }
}
