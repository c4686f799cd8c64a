//! Duration and distance formatting for route summaries.
//!
//! Rounding rules:
//! - durations truncate to whole seconds, then split into hours and minutes;
//! - distances round to whole decameters, ties away from zero, so `12345` m
//!   prints as `12.35 km`.
//!
//! Negative and non-finite inputs format as zero.

use serde::Serialize;

use crate::constants::units;
use crate::models::RouteSummary;

/// Summary strings ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedSummary {
    pub duration: String,
    pub distance: String,
}

impl From<&RouteSummary> for FormattedSummary {
    fn from(summary: &RouteSummary) -> Self {
        Self {
            duration: format_duration(summary.travel_time_in_seconds),
            distance: format_distance(summary.length_in_meters),
        }
    }
}

/// `3900.0` → `"1 godz. 5 minut"`, `59.0` → `"0 minut"`
pub fn format_duration(total_seconds: f64) -> String {
    let seconds = non_negative(total_seconds).trunc() as u64;
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;

    if hours > 0 {
        format!("{hours} {} {minutes} {}", units::HOURS, units::MINUTES)
    } else {
        format!("{minutes} {}", units::MINUTES)
    }
}

/// `12345.0` → `"12.35 km"`
pub fn format_distance(total_meters: f64) -> String {
    let decameters = (non_negative(total_meters) / 10.0).round() as u64;
    format!(
        "{}.{:02} {}",
        decameters / 100,
        decameters % 100,
        units::KILOMETERS
    )
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
