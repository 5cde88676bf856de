//! Compact interval labels for answer buttons ("1m", "10m", "1d", "2.5d").

use crate::types::Interval;

const MINUTES_PER_HOUR: f64 = 60.0;
const MINUTES_PER_DAY: f64 = 24.0 * MINUTES_PER_HOUR;
const DAYS_PER_MONTH: f64 = 30.0;
const DAYS_PER_YEAR: f64 = 365.0;

/// Render a value with at most one decimal, dropping a trailing ".0".
fn trim(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{rounded:.1}")
    }
}

/// Format an interval using the largest unit that keeps the number readable.
pub fn format_interval(interval: Interval) -> String {
    let minutes = interval.as_minutes().max(0.0);
    if minutes < MINUTES_PER_HOUR {
        let shown = if minutes > 0.0 { minutes.round().max(1.0) } else { 0.0 };
        return format!("{}m", shown as i64);
    }
    if minutes < MINUTES_PER_DAY {
        return format!("{}h", trim(minutes / MINUTES_PER_HOUR));
    }

    let days = interval.as_days();
    if days < DAYS_PER_MONTH {
        format!("{}d", trim(days))
    } else if days < DAYS_PER_YEAR {
        format!("{}mo", trim(days / DAYS_PER_MONTH))
    } else {
        format!("{}y", trim(days / DAYS_PER_YEAR))
    }
}
