//! Text formatting for the detail view: compact star counts and relative
//! "time ago" strings.

use chrono::{DateTime, Datelike, Timelike, Utc};

const MINUTES_IN_DAY: i64 = 1440;
const MINUTES_IN_ALMOST_TWO_DAYS: i64 = 2520;
const MINUTES_IN_MONTH: i64 = 43200;
const MINUTES_IN_TWO_MONTHS: i64 = 86400;

/// Compact star count: `950`, `1.5K`, `2.3M`.
pub fn format_stars(count: u64) -> String {
    if (1_000..1_000_000).contains(&count) {
        format!("{:.1}K", count as f64 / 1_000.0)
    } else if count >= 1_000_000 {
        format!("{:.1}M", count as f64 / 1_000_000.0)
    } else {
        count.to_string()
    }
}

/// Star label for the detail row. Zero counts like a missing value.
pub fn star_label(stars: Option<u64>) -> Option<String> {
    stars.filter(|&count| count > 0).map(format_stars)
}

/// Relative label for an ISO-8601 timestamp, measured against `now`.
///
/// Empty or unparsable timestamps yield `None`.
pub fn updated_label(timestamp: Option<&str>, now: DateTime<Utc>) -> Option<String> {
    let raw = timestamp.map(str::trim).filter(|raw| !raw.is_empty())?;
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => Some(time_ago(parsed.with_timezone(&Utc), now)),
        Err(err) => {
            tracing::warn!("Ignoring unparsable timestamp {:?}: {}", raw, err);
            None
        }
    }
}

/// `"5 minutes ago"`, `"about 3 hours ago"`, `"in 2 days"`.
pub fn time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    if timestamp <= now {
        format!("{} ago", distance_in_words(timestamp, now))
    } else {
        format!("in {}", distance_in_words(now, timestamp))
    }
}

/// Human distance between two instants, `earlier <= later`.
///
/// Mirrors the usual "distance in words" buckets: minutes, then hours, days,
/// months, and finally years qualified by about/over/almost.
pub fn distance_in_words(earlier: DateTime<Utc>, later: DateTime<Utc>) -> String {
    let seconds = (later - earlier).num_seconds();
    let minutes = rounded_div(seconds, 60);

    if minutes < 2 {
        return if minutes == 0 {
            "less than a minute".to_string()
        } else {
            "1 minute".to_string()
        };
    }
    if minutes < 45 {
        return format!("{} minutes", minutes);
    }
    if minutes < 90 {
        return "about 1 hour".to_string();
    }
    if minutes < MINUTES_IN_DAY {
        return format!("about {} hours", rounded_div(minutes, 60));
    }
    if minutes < MINUTES_IN_ALMOST_TWO_DAYS {
        return "1 day".to_string();
    }
    if minutes < MINUTES_IN_MONTH {
        return format!("{} days", rounded_div(minutes, MINUTES_IN_DAY));
    }
    if minutes < MINUTES_IN_TWO_MONTHS {
        return about_months(rounded_div(minutes, MINUTES_IN_MONTH));
    }

    let months = months_between(earlier, later);
    if months < 12 {
        return plural(rounded_div(minutes, MINUTES_IN_MONTH), "month");
    }

    let years = months / 12;
    match months % 12 {
        0..=2 => format!("about {}", plural(years, "year")),
        3..=8 => format!("over {}", plural(years, "year")),
        _ => format!("almost {}", plural(years + 1, "year")),
    }
}

fn about_months(months: i64) -> String {
    format!("about {}", plural(months, "month"))
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", count, unit)
    }
}

/// Non-negative division rounded half up.
fn rounded_div(value: i64, divisor: i64) -> i64 {
    (value as f64 / divisor as f64).round() as i64
}

/// Whole calendar months from `earlier` to `later`.
fn months_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> i64 {
    let mut months = i64::from(later.year() - earlier.year()) * 12
        + i64::from(later.month())
        - i64::from(earlier.month());

    let later_in_month = (later.day(), later.num_seconds_from_midnight());
    let earlier_in_month = (earlier.day(), earlier.num_seconds_from_midnight());
    if months > 0 && later_in_month < earlier_in_month {
        months -= 1;
    }
    months
}
