//! Display helpers for complaint timelines and chat timestamps.
//!
//! Everything here is pure: the current time is always passed in, so the
//! helpers behave the same in tests and in the terminal.

use chrono::{DateTime, Local, NaiveDateTime, TimeDelta, TimeZone, Utc};
use std::fmt;

use crate::models::{ComplaintStatus, FALLBACK_STATUS_COLOR};

/// Length of the resolution window complaints are tracked against.
pub const RESOLUTION_WINDOW_HOURS: i64 = 6;

const DATE_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";
const TIME_FORMAT: &str = "%-I:%M:%S %p";

/// Parses an RFC 3339 timestamp, or a naive ISO-8601 one which is read as UTC.
#[must_use]
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|pattern| NaiveDateTime::parse_from_str(value, pattern).ok())
        .map(|naive| naive.and_utc())
}

/// Formats an instant as a date and time in the given zone.
pub fn format_date_in<Tz: TimeZone>(value: DateTime<Utc>, zone: &Tz) -> String
where
    Tz::Offset: fmt::Display,
{
    value.with_timezone(zone).format(DATE_FORMAT).to_string()
}

/// Formats an instant as a local date and time, e.g. `3/8/2025, 2:30:00 PM`.
#[must_use]
pub fn format_date(value: DateTime<Utc>) -> String {
    format_date_in(value, &Local)
}

/// Formats the time-of-day part of an instant in the given zone.
pub fn format_time_of_day_in<Tz: TimeZone>(value: DateTime<Utc>, zone: &Tz) -> String
where
    Tz::Offset: fmt::Display,
{
    value.with_timezone(zone).format(TIME_FORMAT).to_string()
}

/// Formats the local time of day, e.g. `2:30:00 PM`. Used for message stamps.
#[must_use]
pub fn format_time_of_day(value: DateTime<Utc>) -> String {
    format_time_of_day_in(value, &Local)
}

fn elapsed(created_at: DateTime<Utc>, now: DateTime<Utc>) -> TimeDelta {
    (now - created_at).max(TimeDelta::zero())
}

/// Time spent so far in the resolution window, as `"1h 30m remaining"` or `"45m remaining"`.
///
/// Timestamps in the future count as no time elapsed.
#[must_use]
pub fn format_time_remaining(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = elapsed(created_at, now);
    let hours = elapsed.num_hours();
    let minutes = elapsed.num_minutes() % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m remaining")
    } else {
        format!("{minutes}m remaining")
    }
}

/// Percentage of the resolution window used up, clamped to `0.0..=100.0`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn calculate_progress(created_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let hours = elapsed(created_at, now).num_milliseconds() as f64 / 3_600_000.0;
    (hours / RESOLUTION_WINDOW_HOURS as f64 * 100.0).clamp(0.0, 100.0)
}

/// Maps a status wire name to its display color, `"secondary"` when unknown.
#[must_use]
pub fn status_color(status: &str) -> &'static str {
    status
        .parse::<ComplaintStatus>()
        .map_or(FALLBACK_STATUS_COLOR, ComplaintStatus::color)
}
