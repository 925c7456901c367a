//! UTC day windows and instant ↔ minute conversion.
//!
//! Day boundaries are fixed UTC midnight-to-midnight. Instants outside the day are
//! clipped at the boundary, never wrapped into the neighbouring day.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

use crate::error::{Result, ScheduleError};
use crate::interval::{MinuteRange, DAY_MINUTES};

/// Parse an ISO 8601 instant.
///
/// Accepts RFC 3339 with an offset (`2026-03-16T09:00:00Z`,
/// `2026-03-16T10:00:00+01:00`) and naive datetimes (`2026-03-16T09:00:00`),
/// which are read as UTC.
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| ndt.and_utc())
        .map_err(|e| ScheduleError::validation(format!("invalid instant '{s}': {e}")))
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_day(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| ScheduleError::validation(format!("invalid date '{s}', expected YYYY-MM-DD: {e}")))
}

/// `[00:00, next 00:00)` of `date` in UTC.
pub fn day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = date.and_time(chrono::NaiveTime::MIN).and_utc();
    (start, start + Duration::days(1))
}

/// Convert `[start, end)` to minutes relative to `day_start`, clipped to the day.
///
/// The start is floored and the end ceiled to whole minutes, so a partial minute
/// of occupancy removes the whole minute. Returns `None` when nothing remains
/// inside the day.
pub fn to_day_minutes(day_start: DateTime<Utc>, start: DateTime<Utc>, end: DateTime<Utc>) -> Option<MinuteRange> {
    let from = whole_seconds(start - day_start, Round::Down).div_euclid(60);
    let to = ceil_div(whole_seconds(end - day_start, Round::Up), 60);

    let day = i64::from(DAY_MINUTES);
    let from = from.clamp(0, day);
    let to = to.clamp(0, day);
    if to <= from {
        return None;
    }
    // Both values are clamped to [0, 1440].
    Some(MinuteRange::new(from as u32, to as u32))
}

/// The absolute instant `minutes` after `day_start`.
pub fn at_minute(day_start: DateTime<Utc>, minutes: u32) -> DateTime<Utc> {
    day_start + Duration::minutes(i64::from(minutes))
}

#[derive(Clone, Copy)]
enum Round {
    Down,
    Up,
}

/// Whole seconds in `span`, rounding any sub-second remainder in `dir`.
fn whole_seconds(span: Duration, dir: Round) -> i64 {
    // `num_seconds` truncates toward zero; the remainder keeps the sign of `span`.
    let secs = span.num_seconds();
    let rem = span - Duration::seconds(secs);
    match dir {
        Round::Down if rem < Duration::zero() => secs - 1,
        Round::Up if rem > Duration::zero() => secs + 1,
        _ => secs,
    }
}

fn ceil_div(n: i64, d: i64) -> i64 {
    -(-n).div_euclid(d)
}
