// ABOUTME: Time arithmetic for "HH:MM" schedule times anchored to calendar dates
// ABOUTME: Parsing is permissive: malformed parts degrade to zero instead of failing

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Time used when a task carries no usable start time
pub const DEFAULT_TIME: &str = "00:00";

/// Anchor an "HH:MM" string to local midnight of `date`.
///
/// Each part is read from its leading digits; a part without any counts as
/// zero. Values past the end of the day roll forward onto the following day.
/// Offsets that leave the calendar's range yield midnight of `date`.
pub fn to_instant(date: NaiveDate, time: &str) -> NaiveDateTime {
    let mut parts = time.trim().split(':');
    let hours = parse_part(parts.next());
    let minutes = parse_part(parts.next());

    let start = midnight(date);
    start
        .checked_add_signed(Duration::hours(hours))
        .and_then(|instant| instant.checked_add_signed(Duration::minutes(minutes)))
        .unwrap_or(start)
}

fn parse_part(part: Option<&str>) -> i64 {
    let part = part.unwrap_or_default().trim_start();
    let digits = part
        .find(|c: char| !c.is_ascii_digit())
        .map_or(part, |end| &part[..end]);

    digits.parse::<u32>().map(i64::from).unwrap_or(0)
}

pub fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::default())
}

/// Saturates to `instant` when the result would leave the calendar's range
pub fn add_minutes(instant: NaiveDateTime, minutes: i64) -> NaiveDateTime {
    instant
        .checked_add_signed(Duration::minutes(minutes))
        .unwrap_or(instant)
}

/// Human readable remaining time: "2h15m", or "45m" when under an hour.
/// Floors to whole minutes; negative deltas read as "0m".
pub fn format_remaining(delta_ms: i64) -> String {
    let total_minutes = delta_ms.max(0) / 60_000;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours > 0 {
        format!("{}h{}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Formats the distance from `from` to `to`
pub fn format_between(from: NaiveDateTime, to: NaiveDateTime) -> String {
    format_remaining((to - from).num_milliseconds())
}

/// Monday on or before `date`
pub fn week_start_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

pub fn next_week_start(week_start: NaiveDate) -> NaiveDate {
    week_start + Duration::days(7)
}

/// Last representable millisecond of the week's Sunday (23:59:59.999)
pub fn end_of_week(week_start: NaiveDate) -> NaiveDateTime {
    midnight(next_week_start(week_start)) - Duration::milliseconds(1)
}
