//! Civil time to Julian Day, and birth-time normalisation to UTC.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDateTime, TimeZone, Timelike, Utc};
use regex::Regex;

use crate::error::AstrotError;

/// Julian Day of the J2000.0 epoch (2000-01-01 12:00 TT).
pub const J2000_JD: f64 = 2_451_545.0;
pub const DAYS_PER_CENTURY: f64 = 36_525.0;

/// Julian Day for a proleptic Gregorian UTC date and time of day.
///
/// Fliegel-Van Flandern day number with the time folded in as
/// `(hour - 12) / 24 + minute / 1440`. The caller converts to UTC first.
pub fn julian_day(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> f64 {
    let month = month as i64;
    let a = (14 - month).div_euclid(12);
    let y = year as i64 + 4800 - a;
    let m = month + 12 * a - 3;
    let jdn = day as i64 + (153 * m + 2).div_euclid(5) + 365 * y + y.div_euclid(4)
        - y.div_euclid(100)
        + y.div_euclid(400)
        - 32045;
    jdn as f64 + (hour as f64 - 12.0) / 24.0 + minute as f64 / 1440.0
}

/// Julian Day for a UTC instant, including seconds.
pub fn julian_day_from_utc(dt: DateTime<Utc>) -> f64 {
    let seconds = dt.second() as f64 + dt.nanosecond() as f64 / 1e9;
    julian_day(dt.year(), dt.month(), dt.day(), dt.hour(), dt.minute()) + seconds / 86_400.0
}

/// Julian centuries elapsed since J2000.0.
pub fn julian_centuries(jd: f64) -> f64 {
    (jd - J2000_JD) / DAYS_PER_CENTURY
}

lazy_static::lazy_static! {
    static ref OFFSET_PATTERN: Regex =
        Regex::new(r"^(?:UTC|GMT)?\s*([+-])\s*(\d{1,2})(?::?(\d{2}))?$").unwrap();
}

/// Parse a fixed-offset timezone identifier.
///
/// Accepts `UTC`, `GMT`, `Z`, `UTC+3`, `UTC-05:30`, `GMT+0530`, `+05:30`
/// and `-0800`. Region names are rejected.
pub fn parse_utc_offset(identifier: &str) -> Result<FixedOffset, AstrotError> {
    let trimmed = identifier.trim();
    let upper = trimmed.to_uppercase();
    if matches!(upper.as_str(), "UTC" | "GMT" | "Z" | "") {
        return FixedOffset::east_opt(0)
            .ok_or_else(|| AstrotError::InvalidInput("zero offset".to_string()));
    }

    let caps = OFFSET_PATTERN.captures(&upper).ok_or_else(|| {
        AstrotError::InvalidInput(format!(
            "unsupported timezone '{}': supply a fixed UTC offset such as UTC+03:00",
            identifier
        ))
    })?;

    let sign = if &caps[1] == "-" { -1 } else { 1 };
    let hours: i32 = caps[2]
        .parse()
        .map_err(|_| AstrotError::InvalidInput(format!("bad offset hours in '{}'", identifier)))?;
    let minutes: i32 = match caps.get(3) {
        Some(m) => m
            .as_str()
            .parse()
            .map_err(|_| AstrotError::InvalidInput(format!("bad offset minutes in '{}'", identifier)))?,
        None => 0,
    };
    if hours > 14 || minutes >= 60 {
        return Err(AstrotError::InvalidInput(format!(
            "timezone offset out of range: '{}'",
            identifier
        )));
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(|| {
        AstrotError::InvalidInput(format!("timezone offset out of range: '{}'", identifier))
    })
}

/// Interpret a local wall-clock time in the given timezone and return UTC.
pub fn local_to_utc(local: NaiveDateTime, timezone: &str) -> Result<DateTime<Utc>, AstrotError> {
    let offset = parse_utc_offset(timezone)?;
    offset
        .from_local_datetime(&local)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| {
            AstrotError::InvalidInput(format!("local time {} does not exist in {}", local, timezone))
        })
}
