// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! `DATE` / `DATE-TIME` values and their normalization to UTC.

use std::fmt;
use std::str::FromStr;

use jiff::civil::{Date, DateTime, Time};
use jiff::tz::TimeZone;

use crate::IcalError;

/// A `DATE` or `DATE-TIME` value in its basic (compact) form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateValue {
    /// `YYYYMMDD`, an all-day value without time of day.
    Date(Date),

    /// `YYYYMMDDTHHMMSS`, a wall-clock time whose zone comes from context.
    Floating(DateTime),

    /// `YYYYMMDDTHHMMSSZ`, an absolute UTC time.
    Utc(DateTime),
}

impl DateValue {
    /// Whether this is a date-only value.
    #[must_use]
    pub fn is_date(&self) -> bool {
        matches!(self, DateValue::Date(_))
    }

    /// Normalizes a timed value to UTC.
    ///
    /// Dates and UTC values are returned unchanged. A floating value is placed
    /// in `zone` when one is given and read as UTC otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if `zone` is unknown or the wall-clock time cannot be
    /// resolved in it.
    pub fn into_utc(self, zone: Option<&str>) -> Result<DateValue, IcalError> {
        match (self, zone) {
            (DateValue::Floating(local), Some(zone)) => zoned_to_utc(local, zone).map(DateValue::Utc),
            (DateValue::Floating(local), None) => Ok(DateValue::Utc(local)),
            (value, _) => Ok(value),
        }
    }
}

impl FromStr for DateValue {
    type Err = IcalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || IcalError::InvalidDate(s.to_string());
        let value = s.trim();

        if let Some((date, time)) = value.split_once('T') {
            let date = parse_date(date).ok_or_else(invalid)?;
            let (time, utc) = match time.strip_suffix('Z') {
                Some(time) => (time, true),
                None => (time, false),
            };
            let time = parse_time(time).ok_or_else(invalid)?;
            let datetime = date.to_datetime(time);
            Ok(match utc {
                true => DateValue::Utc(datetime),
                false => DateValue::Floating(datetime),
            })
        } else {
            parse_date(value).map(DateValue::Date).ok_or_else(invalid)
        }
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateValue::Date(date) => write_date(f, *date),
            DateValue::Floating(dt) => write_datetime(f, *dt),
            DateValue::Utc(dt) => {
                write_datetime(f, *dt)?;
                f.write_str("Z")
            }
        }
    }
}

/// Converts a wall-clock time in the named IANA zone to the UTC wall clock.
///
/// The offset is the zone's offset at that particular date, so summer and
/// winter times in the same zone map to different UTC hours. A time repeated
/// by a backward transition resolves to its first occurrence, and a time
/// skipped by a forward transition is read with the offset in force after the
/// gap. Both rules pick the earliest candidate instant.
///
/// # Errors
///
/// Returns an error if the zone is not in the time zone database.
pub fn zoned_to_utc(local: DateTime, zone: &str) -> Result<DateTime, IcalError> {
    let tz = TimeZone::get(zone).map_err(|e| IcalError::UnknownTimeZone {
        zone: zone.to_string(),
        reason: e.to_string(),
    })?;

    let zoned = tz
        .to_ambiguous_zoned(local)
        .earlier()
        .map_err(|e| IcalError::Unresolvable {
            datetime: DateValue::Floating(local).to_string(),
            zone: zone.to_string(),
            reason: e.to_string(),
        })?;

    Ok(zoned.with_time_zone(TimeZone::UTC).datetime())
}

fn parse_date(s: &str) -> Option<Date> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let year = s.get(0..4)?.parse().ok()?;
    let month = s.get(4..6)?.parse().ok()?;
    let day = s.get(6..8)?.parse().ok()?;
    Date::new(year, month, day).ok()
}

fn parse_time(s: &str) -> Option<Time> {
    if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let hour = s.get(0..2)?.parse().ok()?;
    let minute = s.get(2..4)?.parse().ok()?;
    let second = s.get(4..6)?.parse().ok()?;
    Time::new(hour, minute, second, 0).ok()
}

fn write_date(f: &mut fmt::Formatter<'_>, date: Date) -> fmt::Result {
    write!(f, "{:04}{:02}{:02}", date.year(), date.month(), date.day())
}

fn write_datetime(f: &mut fmt::Formatter<'_>, dt: DateTime) -> fmt::Result {
    write_date(f, dt.date())?;
    write!(f, "T{:02}{:02}{:02}", dt.hour(), dt.minute(), dt.second())
}
