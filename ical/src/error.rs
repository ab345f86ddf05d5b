// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

/// Errors raised while interpreting iCalendar values.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IcalError {
    /// A `DATE` or `DATE-TIME` value is not in `YYYYMMDD` / `YYYYMMDDTHHMMSS[Z]` form.
    #[error("invalid date value: {0:?}")]
    InvalidDate(String),

    /// The zone name is not present in the time zone database.
    #[error("unknown time zone {zone:?}: {reason}")]
    UnknownTimeZone {
        /// The IANA zone name that was requested.
        zone: String,
        /// Underlying lookup failure.
        reason: String,
    },

    /// The wall-clock time could not be placed on the zone's timeline.
    #[error("cannot resolve {datetime} in {zone}: {reason}")]
    Unresolvable {
        /// The wall-clock value, formatted as an iCalendar date-time.
        datetime: String,
        /// The IANA zone name.
        zone: String,
        /// Underlying resolution failure.
        reason: String,
    },
}
