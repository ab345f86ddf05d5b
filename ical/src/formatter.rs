// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Composer for single-event calendar documents.

use std::fmt;

use jiff::Timestamp;
use jiff::tz::TimeZone;

use crate::{DateValue, text};

/// `PRODID` written into every composed document.
pub const PRODUCT_ID: &str = "-//radisync//caldav//EN";

/// Summary used when the source event has none.
const UNTITLED: &str = "Untitled";

/// Maximum length of a content line in octets, excluding the line break.
const MAX_LINE_OCTETS: usize = 75;

/// A calendar document holding exactly one event.
///
/// Timed values are stored in UTC; a floating value handed to
/// [`EventDocument::new`] is read as UTC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDocument {
    uid: String,
    dtstamp: Timestamp,
    summary: String,
    start: DateValue,
    end: DateValue,
    recurrence: Vec<String>,
    description: Option<String>,
    location: Option<String>,
}

impl EventDocument {
    /// Creates a document for the given identity and time span.
    #[must_use]
    pub fn new(uid: &str, dtstamp: Timestamp, summary: &str, start: DateValue, end: DateValue) -> Self {
        let summary = match summary.trim() {
            "" => UNTITLED,
            _ => summary,
        };

        Self {
            uid: uid.to_string(),
            dtstamp,
            summary: summary.to_string(),
            start: as_utc(start),
            end: as_utc(end),
            recurrence: Vec::new(),
            description: None,
            location: None,
        }
    }

    /// Sets the recurrence lines (`RRULE:...`, `EXDATE:...`), written verbatim.
    #[must_use]
    pub fn with_recurrence(mut self, lines: Vec<String>) -> Self {
        self.recurrence = lines;
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description.filter(|d| !d.is_empty());
        self
    }

    /// Sets the location.
    #[must_use]
    pub fn with_location(mut self, location: Option<String>) -> Self {
        self.location = location.filter(|l| !l.is_empty());
        self
    }

    /// The event's unique identifier.
    #[must_use]
    pub fn uid(&self) -> &str {
        &self.uid
    }

    /// Renders the document with CRLF line breaks and folded long lines.
    #[must_use]
    pub fn format(&self) -> String {
        let mut out = String::new();
        let mut line = |s: &str| push_folded(&mut out, s);

        line("BEGIN:VCALENDAR");
        line("VERSION:2.0");
        line(&format!("PRODID:{PRODUCT_ID}"));
        line("BEGIN:VEVENT");
        line(&format!("UID:{}", self.uid));
        line(&format!("DTSTAMP:{}", format_stamp(self.dtstamp)));
        line(&format!("SUMMARY:{}", text::escape(&self.summary)));
        line(&date_property("DTSTART", self.start));
        line(&date_property("DTEND", self.end));
        for rule in &self.recurrence {
            line(rule);
        }
        if let Some(description) = &self.description {
            line(&format!("DESCRIPTION:{}", text::escape(description)));
        }
        if let Some(location) = &self.location {
            line(&format!("LOCATION:{}", text::escape(location)));
        }
        line("END:VEVENT");
        line("END:VCALENDAR");
        out
    }
}

impl fmt::Display for EventDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

fn as_utc(value: DateValue) -> DateValue {
    match value {
        DateValue::Floating(dt) => DateValue::Utc(dt),
        value => value,
    }
}

fn date_property(name: &str, value: DateValue) -> String {
    match value {
        DateValue::Date(_) => format!("{name};VALUE=DATE:{value}"),
        _ => format!("{name}:{value}"),
    }
}

fn format_stamp(ts: Timestamp) -> String {
    DateValue::Utc(ts.to_zoned(TimeZone::UTC).datetime()).to_string()
}

/// Appends `line` and a CRLF, inserting a fold (CRLF + space) before any
/// character that would push the physical line past 75 octets.
fn push_folded(out: &mut String, line: &str) {
    let mut width = 0;
    for c in line.chars() {
        let len = c.len_utf8();
        if width + len > MAX_LINE_OCTETS {
            out.push_str("\r\n ");
            width = 1;
        }
        out.push(c);
        width += len;
    }
    out.push_str("\r\n");
}

#[cfg(test)]
mod tests {
    use jiff::civil::{date, datetime};

    use super::*;

    fn stamp() -> Timestamp {
        "2024-05-01T12:34:56.789Z".parse().unwrap()
    }

    #[test]
    fn composes_timed_event_in_field_order() {
        let doc = EventDocument::new(
            "abc",
            stamp(),
            "Review",
            DateValue::Utc(datetime(2024, 5, 2, 9, 0, 0, 0)),
            DateValue::Utc(datetime(2024, 5, 2, 10, 0, 0, 0)),
        )
        .with_recurrence(vec!["RRULE:FREQ=WEEKLY".to_string(), "EXDATE:20240509T090000Z".to_string()])
        .with_description(Some("first\nsecond".to_string()))
        .with_location(Some("Room 1, East".to_string()));

        let expected = "BEGIN:VCALENDAR\r\n\
            VERSION:2.0\r\n\
            PRODID:-//radisync//caldav//EN\r\n\
            BEGIN:VEVENT\r\n\
            UID:abc\r\n\
            DTSTAMP:20240501T123456Z\r\n\
            SUMMARY:Review\r\n\
            DTSTART:20240502T090000Z\r\n\
            DTEND:20240502T100000Z\r\n\
            RRULE:FREQ=WEEKLY\r\n\
            EXDATE:20240509T090000Z\r\n\
            DESCRIPTION:first\\nsecond\r\n\
            LOCATION:Room 1\\, East\r\n\
            END:VEVENT\r\n\
            END:VCALENDAR\r\n";
        assert_eq!(doc.format(), expected);
    }

    #[test]
    fn composes_all_day_event() {
        let doc = EventDocument::new(
            "d",
            stamp(),
            "Trip",
            DateValue::Date(date(2024, 8, 1)),
            DateValue::Date(date(2024, 8, 4)),
        );
        let out = doc.format();
        assert!(out.contains("DTSTART;VALUE=DATE:20240801\r\n"));
        assert!(out.contains("DTEND;VALUE=DATE:20240804\r\n"));
        assert!(!out.contains("DESCRIPTION"));
    }

    #[test]
    fn floating_values_are_written_as_utc() {
        let doc = EventDocument::new(
            "f",
            stamp(),
            "Float",
            DateValue::Floating(datetime(2024, 5, 2, 9, 0, 0, 0)),
            DateValue::Floating(datetime(2024, 5, 2, 9, 30, 0, 0)),
        );
        assert!(doc.format().contains("DTSTART:20240502T090000Z\r\n"));
    }

    #[test]
    fn empty_summary_becomes_untitled() {
        let day = DateValue::Date(date(2024, 1, 1));
        let doc = EventDocument::new("u", stamp(), "  ", day, day);
        assert!(doc.format().contains("SUMMARY:Untitled\r\n"));
    }

    #[test]
    fn folds_long_lines_without_splitting_characters() {
        let mut out = String::new();
        let line = format!("DESCRIPTION:{}", "é".repeat(60));
        push_folded(&mut out, &line);

        let physical: Vec<&str> = out.trim_end_matches("\r\n").split("\r\n").collect();
        assert!(physical.len() > 1);
        for (i, l) in physical.iter().enumerate() {
            assert!(l.len() <= MAX_LINE_OCTETS, "line {i} is {} octets", l.len());
            if i > 0 {
                assert!(l.starts_with(' '));
            }
        }
        assert_eq!(crate::syntax::unfold(&out), format!("{line}\r\n"));
    }
}
