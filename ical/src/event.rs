// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use jiff::Timestamp;

use crate::syntax::{Component, ContentLine, parse_components};
use crate::{DateValue, EventDocument, IcalError, text};

const VCALENDAR: &str = "VCALENDAR";
const VEVENT: &str = "VEVENT";
const VTIMEZONE: &str = "VTIMEZONE";

/// An event extracted from a `VEVENT` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    /// Globally stable identifier, shared with the other store.
    pub uid: String,

    /// Title of the event.
    pub summary: String,

    /// Start date or date-time.
    pub dtstart: DateValue,

    /// End date or date-time. Equals `dtstart` when `DTEND` is absent or unreadable.
    pub dtend: DateValue,

    /// IANA zone name for floating date-times.
    pub timezone: Option<String>,

    /// Free-text description, unescaped.
    pub description: Option<String>,

    /// Free-text location, unescaped.
    pub location: Option<String>,

    /// Recurrence rule, carried without interpretation.
    pub rrule: Option<String>,
}

impl CalendarEvent {
    /// Whether the event spans whole days.
    #[must_use]
    pub fn is_all_day(&self) -> bool {
        self.dtstart.is_date()
    }

    /// Start normalized to UTC, or the bare date for all-day events.
    ///
    /// # Errors
    ///
    /// Returns an error if the event's zone cannot be resolved.
    pub fn start(&self) -> Result<DateValue, IcalError> {
        self.dtstart.into_utc(self.timezone.as_deref())
    }

    /// End normalized to UTC, or the bare date for all-day events.
    ///
    /// # Errors
    ///
    /// Returns an error if the event's zone cannot be resolved.
    pub fn end(&self) -> Result<DateValue, IcalError> {
        self.dtend.into_utc(self.timezone.as_deref())
    }

    /// Builds the single-event document for this event, stamped at `dtstamp`.
    ///
    /// # Errors
    ///
    /// Returns an error if the event's zone cannot be resolved.
    pub fn to_document(&self, dtstamp: Timestamp) -> Result<EventDocument, IcalError> {
        let recurrence = self.rrule.iter().map(|rule| format!("RRULE:{rule}")).collect();
        Ok(
            EventDocument::new(&self.uid, dtstamp, &self.summary, self.start()?, self.end()?)
                .with_recurrence(recurrence)
                .with_description(self.description.clone())
                .with_location(self.location.clone()),
        )
    }
}

/// Net change set of one store since a checkpoint.
///
/// `E` is the event shape native to the store that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncResult<E = CalendarEvent> {
    /// Active events, in the order the store reported them.
    pub events: Vec<E>,

    /// Cross-store identifiers of events removed since the checkpoint.
    pub deleted: Vec<String>,

    /// Checkpoint to present on the next incremental request.
    pub sync_token: String,
}

/// Result of scanning a calendar body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCalendar {
    /// Complete events in document order.
    pub events: Vec<CalendarEvent>,

    /// Number of `VEVENT` blocks dropped for a missing or malformed
    /// `UID`, `SUMMARY` or `DTSTART`.
    pub dropped: usize,

    /// Number of `VEVENT` blocks skipped because they override a single
    /// instance of a recurring series.
    pub overrides: usize,
}

/// Extracts all events from a calendar body, discarding incomplete ones.
#[must_use]
pub fn parse_events(src: &str) -> Vec<CalendarEvent> {
    parse_calendar(src).events
}

/// Extracts all events from a calendar body and counts what was skipped.
///
/// Events are read from every `VCALENDAR` in the input and from top-level
/// `VEVENT` blocks. A zone declared by a `VTIMEZONE` applies to the events of
/// its own calendar only.
#[must_use]
pub fn parse_calendar(src: &str) -> ParsedCalendar {
    let mut parsed = ParsedCalendar::default();
    for root in parse_components(src) {
        if root.name == VEVENT {
            collect(&mut parsed, &root, None);
        } else if root.name == VCALENDAR {
            let declared = root
                .children_named(VTIMEZONE)
                .find_map(|tz| non_empty(tz.property("TZID")));
            for event in root.children_named(VEVENT) {
                collect(&mut parsed, event, declared);
            }
        }
    }
    parsed
}

fn collect(parsed: &mut ParsedCalendar, block: &Component, declared_zone: Option<&str>) {
    if block.property("RECURRENCE-ID").is_some() {
        parsed.overrides += 1;
        return;
    }

    match build_event(block, declared_zone) {
        Some(event) => parsed.events.push(event),
        None => parsed.dropped += 1,
    }
}

fn build_event(block: &Component, declared_zone: Option<&str>) -> Option<CalendarEvent> {
    let uid = non_empty(block.property("UID"))?;
    let summary = non_empty(block.property("SUMMARY"))?;

    let start_line = block.property("DTSTART")?;
    let dtstart: DateValue = start_line.value.parse().ok()?;

    let end_line = block.property("DTEND");
    // A missing or unreadable end collapses to the start.
    let dtend = end_line
        .and_then(|line| line.value.trim().parse().ok())
        .unwrap_or(dtstart);

    let timezone = zone_of(Some(start_line))
        .or_else(|| zone_of(end_line))
        .or(declared_zone)
        .map(str::to_string);

    Some(CalendarEvent {
        uid: uid.to_string(),
        summary: text::unescape(summary),
        dtstart,
        dtend,
        timezone,
        description: non_empty(block.property("DESCRIPTION")).map(text::unescape),
        location: non_empty(block.property("LOCATION")).map(text::unescape),
        rrule: non_empty(block.property("RRULE")).map(str::to_string),
    })
}

fn zone_of(line: Option<&ContentLine>) -> Option<&str> {
    line.and_then(|l| l.parameter("TZID"))
        .map(str::trim)
        .filter(|tz| !tz.is_empty())
}

fn non_empty(line: Option<&ContentLine>) -> Option<&str> {
    line.map(|l| l.value.trim()).filter(|v| !v.is_empty())
}
