// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Conversion between Google event resources and iCalendar events.

use jiff::Timestamp;
use jiff::civil::{Date, DateTime};
use jiff::tz::TimeZone;
use radisync_ical::{CalendarEvent, DateValue, EventDocument, zoned_to_utc};

use crate::error::GoogleError;
use crate::types::{EventDateTime, RemoteEvent};

/// Zone Google is told for timed recurring events that carry none, since
/// the API refuses recurring events without one.
const RECURRENCE_FALLBACK_ZONE: &str = "UTC";

impl From<&CalendarEvent> for RemoteEvent {
    fn from(event: &CalendarEvent) -> Self {
        let recurrence: Vec<String> = event.rrule.iter().map(|r| format!("RRULE:{r}")).collect();
        let zone = event.timezone.as_deref();

        let mut start = to_event_date_time(event.dtstart, zone);
        let mut end = to_event_date_time(event.dtend, zone);
        if !recurrence.is_empty() {
            for edge in [&mut start, &mut end] {
                if edge.date_time.is_some() && edge.time_zone.is_none() {
                    edge.time_zone = Some(RECURRENCE_FALLBACK_ZONE.to_string());
                }
            }
        }

        RemoteEvent {
            id: None,
            summary: Some(event.summary.clone()),
            start,
            end,
            description: event.description.clone(),
            location: event.location.clone(),
            status: None,
            ical_uid: Some(event.uid.clone()),
            recurring_event_id: None,
            recurrence,
        }
    }
}

/// Maps an iCalendar value to its API form.
///
/// A floating value keeps its wall-clock time and names its zone; without a
/// zone it is read as UTC.
fn to_event_date_time(value: DateValue, zone: Option<&str>) -> EventDateTime {
    match (value, zone) {
        (DateValue::Date(date), _) => EventDateTime {
            date: Some(date.to_string()),
            ..Default::default()
        },
        (DateValue::Floating(local), Some(zone)) => EventDateTime {
            date_time: Some(rfc3339(local, false)),
            time_zone: Some(zone.to_string()),
            ..Default::default()
        },
        (DateValue::Floating(dt) | DateValue::Utc(dt), _) => EventDateTime {
            date_time: Some(rfc3339(dt, true)),
            ..Default::default()
        },
    }
}

fn rfc3339(dt: DateTime, utc: bool) -> String {
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}{}",
        dt.year(),
        dt.month(),
        dt.day(),
        dt.hour(),
        dt.minute(),
        dt.second(),
        if utc { "Z" } else { "" }
    )
}

impl EventDateTime {
    /// Converts to an iCalendar value: a date for all-day values, UTC
    /// otherwise.
    ///
    /// A `dateTime` with an explicit offset is placed with that offset. One
    /// without is read in `timeZone`, or in UTC when that is absent too.
    ///
    /// # Errors
    ///
    /// Returns an error if neither field is usable or the zone is unknown.
    pub fn to_date_value(&self) -> Result<DateValue, GoogleError> {
        let invalid = |value: &str| GoogleError::InvalidEvent {
            uid: String::new(),
            field: "date",
            value: value.to_string(),
        };

        if let Some(date) = self.date.as_deref() {
            return date
                .parse::<Date>()
                .map(DateValue::Date)
                .map_err(|_| invalid(date));
        }

        let Some(raw) = self.date_time.as_deref() else {
            return Err(invalid(""));
        };

        if let Ok(ts) = raw.parse::<Timestamp>() {
            return Ok(DateValue::Utc(ts.to_zoned(TimeZone::UTC).datetime()));
        }

        let local = raw.parse::<DateTime>().map_err(|_| invalid(raw))?;
        let utc = match self.time_zone.as_deref().filter(|tz| !tz.is_empty()) {
            Some(zone) => zoned_to_utc(local, zone)?,
            None => local,
        };
        Ok(DateValue::Utc(utc))
    }
}

impl RemoteEvent {
    /// Builds the calendar document for this event, stamped at `dtstamp`.
    ///
    /// Recurrence lines are copied verbatim. A missing end takes the start.
    ///
    /// # Errors
    ///
    /// Returns an error if the event has no identifier or its start cannot be
    /// converted.
    pub fn to_document(&self, dtstamp: Timestamp) -> Result<EventDocument, GoogleError> {
        let uid = self.cross_store_id().ok_or_else(|| GoogleError::InvalidEvent {
            uid: String::new(),
            field: "id",
            value: String::new(),
        })?;

        let with_uid = |e: GoogleError| match e {
            GoogleError::InvalidEvent { field, value, .. } => GoogleError::InvalidEvent {
                uid: uid.to_string(),
                field,
                value,
            },
            other => other,
        };

        let start = self.start.to_date_value().map_err(with_uid)?;
        let end = match self.end == EventDateTime::default() {
            true => start,
            false => self.end.to_date_value().map_err(with_uid)?,
        };

        Ok(EventDocument::new(
            uid,
            dtstamp,
            self.summary.as_deref().unwrap_or_default(),
            start,
            end,
        )
        .with_recurrence(self.recurrence.clone())
        .with_description(self.description.clone())
        .with_location(self.location.clone()))
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::{date, datetime};
    use radisync_ical::parse_events;

    use super::*;

    fn parse_one(body: &str) -> CalendarEvent {
        parse_events(&format!("BEGIN:VCALENDAR\nBEGIN:VEVENT\n{body}END:VEVENT\nEND:VCALENDAR\n")).remove(0)
    }

    #[test]
    fn all_day_event_uses_date_fields() {
        let event = parse_one("UID:h\nSUMMARY:Holiday\nDTSTART;VALUE=DATE:20241225\nDTEND;VALUE=DATE:20241226\n");
        let remote = RemoteEvent::from(&event);
        assert_eq!(remote.start.date.as_deref(), Some("2024-12-25"));
        assert_eq!(remote.end.date.as_deref(), Some("2024-12-26"));
        assert_eq!(remote.start.date_time, None);
        assert_eq!(remote.start.time_zone, None);
        assert_eq!(remote.ical_uid.as_deref(), Some("h"));
        assert_eq!(remote.id, None);
    }

    #[test]
    fn utc_event_has_no_zone() {
        let event = parse_one("UID:u\nSUMMARY:Call\nDTSTART:20240115T150000Z\nDTEND:20240115T160000Z\n");
        let remote = RemoteEvent::from(&event);
        assert_eq!(remote.start.date_time.as_deref(), Some("2024-01-15T15:00:00Z"));
        assert_eq!(remote.start.time_zone, None);
    }

    #[test]
    fn zoned_event_keeps_wall_clock_and_zone() {
        let event = parse_one(
            "UID:z\nSUMMARY:Office hours\nDTSTART;TZID=America/New_York:20240115T100000\n\
             DTEND;TZID=America/New_York:20240115T110000\nRRULE:FREQ=WEEKLY;BYDAY=MO\n\
             DESCRIPTION:Bring\\nquestions\nLOCATION:Room 2\n",
        );
        let remote = RemoteEvent::from(&event);
        assert_eq!(remote.start.date_time.as_deref(), Some("2024-01-15T10:00:00"));
        assert_eq!(remote.start.time_zone.as_deref(), Some("America/New_York"));
        assert_eq!(remote.end.date_time.as_deref(), Some("2024-01-15T11:00:00"));
        assert_eq!(remote.recurrence, vec!["RRULE:FREQ=WEEKLY;BYDAY=MO".to_string()]);
        assert_eq!(remote.description.as_deref(), Some("Bring\nquestions"));
        assert_eq!(remote.location.as_deref(), Some("Room 2"));
    }

    #[test]
    fn zoneless_recurring_event_gets_utc_zone() {
        let event = parse_one("UID:r\nSUMMARY:Daily\nDTSTART:20240115T080000Z\nRRULE:FREQ=DAILY\n");
        let remote = RemoteEvent::from(&event);
        assert_eq!(remote.start.date_time.as_deref(), Some("2024-01-15T08:00:00Z"));
        assert_eq!(remote.start.time_zone.as_deref(), Some("UTC"));
    }

    #[test]
    fn date_time_with_offset_uses_offset() {
        let edge = EventDateTime {
            date_time: Some("2024-07-15T10:00:00+02:00".to_string()),
            time_zone: Some("America/New_York".to_string()),
            ..Default::default()
        };
        assert_eq!(
            edge.to_date_value().unwrap(),
            DateValue::Utc(datetime(2024, 7, 15, 8, 0, 0, 0))
        );
    }

    #[test]
    fn date_time_without_offset_uses_zone_per_season() {
        let at = |s: &str| EventDateTime {
            date_time: Some(s.to_string()),
            time_zone: Some("America/New_York".to_string()),
            ..Default::default()
        };
        assert_eq!(
            at("2024-07-15T10:00:00").to_date_value().unwrap(),
            DateValue::Utc(datetime(2024, 7, 15, 14, 0, 0, 0))
        );
        assert_eq!(
            at("2024-01-15T10:00:00").to_date_value().unwrap(),
            DateValue::Utc(datetime(2024, 1, 15, 15, 0, 0, 0))
        );
    }

    #[test]
    fn date_time_without_offset_or_zone_is_utc() {
        let edge = EventDateTime {
            date_time: Some("2024-01-15T10:00:00".to_string()),
            ..Default::default()
        };
        assert_eq!(
            edge.to_date_value().unwrap(),
            DateValue::Utc(datetime(2024, 1, 15, 10, 0, 0, 0))
        );
    }

    #[test]
    fn date_only_value() {
        let edge = EventDateTime {
            date: Some("2024-02-29".to_string()),
            ..Default::default()
        };
        assert_eq!(edge.to_date_value().unwrap(), DateValue::Date(date(2024, 2, 29)));
    }

    #[test]
    fn document_from_remote_event() {
        let remote = RemoteEvent {
            id: Some("g1".to_string()),
            summary: None,
            start: EventDateTime {
                date_time: Some("2024-01-15T10:00:00".to_string()),
                time_zone: Some("America/New_York".to_string()),
                ..Default::default()
            },
            end: EventDateTime {
                date_time: Some("2024-01-15T11:00:00".to_string()),
                time_zone: Some("America/New_York".to_string()),
                ..Default::default()
            },
            description: Some("Line 1\nLine 2".to_string()),
            ical_uid: Some("office-hours@google.com".to_string()),
            recurrence: vec!["RRULE:FREQ=WEEKLY".to_string(), "EXDATE:20240122T150000Z".to_string()],
            ..Default::default()
        };

        let ics = remote.to_document(Timestamp::UNIX_EPOCH).unwrap().format();
        assert!(ics.contains("UID:office-hours@google.com\r\n"));
        assert!(ics.contains("SUMMARY:Untitled\r\n"));
        assert!(ics.contains("DTSTART:20240115T150000Z\r\n"));
        assert!(ics.contains("DTEND:20240115T160000Z\r\n"));
        assert!(ics.contains("RRULE:FREQ=WEEKLY\r\nEXDATE:20240122T150000Z\r\n"));
        assert!(ics.contains("DESCRIPTION:Line 1\\nLine 2\r\n"));
    }

    #[test]
    fn document_falls_back_to_google_id() {
        let remote = RemoteEvent {
            id: Some("g2".to_string()),
            summary: Some("Trip".to_string()),
            start: EventDateTime {
                date: Some("2024-08-01".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let ics = remote.to_document(Timestamp::UNIX_EPOCH).unwrap().format();
        assert!(ics.contains("UID:g2\r\n"));
        assert!(ics.contains("DTSTART;VALUE=DATE:20240801\r\nDTEND;VALUE=DATE:20240801\r\n"));
    }

    #[test]
    fn document_rejects_event_without_start() {
        let remote = RemoteEvent {
            ical_uid: Some("broken".to_string()),
            end: EventDateTime {
                date: Some("2024-08-01".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let err = remote.to_document(Timestamp::UNIX_EPOCH).unwrap_err();
        assert!(matches!(err, GoogleError::InvalidEvent { uid, .. } if uid == "broken"));
    }
}
