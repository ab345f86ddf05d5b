// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for event extraction and document composition.

use jiff::Timestamp;
use radisync_ical::{DateValue, parse_calendar, parse_events};

/// A body as stored by Radicale: bare LF line endings, a `VTIMEZONE` block
/// ahead of the event, and a folded description.
const RADICALE_BODY: &str = "BEGIN:VCALENDAR
VERSION:2.0
PRODID:-//Example Corp.//Cal Client 1.0//EN
BEGIN:VTIMEZONE
TZID:Europe/Berlin
BEGIN:DAYLIGHT
TZOFFSETFROM:+0100
TZOFFSETTO:+0200
DTSTART:19700329T020000
RRULE:FREQ=YEARLY;BYMONTH=3;BYDAY=-1SU
END:DAYLIGHT
BEGIN:STANDARD
TZOFFSETFROM:+0200
TZOFFSETTO:+0100
DTSTART:19701025T030000
RRULE:FREQ=YEARLY;BYMONTH=10;BYDAY=-1SU
END:STANDARD
END:VTIMEZONE
BEGIN:VEVENT
UID:0f5c1a3e-weekly@example.com
DTSTAMP:20240101T000000Z
SUMMARY:Weekly sync
DTSTART;TZID=Europe/Berlin:20240708T100000
DTEND;TZID=Europe/Berlin:20240708T103000
RRULE:FREQ=WEEKLY;BYDAY=MO
DESCRIPTION:Agenda:\\n- status\\n- blockers. This line is long enough that a
  client folds it.
LOCATION:Room 3\\, 2nd floor
END:VEVENT
END:VCALENDAR
";

#[test]
fn test_parse_radicale_body() {
    let parsed = parse_calendar(RADICALE_BODY);
    assert_eq!(parsed.dropped, 0);
    assert_eq!(parsed.events.len(), 1);

    let event = &parsed.events[0];
    assert_eq!(event.uid, "0f5c1a3e-weekly@example.com");
    assert_eq!(event.summary, "Weekly sync");
    assert_eq!(event.timezone.as_deref(), Some("Europe/Berlin"));
    assert_eq!(event.rrule.as_deref(), Some("FREQ=WEEKLY;BYDAY=MO"));
    assert_eq!(
        event.description.as_deref(),
        Some("Agenda:\n- status\n- blockers. This line is long enough that a client folds it.")
    );
    assert_eq!(event.location.as_deref(), Some("Room 3, 2nd floor"));

    // Summer in Berlin is UTC+2.
    assert_eq!(event.start().unwrap().to_string(), "20240708T080000Z");
    assert_eq!(event.end().unwrap().to_string(), "20240708T083000Z");
}

#[test]
fn test_parse_multiple_events_keeps_order() {
    let src = "BEGIN:VCALENDAR\r\n\
BEGIN:VEVENT\r\nUID:1\r\nSUMMARY:First\r\nDTSTART:20240101T090000Z\r\nEND:VEVENT\r\n\
BEGIN:VEVENT\r\nUID:2\r\nSUMMARY:Second\r\nDTSTART;VALUE=DATE:20240102\r\nEND:VEVENT\r\n\
END:VCALENDAR\r\n";

    let uids: Vec<_> = parse_events(src).into_iter().map(|e| e.uid).collect();
    assert_eq!(uids, vec!["1", "2"]);
}

#[test]
fn test_parse_garbage_yields_nothing() {
    assert!(parse_events("").is_empty());
    assert!(parse_events("not a calendar at all").is_empty());
    assert!(parse_events("BEGIN:VCALENDAR\nBEGIN:VEVENT\nUID:1\n").is_empty());
}

#[test]
fn test_round_trip_through_document() {
    let event = parse_events(RADICALE_BODY).remove(0);
    let document = event.to_document(Timestamp::UNIX_EPOCH).unwrap().format();

    assert!(document.lines().all(|l| l.len() <= 76), "every line fits 75 octets + CR");
    assert!(document.contains("PRODID:-//radisync//caldav//EN\r\n"));
    assert!(document.contains("DTSTAMP:19700101T000000Z\r\n"));

    let reparsed = parse_events(&document).remove(0);
    assert_eq!(reparsed.uid, event.uid);
    assert_eq!(reparsed.summary, event.summary);
    assert_eq!(reparsed.description, event.description);
    assert_eq!(reparsed.location, event.location);
    assert_eq!(reparsed.rrule, event.rrule);
    assert_eq!(reparsed.timezone, None);
    assert_eq!(reparsed.dtstart, event.start().unwrap());
    assert!(matches!(reparsed.dtstart, DateValue::Utc(_)));
}
