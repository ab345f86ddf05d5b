// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// Status Google reports for removed events.
pub const STATUS_CANCELLED: &str = "cancelled";

/// An event resource of the Google Calendar API, reduced to the fields that
/// are synchronized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteEvent {
    /// Identifier assigned by Google.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Title of the event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Start; absent on cancelled events of an incremental listing.
    #[serde(default)]
    pub start: EventDateTime,

    /// End; absent on cancelled events of an incremental listing.
    #[serde(default)]
    pub end: EventDateTime,

    /// Free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Free-text location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// `confirmed`, `tentative` or `cancelled`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// iCalendar UID, shared with the `CalDAV` side.
    #[serde(rename = "iCalUID", default, skip_serializing_if = "Option::is_none")]
    pub ical_uid: Option<String>,

    /// Google id of the series when this is a single occurrence of a
    /// recurring event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_event_id: Option<String>,

    /// `RRULE`, `EXRULE`, `RDATE` and `EXDATE` lines.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recurrence: Vec<String>,
}

impl RemoteEvent {
    /// Identifier used to find the same event in the other store: the
    /// iCalendar UID, or Google's own id when there is none.
    #[must_use]
    pub fn cross_store_id(&self) -> Option<&str> {
        self.ical_uid
            .as_deref()
            .or(self.id.as_deref())
            .filter(|id| !id.is_empty())
    }

    /// Whether this changes one occurrence of a recurring series rather than
    /// the series itself.
    #[must_use]
    pub fn is_instance(&self) -> bool {
        self.recurring_event_id.is_some()
    }

    /// Whether the event was removed.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.status.as_deref() == Some(STATUS_CANCELLED)
    }
}

/// Start or end of an event: `date` for all-day events, `dateTime`
/// otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    /// `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// RFC 3339 date-time; the offset may be omitted when `time_zone` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,

    /// IANA zone name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

/// One page of an events listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EventsPage {
    #[serde(default)]
    pub items: Vec<RemoteEvent>,
    pub next_page_token: Option<String>,
    pub next_sync_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_api_resource() {
        let event: RemoteEvent = serde_json::from_str(
            r#"{
                "kind": "calendar#event",
                "id": "abc123",
                "status": "confirmed",
                "summary": "Standup",
                "start": {"dateTime": "2024-01-15T09:00:00-05:00", "timeZone": "America/New_York"},
                "end": {"dateTime": "2024-01-15T09:15:00-05:00", "timeZone": "America/New_York"},
                "recurrence": ["RRULE:FREQ=DAILY"],
                "iCalUID": "standup@google.com"
            }"#,
        )
        .unwrap();

        assert_eq!(event.id.as_deref(), Some("abc123"));
        assert_eq!(event.ical_uid.as_deref(), Some("standup@google.com"));
        assert_eq!(event.start.time_zone.as_deref(), Some("America/New_York"));
        assert_eq!(event.recurrence, vec!["RRULE:FREQ=DAILY".to_string()]);
        assert_eq!(event.cross_store_id(), Some("standup@google.com"));
        assert!(!event.is_cancelled());
    }

    #[test]
    fn cancelled_event_without_times() {
        let event: RemoteEvent =
            serde_json::from_str(r#"{"id": "gone1", "status": "cancelled"}"#).unwrap();
        assert!(event.is_cancelled());
        assert_eq!(event.cross_store_id(), Some("gone1"));
        assert_eq!(event.start, EventDateTime::default());
    }

    #[test]
    fn serializes_without_empty_fields() {
        let event = RemoteEvent {
            summary: Some("Lunch".to_string()),
            start: EventDateTime {
                date: Some("2024-01-15".to_string()),
                ..Default::default()
            },
            ical_uid: Some("u1".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "summary": "Lunch",
                "start": {"date": "2024-01-15"},
                "end": {},
                "iCalUID": "u1"
            })
        );
    }
}
