// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Response parsers for WebDAV/CalDAV operations.

use quick_xml::events::Event;
use radisync_ical::{SyncResult, parse_calendar};

use crate::error::CalDavError;
use crate::types::{ETag, Href};
use crate::xml::read_element_text;

/// `WebDAV` multistatus response.
#[derive(Debug, Clone, Default)]
pub struct MultiStatusResponse {
    /// The response items.
    pub responses: Vec<ResponseItem>,

    /// The collection's new sync token, present in sync-collection reports.
    pub sync_token: Option<String>,
}

/// Individual response in multistatus.
#[derive(Debug, Clone, Default)]
pub struct ResponseItem {
    /// Resource path.
    pub href: Href,
    /// Per-property results.
    pub prop_stats: Vec<PropStat>,
    /// Status of the resource itself, e.g. `HTTP/1.1 404 Not Found` for a
    /// member removed since the last sync.
    pub status: Option<String>,
}

/// Property stat with status and value.
#[derive(Debug, Clone, Default)]
pub struct PropStat {
    /// Property values.
    pub props: Properties,
    /// Status line for these properties.
    pub status: String,
}

/// WebDAV/CalDAV properties.
#[derive(Debug, Clone, Default)]
pub struct Properties {
    /// Entity tag.
    pub get_etag: Option<ETag>,
    /// Raw iCalendar body.
    pub calendar_data: Option<String>,
}

impl MultiStatusResponse {
    /// Parses multistatus response from XML.
    ///
    /// # Errors
    ///
    /// Returns an error if XML parsing fails.
    pub fn from_xml(xml: &str) -> Result<Self, CalDavError> {
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);
        reader.config_mut().check_end_names = true;

        let mut multistatus = Self::default();
        let mut current_response: Option<ResponseItem> = None;
        let mut current_propstat: Option<PropStat> = None;
        let mut in_prop = false;

        loop {
            match reader.read_event()? {
                Event::Eof => break,

                Event::Start(e) => match e.name().local_name().into_inner() {
                    b"response" => current_response = Some(ResponseItem::default()),
                    b"propstat" if current_response.is_some() => {
                        current_propstat = Some(PropStat::default());
                    }
                    b"prop" if current_propstat.is_some() => in_prop = true,

                    b"href" if current_propstat.is_none() => {
                        let href = read_element_text(&mut reader, &e)?;
                        if let Some(resp) = current_response.as_mut() {
                            resp.href = Href::new(href);
                        }
                    }
                    b"status" => {
                        let status = read_element_text(&mut reader, &e)?;
                        if let Some(propstat) = current_propstat.as_mut() {
                            propstat.status = status;
                        } else if let Some(resp) = current_response.as_mut() {
                            resp.status = Some(status);
                        }
                    }
                    b"sync-token" if current_response.is_none() => {
                        multistatus.sync_token = Some(read_element_text(&mut reader, &e)?);
                    }

                    b"getetag" if in_prop => {
                        let etag = read_element_text(&mut reader, &e)?;
                        if let Some(propstat) = current_propstat.as_mut() {
                            propstat.props.get_etag = Some(ETag::new(etag));
                        }
                    }
                    b"calendar-data" if in_prop => {
                        let data = read_element_text(&mut reader, &e)?;
                        if let Some(propstat) = current_propstat.as_mut() {
                            propstat.props.calendar_data = Some(data);
                        }
                    }
                    _ => {}
                },

                Event::End(e) => match e.name().local_name().into_inner() {
                    b"response" => {
                        if let Some(resp) = current_response.take() {
                            multistatus.responses.push(resp);
                        }
                    }
                    b"propstat" => {
                        if let (Some(propstat), Some(resp)) =
                            (current_propstat.take(), current_response.as_mut())
                        {
                            resp.prop_stats.push(propstat);
                        }
                    }
                    b"prop" => in_prop = false,
                    _ => {}
                },

                _ => {}
            }
        }

        Ok(multistatus)
    }

    /// Converts a sync-collection report into the change set it describes.
    ///
    /// A response whose own status is 404 names a removed member. Any other
    /// response contributes the events of its successful `calendar-data`.
    /// Incomplete events and members without a `.ics` name are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`CalDavError::MissingSyncToken`] if the report has no
    /// sync token.
    pub fn into_changes(self) -> Result<SyncResult, CalDavError> {
        let sync_token = self
            .sync_token
            .filter(|t| !t.is_empty())
            .ok_or(CalDavError::MissingSyncToken)?;

        let mut events = Vec::new();
        let mut deleted = Vec::new();
        for response in self.responses {
            if response.status.as_deref().is_some_and(|s| s.contains("404")) {
                match response.href.resource_name() {
                    Some(uid) => deleted.push(uid),
                    None => tracing::debug!(href = %response.href, "ignoring removed non-event member"),
                }
                continue;
            }

            let bodies = response
                .prop_stats
                .iter()
                .filter(|p| p.status.contains("200"))
                .filter_map(|p| p.props.calendar_data.as_deref());
            for body in bodies {
                let parsed = parse_calendar(body);
                if parsed.dropped > 0 || parsed.overrides > 0 {
                    tracing::debug!(
                        href = %response.href,
                        dropped = parsed.dropped,
                        overrides = parsed.overrides,
                        "skipped event blocks"
                    );
                }
                events.extend(parsed.events);
            }
        }

        Ok(SyncResult {
            events,
            deleted,
            sync_token,
        })
    }
}
