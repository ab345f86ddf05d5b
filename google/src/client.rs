// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Google Calendar events client.

use radisync_ical::SyncResult;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};

use crate::config::GoogleConfig;
use crate::error::GoogleError;
use crate::types::{EventsPage, RemoteEvent};

/// Client for the events of one Google calendar, authorized by a bearer
/// token.
#[derive(Debug, Clone)]
pub struct GoogleClient {
    client: Client,
    config: GoogleConfig,
    access_token: String,
    calendar_id: String,
}

impl GoogleClient {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if HTTP client initialization fails.
    pub fn new(
        config: GoogleConfig,
        access_token: impl Into<String>,
        calendar_id: impl Into<String>,
    ) -> Result<Self, GoogleError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self {
            client,
            config,
            access_token: access_token.into(),
            calendar_id: calendar_id.into(),
        })
    }

    /// Lists the events changed since `sync_token`, or every event when no
    /// token is given, following pagination to the end.
    ///
    /// The token goes on the first page only; later pages are requested by
    /// their page token. Cancelled events are reported in `deleted` by their
    /// cross-store identifier. Changes to single occurrences of a recurring
    /// series are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`GoogleError::SyncTokenExpired`] on HTTP 410,
    /// [`GoogleError::MissingSyncToken`] if no page carries a next sync token,
    /// and any other failure as is. No retry happens here.
    #[tracing::instrument(skip_all, fields(baseline = sync_token.is_none()))]
    pub async fn fetch_changes(
        &self,
        sync_token: Option<&str>,
    ) -> Result<SyncResult<RemoteEvent>, GoogleError> {
        let url = self.events_url(&[])?;
        let mut events = Vec::new();
        let mut deleted = Vec::new();
        let mut next_sync_token = None;
        let mut page_token: Option<String> = None;
        let mut pages = 0_usize;
        let mut instances = 0_usize;

        loop {
            let mut query: Vec<(&str, String)> = Vec::new();
            match (&page_token, sync_token) {
                (Some(page), _) => query.push(("pageToken", page.clone())),
                (None, Some(token)) => query.push(("syncToken", token.to_string())),
                (None, None) => {}
            }
            if sync_token.is_none() {
                query.push(("maxResults", self.config.max_results.to_string()));
            }

            let resp = self
                .request(Method::GET, url.clone())
                .query(&query)
                .send()
                .await?;
            if resp.status() == StatusCode::GONE {
                return Err(GoogleError::SyncTokenExpired);
            }
            let page: EventsPage = Self::check(resp).await?.json().await?;
            pages += 1;

            for event in page.items {
                // Occurrences carry the iCalUID of their series.
                if event.is_instance() {
                    instances += 1;
                    continue;
                }

                if event.is_cancelled() {
                    match event.cross_store_id() {
                        Some(uid) => deleted.push(uid.to_string()),
                        None => tracing::warn!("cancelled event without identifier"),
                    }
                } else {
                    events.push(event);
                }
            }

            if page.next_sync_token.is_some() {
                next_sync_token = page.next_sync_token;
            }
            page_token = page.next_page_token;
            if page_token.is_none() {
                break;
            }
        }

        let sync_token = next_sync_token.ok_or(GoogleError::MissingSyncToken)?;
        tracing::debug!(
            pages,
            instances,
            events = events.len(),
            deleted = deleted.len(),
            "fetched calendar changes"
        );
        Ok(SyncResult {
            events,
            deleted,
            sync_token,
        })
    }

    /// Finds the event with the given iCalendar UID.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup request fails.
    pub async fn find_by_uid(&self, uid: &str) -> Result<Option<RemoteEvent>, GoogleError> {
        let url = self.events_url(&[])?;
        let resp = self
            .request(Method::GET, url)
            .query(&[("iCalUID", uid)])
            .send()
            .await?;
        let page: EventsPage = Self::check(resp).await?.json().await?;
        Ok(page.items.into_iter().next())
    }

    /// Creates an event.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rejected.
    pub async fn insert(&self, event: &RemoteEvent) -> Result<RemoteEvent, GoogleError> {
        let url = self.events_url(&[])?;
        let resp = self.request(Method::POST, url).json(event).send().await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    /// Replaces the event with Google id `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rejected.
    pub async fn update(&self, id: &str, event: &RemoteEvent) -> Result<RemoteEvent, GoogleError> {
        let url = self.events_url(&[id])?;
        let resp = self.request(Method::PUT, url).json(event).send().await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    /// Deletes the event with Google id `id`. An event that is already gone
    /// counts as deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rejected with a status
    /// other than 404 or 410.
    pub async fn delete(&self, id: &str) -> Result<(), GoogleError> {
        let url = self.events_url(&[id])?;
        let resp = self.request(Method::DELETE, url).send().await?;
        match resp.status() {
            StatusCode::NOT_FOUND | StatusCode::GONE => {
                tracing::debug!(id, "event already absent");
                Ok(())
            }
            _ => Self::check(resp).await.map(|_| ()),
        }
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(&self.access_token)
    }

    /// `<api_base>/calendars/<calendar_id>/events[/<segments>]`, each segment
    /// percent-encoded.
    fn events_url(&self, segments: &[&str]) -> Result<Url, GoogleError> {
        let invalid = || GoogleError::InvalidBaseUrl(self.config.api_base.clone());
        let mut url = Url::parse(&self.config.api_base).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|()| invalid())?
            .pop_if_empty()
            .extend(["calendars", self.calendar_id.as_str(), "events"])
            .extend(segments);
        Ok(url)
    }

    async fn check(resp: Response) -> Result<Response, GoogleError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read response".to_string());
        Err(GoogleError::Status { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(api_base: &str, calendar_id: &str) -> GoogleClient {
        let config = GoogleConfig {
            api_base: api_base.to_string(),
            ..Default::default()
        };
        GoogleClient::new(config, "token", calendar_id).unwrap()
    }

    #[test]
    fn events_url_encodes_segments() {
        let c = client("https://www.googleapis.com/calendar/v3", "team#x@group.calendar.google.com");
        assert_eq!(
            c.events_url(&[]).unwrap().as_str(),
            "https://www.googleapis.com/calendar/v3/calendars/team%23x@group.calendar.google.com/events"
        );
        assert_eq!(
            c.events_url(&["abc"]).unwrap().as_str(),
            "https://www.googleapis.com/calendar/v3/calendars/team%23x@group.calendar.google.com/events/abc"
        );
    }

    #[test]
    fn events_url_tolerates_trailing_slash() {
        let c = client("http://127.0.0.1:9000/", "primary");
        assert_eq!(
            c.events_url(&[]).unwrap().as_str(),
            "http://127.0.0.1:9000/calendars/primary/events"
        );
    }

    #[test]
    fn events_url_rejects_unusable_base() {
        let c = client("mailto:someone@example.com", "primary");
        assert!(matches!(c.events_url(&[]), Err(GoogleError::InvalidBaseUrl(_))));
    }
}
