// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! `CalDAV` client for collection synchronization.

use std::sync::Arc;

use radisync_ical::SyncResult;
use reqwest::{Method, StatusCode};

use crate::config::CalDavConfig;
use crate::error::CalDavError;
use crate::http::HttpClient;
use crate::request::SyncCollectionRequest;
use crate::response::MultiStatusResponse;

/// `CalDAV` client bound to one calendar collection.
///
/// Calendar objects are addressed by their UID: the event `abc` lives at
/// `<collection>/abc.ics`.
///
/// # Example
///
/// ```ignore
/// use radisync_caldav::{AuthMethod, CalDavClient, CalDavConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = CalDavConfig {
///     base_url: "https://radicale.example.org".to_string(),
///     calendar_path: "/alice/calendar/".to_string(),
///     auth: AuthMethod::Basic {
///         username: "alice".to_string(),
///         password: "secret".to_string(),
///     },
///     ..Default::default()
/// };
///
/// let client = CalDavClient::new(config)?;
/// let changes = client.sync_collection(None).await?;
/// println!("{} events, next token {}", changes.events.len(), changes.sync_token);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CalDavClient {
    http: Arc<HttpClient>,
    config: CalDavConfig,
}

impl CalDavClient {
    /// Creates a new `CalDAV` client.
    ///
    /// # Errors
    ///
    /// Returns an error if HTTP client initialization fails.
    pub fn new(config: CalDavConfig) -> Result<Self, CalDavError> {
        let http = HttpClient::new(config.clone())?;
        Ok(Self {
            http: Arc::new(http),
            config,
        })
    }

    /// Reports the changes of the collection since `sync_token`, or every
    /// member when no token is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the server answers with a
    /// non-success status, or the report carries no new sync token.
    #[tracing::instrument(skip_all, fields(baseline = sync_token.is_none()))]
    pub async fn sync_collection(&self, sync_token: Option<&str>) -> Result<SyncResult, CalDavError> {
        let url = self.collection_url();
        let xml_body = SyncCollectionRequest::new(sync_token).build()?;
        let report = Method::from_bytes(b"REPORT")
            .map_err(|e| CalDavError::InvalidResponse(format!("Invalid method: {e}")))?;

        let resp = self
            .http
            .execute(
                self.http
                    .build_request(report, &url)
                    .header("Content-Type", "application/xml; charset=utf-8")
                    .body(xml_body),
            )
            .await?;

        let xml = resp.text().await?;
        let changes = MultiStatusResponse::from_xml(&xml)?.into_changes()?;
        tracing::debug!(
            events = changes.events.len(),
            deleted = changes.deleted.len(),
            "fetched collection changes"
        );
        Ok(changes)
    }

    /// Checks whether the event with the given UID exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server answers with
    /// anything but success or 404.
    pub async fn exists(&self, uid: &str) -> Result<bool, CalDavError> {
        let url = self.event_url(uid);
        let resp = self
            .http
            .send(self.http.build_request(Method::HEAD, &url))
            .await?;

        match resp.status() {
            s if s.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(HttpClient::status_error(resp).await),
        }
    }

    /// Stores a calendar document as the event with the given UID, creating
    /// or replacing it.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rejected.
    pub async fn put_event(&self, uid: &str, ics: String) -> Result<(), CalDavError> {
        let url = self.event_url(uid);
        self.http
            .execute(
                self.http
                    .build_request(Method::PUT, &url)
                    .header("Content-Type", "text/calendar; charset=utf-8")
                    .body(ics),
            )
            .await?;

        Ok(())
    }

    /// Deletes the event with the given UID. An event that is already gone
    /// counts as deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server answers with
    /// anything but success or 404.
    pub async fn delete_event(&self, uid: &str) -> Result<(), CalDavError> {
        let url = self.event_url(uid);
        let resp = self
            .http
            .send(self.http.build_request(Method::DELETE, &url))
            .await?;

        match resp.status() {
            s if s.is_success() => Ok(()),
            StatusCode::NOT_FOUND => {
                tracing::debug!(uid, "event already absent");
                Ok(())
            }
            _ => Err(HttpClient::status_error(resp).await),
        }
    }

    /// URL of the synchronized collection, always with a trailing slash.
    #[must_use]
    pub fn collection_url(&self) -> String {
        let url = self.full_url(&self.config.calendar_path);
        match url.ends_with('/') {
            true => url,
            false => format!("{url}/"),
        }
    }

    /// `<collection>/<uid>.ics`, with the UID percent-encoded as one path
    /// segment.
    fn event_url(&self, uid: &str) -> String {
        format!("{}{}.ics", self.collection_url(), urlencoding::encode(uid))
    }

    /// Builds full URL from href.
    fn full_url(&self, href: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        match href.starts_with('/') {
            true => format!("{base}{href}"),
            false => format!("{base}/{href}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str, calendar_path: &str) -> CalDavClient {
        CalDavClient::new(CalDavConfig {
            base_url: base_url.to_string(),
            calendar_path: calendar_path.to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn collection_url_is_normalized() {
        assert_eq!(
            client("http://dav.test/", "/alice/cal").collection_url(),
            "http://dav.test/alice/cal/"
        );
        assert_eq!(
            client("http://dav.test", "alice/cal/").collection_url(),
            "http://dav.test/alice/cal/"
        );
    }

    #[test]
    fn event_url_appends_uid() {
        let c = client("http://dav.test", "/alice/cal/");
        assert_eq!(c.event_url("abc-1"), "http://dav.test/alice/cal/abc-1.ics");
        assert_eq!(
            c.event_url("a/b#c@d"),
            "http://dav.test/alice/cal/a%2Fb%23c%40d.ics"
        );
    }
}
