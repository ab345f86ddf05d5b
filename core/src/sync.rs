// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use radisync_caldav::{CalDavClient, CalDavError};
use radisync_google::{GoogleClient, GoogleConfig, GoogleError};
use radisync_ical::SyncResult;

use crate::checkpoint::{CheckpointStore, keys};
use crate::credentials;
use crate::error::SyncError;
use crate::reconcile::{self, SyncTarget};
use crate::report::{CreateResult, DeleteResult, PassReport, UpsertResult};
use crate::targets::{CalDavTarget, GoogleTarget};

/// Fetch attempts per pass: the incremental one and a single baseline retry.
pub const MAX_FETCH_ATTEMPTS: u32 = 2;

/// Direction of a sync pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Read the `CalDAV` collection, write Google.
    CalDavToGoogle,
    /// Read Google, write the `CalDAV` collection.
    GoogleToCalDav,
}

impl Direction {
    /// Both directions in the order a scheduled run uses.
    pub const ALL: [Direction; 2] = [Direction::CalDavToGoogle, Direction::GoogleToCalDav];

    /// Short name of the direction.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::CalDavToGoogle => "caldav-to-google",
            Direction::GoogleToCalDav => "google-to-caldav",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of running both directions back to back.
#[derive(Debug)]
pub struct PairReport {
    /// The `CalDAV` to Google pass.
    pub caldav_to_google: Result<PassReport, SyncError>,
    /// The Google to `CalDAV` pass.
    pub google_to_caldav: Result<PassReport, SyncError>,
}

/// Drives sync passes between one `CalDAV` collection and one Google calendar.
///
/// The engine keeps no calendar state: every pass fetches a change set since
/// the stored checkpoint, writes it into the other store and advances the
/// checkpoint only if every item succeeded. Passes of the same direction must
/// not run concurrently.
pub struct SyncEngine {
    caldav: CalDavClient,
    google: GoogleConfig,
    store: Arc<dyn CheckpointStore>,
}

impl fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncEngine")
            .field("caldav", &self.caldav)
            .field("google", &self.google)
            .finish_non_exhaustive()
    }
}

impl SyncEngine {
    /// Creates an engine over the given stores.
    pub fn new(caldav: CalDavClient, google: GoogleConfig, store: Arc<dyn CheckpointStore>) -> Self {
        Self {
            caldav,
            google,
            store,
        }
    }

    /// The checkpoint store.
    #[must_use]
    pub fn store(&self) -> &dyn CheckpointStore {
        self.store.as_ref()
    }

    /// Runs one pass in the given direction.
    ///
    /// # Errors
    ///
    /// Returns an error if a precondition is missing or the fetch fails.
    /// Per-item failures are reported in the returned [`PassReport`].
    pub async fn run(&self, direction: Direction) -> Result<PassReport, SyncError> {
        match direction {
            Direction::CalDavToGoogle => self.caldav_to_google().await,
            Direction::GoogleToCalDav => self.google_to_caldav().await,
        }
    }

    /// Runs both directions if a Google calendar is connected.
    ///
    /// Returns `None` without touching either store when the credential or
    /// the calendar id is missing. The second pass runs even if the first
    /// one fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the checkpoint store cannot be read.
    pub async fn run_pair(&self) -> Result<Option<PairReport>, SyncError> {
        let token = self.store.get(keys::GOOGLE_OAUTH_TOKEN).await?;
        let calendar_id = self.store.get(keys::GOOGLE_CALENDAR_ID).await?;
        if token.is_none() || calendar_id.is_none() {
            tracing::error!(
                "missing {} or {}, skipping sync",
                keys::GOOGLE_OAUTH_TOKEN,
                keys::GOOGLE_CALENDAR_ID
            );
            return Ok(None);
        }

        Ok(Some(PairReport {
            caldav_to_google: self.caldav_to_google().await,
            google_to_caldav: self.google_to_caldav().await,
        }))
    }

    /// Copies changes of the `CalDAV` collection into Google.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be fetched, no Google
    /// calendar is connected or the checkpoint store fails.
    #[tracing::instrument(skip_all)]
    pub async fn caldav_to_google(&self) -> Result<PassReport, SyncError> {
        let changes = self.fetch_caldav_changes().await?;
        tracing::info!(
            events = changes.events.len(),
            deleted = changes.deleted.len(),
            "fetched CalDAV changes"
        );

        let google = self.google_client().await?;
        let target = GoogleTarget::new(&google);
        let report = apply(&target, changes).await;
        self.finish(keys::RADICALE_SYNC_TOKEN, report).await
    }

    /// Copies changes of the Google calendar into the `CalDAV` collection.
    ///
    /// # Errors
    ///
    /// Returns an error if no Google calendar is connected, the calendar
    /// cannot be fetched or the checkpoint store fails.
    #[tracing::instrument(skip_all)]
    pub async fn google_to_caldav(&self) -> Result<PassReport, SyncError> {
        let client = self.google_client().await?;
        let google = &client;
        let changes = fetch_with_recovery(
            self.store.as_ref(),
            keys::GOOGLE_SYNC_TOKEN,
            |e: &GoogleError| matches!(e, GoogleError::SyncTokenExpired),
            |token| async move { google.fetch_changes(token.as_deref()).await },
        )
        .await?;
        tracing::info!(
            events = changes.events.len(),
            deleted = changes.deleted.len(),
            "fetched Google changes"
        );

        let target = CalDavTarget::new(&self.caldav);
        let report = apply(&target, changes).await;
        self.finish(keys::GOOGLE_SYNC_TOKEN, report).await
    }

    /// Creates every event of the `CalDAV` collection in Google, without
    /// reading or advancing any checkpoint.
    ///
    /// Meant for seeding an empty calendar: existing counterparts are not
    /// looked up.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be fetched or no Google
    /// calendar is connected.
    #[tracing::instrument(skip_all)]
    pub async fn import(&self) -> Result<CreateResult, SyncError> {
        let google = self.google_client().await?;
        let changes = self.caldav.sync_collection(None).await?;
        tracing::info!(events = changes.events.len(), "importing CalDAV events");

        let target = GoogleTarget::new(&google);
        Ok(reconcile::create_all(&target, &changes.events).await)
    }

    async fn fetch_caldav_changes(&self) -> Result<SyncResult, SyncError> {
        let caldav = &self.caldav;
        fetch_with_recovery(
            self.store.as_ref(),
            keys::RADICALE_SYNC_TOKEN,
            is_invalid_sync_token,
            |token| async move { caldav.sync_collection(token.as_deref()).await },
        )
        .await
    }

    async fn google_client(&self) -> Result<GoogleClient, SyncError> {
        let store = self.store.as_ref();
        let access_token = credentials::access_token(store).await?;
        let calendar_id = credentials::calendar_id(store).await?;
        Ok(GoogleClient::new(self.google.clone(), access_token, calendar_id)?)
    }

    async fn finish(&self, key: &str, mut report: PassReport) -> Result<PassReport, SyncError> {
        if report.is_clean() {
            self.store.put(key, &report.sync_token).await?;
            report.checkpoint_saved = true;
            tracing::info!(%report, "pass complete, checkpoint advanced");
        } else {
            tracing::warn!(%report, "pass had errors, checkpoint kept");
        }
        Ok(report)
    }
}

/// Deletes, then upserts, a change set into `target`.
async fn apply<T: SyncTarget>(target: &T, changes: SyncResult<T::Item>) -> PassReport {
    let deleted = match changes.deleted.is_empty() {
        true => DeleteResult::default(),
        false => reconcile::delete_all(target, &changes.deleted).await,
    };
    let upserted = match changes.events.is_empty() {
        true => UpsertResult::default(),
        false => reconcile::upsert_all(target, &changes.events).await,
    };

    PassReport {
        sync_token: changes.sync_token,
        deleted,
        upserted,
        checkpoint_saved: false,
    }
}

/// Fetches changes since the checkpoint stored under `key`.
///
/// When the store rejects the checkpoint as expired, the checkpoint is
/// removed and the fetch is repeated once as a full baseline. Attempts are
/// capped at [`MAX_FETCH_ATTEMPTS`]; an expiry on the baseline itself is
/// returned as is.
pub async fn fetch_with_recovery<T, E, F, Fut>(
    store: &dyn CheckpointStore,
    key: &str,
    is_expired: impl Fn(&E) -> bool,
    fetch: F,
) -> Result<SyncResult<T>, SyncError>
where
    F: Fn(Option<String>) -> Fut,
    Fut: Future<Output = Result<SyncResult<T>, E>>,
    SyncError: From<E>,
{
    let mut token = store.get(key).await?;
    tracing::debug!(key, present = token.is_some(), "read checkpoint");

    let mut attempt = 1;
    loop {
        match fetch(token.clone()).await {
            Err(e) if token.is_some() && attempt < MAX_FETCH_ATTEMPTS && is_expired(&e) => {
                tracing::warn!(key, attempt, "checkpoint expired, retrying with a full sync");
                store.delete(key).await?;
                token = None;
                attempt += 1;
            }
            result => return result.map_err(SyncError::from),
        }
    }
}

/// Whether a `sync-collection` report was refused for its token
/// (RFC 6578 `DAV:valid-sync-token` precondition).
fn is_invalid_sync_token(err: &CalDavError) -> bool {
    match err {
        CalDavError::Status { status, body } => {
            (status.as_u16() == 403 || status.as_u16() == 409) && body.contains("valid-sync-token")
        }
        _ => false,
    }
}
