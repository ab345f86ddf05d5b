// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! The two stores as write targets.

use async_trait::async_trait;
use jiff::Timestamp;
use radisync_caldav::CalDavClient;
use radisync_google::{GoogleClient, RemoteEvent};
use radisync_ical::CalendarEvent;

use crate::error::SyncError;
use crate::reconcile::SyncTarget;

/// Google calendar receiving events read from the `CalDAV` collection.
#[derive(Debug)]
pub struct GoogleTarget<'a> {
    client: &'a GoogleClient,
}

impl<'a> GoogleTarget<'a> {
    /// Wraps a client bound to the target calendar.
    #[must_use]
    pub fn new(client: &'a GoogleClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SyncTarget for GoogleTarget<'_> {
    type Item = CalendarEvent;
    /// Google id of the existing event.
    type Found = String;
    type Error = SyncError;

    fn uid<'a>(&self, item: &'a CalendarEvent) -> Option<&'a str> {
        Some(item.uid.as_str()).filter(|uid| !uid.is_empty())
    }

    async fn lookup(&self, uid: &str) -> Result<Option<String>, SyncError> {
        let found = self.client.find_by_uid(uid).await?;
        Ok(found.and_then(|event| event.id))
    }

    async fn create(&self, _uid: &str, item: &CalendarEvent) -> Result<(), SyncError> {
        self.client.insert(&RemoteEvent::from(item)).await?;
        Ok(())
    }

    async fn update(&self, id: String, item: &CalendarEvent) -> Result<(), SyncError> {
        self.client.update(&id, &RemoteEvent::from(item)).await?;
        Ok(())
    }

    async fn delete(&self, uid: &str) -> Result<(), SyncError> {
        match self.client.find_by_uid(uid).await?.and_then(|e| e.id) {
            Some(id) => self.client.delete(&id).await?,
            None => tracing::debug!(uid, "event not found, nothing to delete"),
        }
        Ok(())
    }
}

/// `CalDAV` collection receiving events read from Google.
#[derive(Debug)]
pub struct CalDavTarget<'a> {
    client: &'a CalDavClient,
}

impl<'a> CalDavTarget<'a> {
    /// Wraps a client bound to the target collection.
    #[must_use]
    pub fn new(client: &'a CalDavClient) -> Self {
        Self { client }
    }

    async fn put(&self, uid: &str, item: &RemoteEvent) -> Result<(), SyncError> {
        let document = item.to_document(Timestamp::now())?;
        self.client.put_event(uid, document.format()).await?;
        Ok(())
    }
}

#[async_trait]
impl SyncTarget for CalDavTarget<'_> {
    type Item = RemoteEvent;
    /// Resource name of the existing event.
    type Found = String;
    type Error = SyncError;

    fn uid<'a>(&self, item: &'a RemoteEvent) -> Option<&'a str> {
        item.cross_store_id()
    }

    async fn lookup(&self, uid: &str) -> Result<Option<String>, SyncError> {
        let exists = self.client.exists(uid).await?;
        Ok(exists.then(|| uid.to_string()))
    }

    async fn create(&self, uid: &str, item: &RemoteEvent) -> Result<(), SyncError> {
        self.put(uid, item).await
    }

    async fn update(&self, uid: String, item: &RemoteEvent) -> Result<(), SyncError> {
        self.put(&uid, item).await
    }

    async fn delete(&self, uid: &str) -> Result<(), SyncError> {
        self.client.delete_event(uid).await?;
        Ok(())
    }
}
