// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Per-item, best-effort writes of a change set into a target store.
//!
//! Items are processed strictly in order; item N+1 starts only after the
//! outcome of item N is recorded. A failing item never aborts its batch: the
//! failure is rendered into the result's `errors` list as
//! `Failed to <verb> event <uid>: <cause>`.

use std::fmt::Display;

use async_trait::async_trait;

use crate::report::{CreateResult, DeleteResult, UpsertResult};

/// A calendar store that events are written into.
#[async_trait]
pub trait SyncTarget: Send + Sync {
    /// Event shape accepted by the store.
    type Item: Sync;

    /// What a lookup yields for an existing event, passed back on update.
    type Found: Send;

    /// Per-item failure.
    type Error: Display + Send;

    /// Cross-store identifier of `item`.
    fn uid<'a>(&self, item: &'a Self::Item) -> Option<&'a str>;

    /// Finds the event with cross-store identifier `uid`.
    async fn lookup(&self, uid: &str) -> Result<Option<Self::Found>, Self::Error>;

    /// Creates `item` as a new event.
    async fn create(&self, uid: &str, item: &Self::Item) -> Result<(), Self::Error>;

    /// Replaces the existing event `found` with `item`.
    async fn update(&self, found: Self::Found, item: &Self::Item) -> Result<(), Self::Error>;

    /// Removes the event `uid`. An absent event counts as removed.
    async fn delete(&self, uid: &str) -> Result<(), Self::Error>;
}

/// Creates every item without looking for an existing counterpart.
pub async fn create_all<T: SyncTarget>(target: &T, items: &[T::Item]) -> CreateResult {
    let mut result = CreateResult::default();
    for item in items {
        let Some(uid) = target.uid(item) else {
            tracing::warn!("skipping event without identifier");
            continue;
        };

        match target.create(uid, item).await {
            Ok(()) => {
                tracing::debug!(uid, "created event");
                result.created += 1;
            }
            Err(e) => record(&mut result.errors, "create", uid, e),
        }
    }

    tracing::info!(
        created = result.created,
        errors = result.errors.len(),
        "create complete"
    );
    result
}

/// Updates every item that already exists in the target and creates the rest.
///
/// A failed lookup is recorded as the item's error and neither write is
/// attempted for it.
pub async fn upsert_all<T: SyncTarget>(target: &T, items: &[T::Item]) -> UpsertResult {
    let mut result = UpsertResult::default();
    for item in items {
        let Some(uid) = target.uid(item) else {
            tracing::warn!("skipping event without identifier");
            continue;
        };

        let found = match target.lookup(uid).await {
            Ok(found) => found,
            Err(e) => {
                record(&mut result.errors, "look up", uid, e);
                continue;
            }
        };

        match found {
            Some(found) => match target.update(found, item).await {
                Ok(()) => {
                    tracing::debug!(uid, "updated event");
                    result.updated += 1;
                }
                Err(e) => record(&mut result.errors, "update", uid, e),
            },
            None => match target.create(uid, item).await {
                Ok(()) => {
                    tracing::debug!(uid, "created event");
                    result.created += 1;
                }
                Err(e) => record(&mut result.errors, "create", uid, e),
            },
        }
    }

    tracing::info!(
        updated = result.updated,
        created = result.created,
        errors = result.errors.len(),
        "upsert complete"
    );
    result
}

/// Deletes every identifier from the target.
pub async fn delete_all<T: SyncTarget>(target: &T, uids: &[String]) -> DeleteResult {
    let mut result = DeleteResult::default();
    for uid in uids {
        match target.delete(uid).await {
            Ok(()) => {
                tracing::debug!(uid, "deleted event");
                result.deleted += 1;
            }
            Err(e) => record(&mut result.errors, "delete", uid, e),
        }
    }

    tracing::info!(
        deleted = result.deleted,
        errors = result.errors.len(),
        "delete complete"
    );
    result
}

fn record(errors: &mut Vec<String>, verb: &str, uid: &str, err: impl Display) {
    let message = format!("Failed to {verb} event {uid}: {err}");
    tracing::warn!("{message}");
    errors.push(message);
}
