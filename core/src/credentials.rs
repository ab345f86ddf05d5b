// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::checkpoint::{CheckpointStore, keys};
use crate::error::SyncError;

/// Google OAuth credential as stored under
/// [`GOOGLE_OAUTH_TOKEN`](keys::GOOGLE_OAUTH_TOKEN).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoogleToken {
    /// Bearer token for the Calendar API.
    pub access_token: String,

    /// Token used to obtain a new access token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Lifetime of the access token in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
}

impl GoogleToken {
    /// Creates a credential holding only an access token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            expires_in: None,
        }
    }
}

/// Reads the bearer token for Google requests.
///
/// # Errors
///
/// Returns [`SyncError::MissingCredential`] if no credential is stored and
/// [`SyncError::InvalidCredential`] if it cannot be decoded.
pub async fn access_token(store: &dyn CheckpointStore) -> Result<String, SyncError> {
    let raw = store
        .get(keys::GOOGLE_OAUTH_TOKEN)
        .await?
        .ok_or(SyncError::MissingCredential)?;
    let token: GoogleToken =
        serde_json::from_str(&raw).map_err(|e| SyncError::InvalidCredential(e.to_string()))?;
    if token.access_token.is_empty() {
        return Err(SyncError::InvalidCredential("empty access token".to_string()));
    }
    Ok(token.access_token)
}

/// Reads the identifier of the target Google calendar.
///
/// # Errors
///
/// Returns [`SyncError::MissingCalendarId`] if none is stored.
pub async fn calendar_id(store: &dyn CheckpointStore) -> Result<String, SyncError> {
    store
        .get(keys::GOOGLE_CALENDAR_ID)
        .await?
        .filter(|id| !id.is_empty())
        .ok_or(SyncError::MissingCalendarId)
}

/// Stores the Google credential and target calendar.
///
/// # Errors
///
/// Returns an error if the store fails.
pub async fn connect(
    store: &dyn CheckpointStore,
    token: &GoogleToken,
    calendar_id: &str,
) -> Result<(), SyncError> {
    let raw = serde_json::to_string(token).map_err(|e| SyncError::Checkpoint(e.to_string()))?;
    store.put(keys::GOOGLE_OAUTH_TOKEN, &raw).await?;
    store.put(keys::GOOGLE_CALENDAR_ID, calendar_id).await?;
    tracing::info!(calendar_id, "connected Google calendar");
    Ok(())
}
