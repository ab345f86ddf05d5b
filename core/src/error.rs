// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use radisync_caldav::CalDavError;
use radisync_google::GoogleError;
use radisync_ical::IcalError;

/// Errors that abort a sync pass.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SyncError {
    /// The `CalDAV` side failed.
    #[error(transparent)]
    CalDav(#[from] CalDavError),

    /// The Google Calendar side failed.
    #[error(transparent)]
    Google(#[from] GoogleError),

    /// An event could not be translated.
    #[error(transparent)]
    Ical(#[from] IcalError),

    /// No Google credential has been stored.
    #[error("No Google OAuth token found")]
    MissingCredential,

    /// No target calendar has been stored.
    #[error("No Google Calendar ID found")]
    MissingCalendarId,

    /// The stored credential cannot be used.
    #[error("Invalid Google OAuth token: {0}")]
    InvalidCredential(String),

    /// The checkpoint store failed to read or write.
    #[error("Checkpoint store error: {0}")]
    Checkpoint(String),
}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::Checkpoint(err.to_string())
    }
}
