// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use radisync_ical::IcalError;
use reqwest::StatusCode;

/// Google Calendar client errors.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum GoogleError {
    /// The request could not be sent or its response could not be decoded.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a status the operation does not accept.
    #[error("Google Calendar API failed with {status}: {body}")]
    Status {
        /// Response status.
        status: StatusCode,
        /// Response body, as far as it could be read.
        body: String,
    },

    /// The sync token is too old to resume from (HTTP 410 on a listing).
    #[error("sync token expired")]
    SyncTokenExpired,

    /// A listing finished without a `nextSyncToken`.
    #[error("no sync token in Google Calendar response")]
    MissingSyncToken,

    /// An event field could not be converted.
    #[error("invalid {field} {value:?} in event {uid}")]
    InvalidEvent {
        /// Cross-store identifier of the event.
        uid: String,
        /// Name of the offending field.
        field: &'static str,
        /// Offending value.
        value: String,
    },

    /// Date-time normalization failed.
    #[error(transparent)]
    Ical(#[from] IcalError),

    /// The configured API base URL cannot address events.
    #[error("invalid API base URL {0:?}")]
    InvalidBaseUrl(String),
}
