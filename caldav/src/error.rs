// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use reqwest::StatusCode;

/// `CalDAV` client errors.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum CalDavError {
    /// The request could not be sent or its response could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a status the operation does not accept.
    #[error("CalDAV request failed with {status}: {body}")]
    Status {
        /// Response status.
        status: StatusCode,
        /// Response body, as far as it could be read.
        body: String,
    },

    /// XML parsing/writing error.
    #[error("XML error: {0}")]
    Xml(String),

    /// A sync-collection response without a `sync-token`.
    #[error("sync-collection response carries no sync-token")]
    MissingSyncToken,

    /// Invalid request or response content.
    #[error("Invalid server response: {0}")]
    InvalidResponse(String),
}

impl From<quick_xml::Error> for CalDavError {
    fn from(e: quick_xml::Error) -> Self {
        Self::Xml(e.to_string())
    }
}

impl From<quick_xml::escape::EscapeError> for CalDavError {
    fn from(e: quick_xml::escape::EscapeError) -> Self {
        Self::Xml(e.to_string())
    }
}

impl From<std::io::Error> for CalDavError {
    fn from(e: std::io::Error) -> Self {
        Self::Xml(format!("IO error: {e}"))
    }
}
