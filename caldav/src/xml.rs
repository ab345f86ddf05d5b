// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! XML utilities for WebDAV/CalDAV processing.

use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::BytesStart;

use crate::error::CalDavError;

/// XML namespaces used in `CalDAV`.
pub mod ns {
    /// `WebDAV` namespace.
    pub const DAV: &str = "DAV:";

    /// `CalDAV` namespace.
    pub const CALDAV: &str = "urn:ietf:params:xml:ns:caldav";
}

/// Reads the text content of the element opened by `start`, up to and
/// including its end tag.
///
/// Entity and character references are resolved; a single CDATA section is
/// returned as is. Surrounding whitespace is trimmed.
///
/// # Errors
///
/// Returns an error if the element is not closed or contains invalid escapes.
pub fn read_element_text(reader: &mut Reader<&[u8]>, start: &BytesStart<'_>) -> Result<String, CalDavError> {
    let raw = reader.read_text(start.name())?;
    let raw = raw.trim();

    if let Some(cdata) = raw
        .strip_prefix("<![CDATA[")
        .and_then(|s| s.strip_suffix("]]>"))
    {
        return Ok(cdata.to_string());
    }

    Ok(unescape(raw)?.into_owned())
}
