// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

/// Calendar resource href (path).
///
/// A `Href` represents the path to a calendar resource on a `CalDAV` server,
/// such as `/calendars/user/event1.ics`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Href(String);

impl Href {
    /// Creates a new `Href` from a string.
    #[must_use]
    pub const fn new(href: String) -> Self {
        Self(href)
    }

    /// Returns the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of a calendar object resource: the percent-decoded last path
    /// segment without its `.ics` extension.
    ///
    /// Returns `None` for collections and other non-`.ics` resources.
    #[must_use]
    pub fn resource_name(&self) -> Option<String> {
        let segment = self.0.trim_end().rsplit('/').next()?;
        let name = segment.strip_suffix(".ics")?;
        if name.is_empty() {
            return None;
        }

        let decoded = urlencoding::decode_binary(name.as_bytes());
        Some(String::from_utf8_lossy(&decoded).into_owned())
    }
}

impl fmt::Display for Href {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Entity tag for change detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ETag(String);

impl ETag {
    /// Creates a new `ETag` from a string.
    #[must_use]
    pub const fn new(etag: String) -> Self {
        Self(etag)
    }

    /// Returns the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_name_strips_path_and_extension() {
        let href = Href::new("/alice/calendar/4c1f-99.ics".to_string());
        assert_eq!(href.resource_name().as_deref(), Some("4c1f-99"));
    }

    #[test]
    fn resource_name_decodes_percent_escapes() {
        let href = Href::new("/alice/calendar/evt%40example.com.ics".to_string());
        assert_eq!(href.resource_name().as_deref(), Some("evt@example.com"));

        let broken = Href::new("/c/100%zz.ics".to_string());
        assert_eq!(broken.resource_name().as_deref(), Some("100%zz"));
    }

    #[test]
    fn resource_name_ignores_collections() {
        assert_eq!(Href::new("/alice/calendar/".to_string()).resource_name(), None);
        assert_eq!(Href::new("/alice/calendar/notes.txt".to_string()).resource_name(), None);
        assert_eq!(Href::new("/alice/calendar/.ics".to_string()).resource_name(), None);
    }
}
