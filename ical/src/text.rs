// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Escaping for `TEXT` property values (RFC 5545 section 3.3.11).

/// Escapes a text value so it fits on one content line.
///
/// Line breaks (CRLF, CR or LF) all become `\n`.
#[must_use]
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str("\\n");
            }
            c => out.push(c),
        }
    }
    out
}

/// Reverses [`escape`]. Unknown escape sequences are kept verbatim.
#[must_use]
pub fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        match chars.next() {
            Some('n' | 'N') => out.push('\n'),
            Some(c @ ('\\' | ';' | ',')) => out.push(c),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_special_characters() {
        assert_eq!(escape("a;b,c\\d"), "a\\;b\\,c\\\\d");
        assert_eq!(escape("line1\nline2\r\nline3"), "line1\\nline2\\nline3");
    }

    #[test]
    fn unescapes_special_characters() {
        assert_eq!(unescape("a\\;b\\,c\\\\d"), "a;b,c\\d");
        assert_eq!(unescape("one\\ntwo\\Nthree"), "one\ntwo\nthree");
    }

    #[test]
    fn keeps_unknown_and_trailing_backslashes() {
        assert_eq!(unescape("C:\\temp"), "C:\\temp");
        assert_eq!(unescape("end\\"), "end\\");
    }

    #[test]
    fn escape_is_reversible() {
        let raw = "Agenda:\n1. budget, plan; review\n2. C:\\share";
        assert_eq!(unescape(&escape(raw)), raw);
    }
}
