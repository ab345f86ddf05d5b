// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Content-line tokenizer and component tree builder.
//!
//! # Architecture
//!
//! ```text
//! Source Text → Unfold → Content Lines → Tree Builder → Component Tree
//! ```
//!
//! Per RFC 5545, a content line has the format:
//! ```text
//! contentline = name *(";" param) ":" value CRLF
//! ```
//!
//! The scanner is deliberately forgiving. A line that does not match the
//! grammar is skipped, and a component that is never closed is discarded, so
//! callers only ever see complete blocks.

/// Component start keyword.
pub const KW_BEGIN: &str = "BEGIN";
/// Component end keyword.
pub const KW_END: &str = "END";

/// Removes line folding: a line break immediately followed by a space or tab.
///
/// Both CRLF and bare LF breaks are recognised. Unfolded breaks are kept as
/// they appear in the source.
#[must_use]
pub fn unfold(src: &str) -> String {
    let mut out = String::with_capacity(src.len());
    let mut chars = src.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' if chars.peek() == Some(&'\n') => {
                chars.next();
                if matches!(chars.peek(), Some(' ' | '\t')) {
                    chars.next();
                } else {
                    out.push_str("\r\n");
                }
            }
            '\n' => {
                if matches!(chars.peek(), Some(' ' | '\t')) {
                    chars.next();
                } else {
                    out.push('\n');
                }
            }
            c => out.push(c),
        }
    }
    out
}

/// A single scanned content line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLine {
    /// Property name, upper-cased (e.g., "DTSTART", "SUMMARY").
    pub name: String,

    /// Property parameters in source order.
    pub parameters: Vec<Parameter>,

    /// Raw property value, everything after the first unquoted colon.
    pub value: String,
}

impl ContentLine {
    /// Returns the first value of the named parameter.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .and_then(|p| p.values.first())
            .map(String::as_str)
    }
}

/// A content-line parameter (e.g., `TZID=America/New_York`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter name, upper-cased.
    pub name: String,

    /// Comma-separated values, with surrounding quotes removed.
    pub values: Vec<String>,
}

/// Scans one unfolded line. Returns `None` if the line is not a content line.
#[must_use]
pub fn parse_content_line(line: &str) -> Option<ContentLine> {
    let name_end = line.find([';', ':'])?;
    let (name, mut rest) = line.split_at(name_end);
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    let mut parameters = Vec::new();
    while let Some(after) = rest.strip_prefix(';') {
        let (parameter, remaining) = parse_parameter(after)?;
        parameters.push(parameter);
        rest = remaining;
    }

    let value = rest.strip_prefix(':')?;
    Some(ContentLine {
        name: name.to_ascii_uppercase(),
        parameters,
        value: value.to_string(),
    })
}

fn parse_parameter(src: &str) -> Option<(Parameter, &str)> {
    let eq = src.find(['=', ':', ';'])?;
    let (name, rest) = src.split_at(eq);
    let mut rest = rest.strip_prefix('=')?;
    if name.is_empty() {
        return None;
    }

    let mut values = Vec::new();
    loop {
        let (value, remaining) = if let Some(quoted) = rest.strip_prefix('"') {
            let close = quoted.find('"')?;
            let (value, tail) = quoted.split_at(close);
            (value, tail.strip_prefix('"')?)
        } else {
            let end = rest.find([',', ';', ':']).unwrap_or(rest.len());
            rest.split_at(end)
        };
        values.push(value.to_string());

        match remaining.strip_prefix(',') {
            Some(next) => rest = next,
            None => {
                let parameter = Parameter {
                    name: name.to_ascii_uppercase(),
                    values,
                };
                return Some((parameter, remaining));
            }
        }
    }
}

/// A component block delimited by `BEGIN:<name>` / `END:<name>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Component {
    /// Component name, upper-cased (e.g., "VCALENDAR", "VEVENT").
    pub name: String,

    /// Properties in original order.
    pub properties: Vec<ContentLine>,

    /// Nested child components.
    pub children: Vec<Component>,
}

impl Component {
    fn new(name: &str) -> Self {
        Self {
            name: name.trim().to_ascii_uppercase(),
            ..Default::default()
        }
    }

    /// Returns the first property with the given name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&ContentLine> {
        self.properties
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Iterates over the direct children with the given name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Component> {
        self.children
            .iter()
            .filter(move |c| c.name.eq_ignore_ascii_case(name))
    }
}

/// Unfolds the source and builds the component tree.
///
/// # Algorithm
///
/// 1. On `BEGIN:X`, push a new component onto the stack
/// 2. On a property, add it to the component on top of the stack
/// 3. On `END:X`, pop up to the matching component and attach it to its parent
///
/// Properties outside any component, `END` lines without a matching `BEGIN`,
/// and components still open at the end of input are dropped.
#[must_use]
pub fn parse_components(src: &str) -> Vec<Component> {
    let unfolded = unfold(src);
    let mut roots = Vec::new();
    let mut stack: Vec<Component> = Vec::new();

    for line in unfolded.lines() {
        let Some(line) = parse_content_line(line) else {
            continue;
        };

        if line.name == KW_BEGIN {
            stack.push(Component::new(&line.value));
        } else if line.name == KW_END {
            let name = line.value.trim();
            let Some(depth) = stack.iter().rposition(|c| c.name.eq_ignore_ascii_case(name)) else {
                continue;
            };
            // Anything opened after the matching BEGIN was never closed.
            stack.truncate(depth + 1);
            if let Some(done) = stack.pop() {
                match stack.last_mut() {
                    Some(parent) => parent.children.push(done),
                    None => roots.push(done),
                }
            }
        } else if let Some(current) = stack.last_mut() {
            current.properties.push(line);
        }
    }

    roots
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unfolds_crlf_space_and_tab() {
        let src = "DESCRIPTION:This is a lo\r\n ng description\r\n\tthat wraps\r\nUID:1\r\n";
        assert_eq!(
            unfold(src),
            "DESCRIPTION:This is a long descriptionthat wraps\r\nUID:1\r\n"
        );
    }

    #[test]
    fn unfolds_bare_lf() {
        assert_eq!(unfold("SUMMARY:Team\n  Sync\nUID:2"), "SUMMARY:Team Sync\nUID:2");
    }

    #[test]
    fn parses_name_and_value() {
        let line = parse_content_line("SUMMARY:Lunch: with friends").unwrap();
        assert_eq!(line.name, "SUMMARY");
        assert!(line.parameters.is_empty());
        assert_eq!(line.value, "Lunch: with friends");
    }

    #[test]
    fn parses_parameters() {
        let line = parse_content_line("dtstart;VALUE=DATE-TIME;TZID=Europe/Berlin:20240115T100000")
            .unwrap();
        assert_eq!(line.name, "DTSTART");
        assert_eq!(line.parameter("tzid"), Some("Europe/Berlin"));
        assert_eq!(line.parameter("VALUE"), Some("DATE-TIME"));
        assert_eq!(line.value, "20240115T100000");
    }

    #[test]
    fn parses_quoted_and_multi_valued_parameters() {
        let line =
            parse_content_line(r#"ATTENDEE;DELEGATED-TO="mailto:a@x.org","mailto:b@x.org";CN=Jo:mailto:c@x.org"#)
                .unwrap();
        assert_eq!(line.parameters.len(), 2);
        assert_eq!(
            line.parameters[0].values,
            vec!["mailto:a@x.org".to_string(), "mailto:b@x.org".to_string()]
        );
        assert_eq!(line.parameter("CN"), Some("Jo"));
        assert_eq!(line.value, "mailto:c@x.org");
    }

    #[test]
    fn rejects_lines_without_colon_or_name() {
        assert!(parse_content_line("NOT A CONTENT LINE").is_none());
        assert!(parse_content_line(":value").is_none());
        assert!(parse_content_line("X;BROKEN:value").is_none());
        assert!(parse_content_line(r#"X;P="unterminated:value"#).is_none());
    }

    #[test]
    fn builds_nested_components() {
        let src = "\
BEGIN:VCALENDAR\r
VERSION:2.0\r
BEGIN:VTIMEZONE\r
TZID:Europe/Berlin\r
BEGIN:STANDARD\r
DTSTART:19701025T030000\r
END:STANDARD\r
END:VTIMEZONE\r
BEGIN:VEVENT\r
UID:1\r
END:VEVENT\r
END:VCALENDAR\r
";
        let roots = parse_components(src);
        assert_eq!(roots.len(), 1);
        let cal = &roots[0];
        assert_eq!(cal.name, "VCALENDAR");
        assert_eq!(cal.property("VERSION").unwrap().value, "2.0");
        assert_eq!(cal.children.len(), 2);

        let tz = cal.children_named("VTIMEZONE").next().unwrap();
        assert_eq!(tz.property("TZID").unwrap().value, "Europe/Berlin");
        assert_eq!(tz.children[0].name, "STANDARD");
        // The nested DTSTART stays inside its own block.
        assert!(tz.property("DTSTART").is_none());

        let event = cal.children_named("VEVENT").next().unwrap();
        assert_eq!(event.property("UID").unwrap().value, "1");
    }

    #[test]
    fn drops_unclosed_components() {
        let src = "BEGIN:VCALENDAR\nBEGIN:VEVENT\nUID:1\nEND:VCALENDAR\n";
        let roots = parse_components(src);
        assert_eq!(roots.len(), 1);
        assert!(roots[0].children.is_empty());

        assert!(parse_components("BEGIN:VEVENT\nUID:1\n").is_empty());
    }

    #[test]
    fn ignores_stray_end_and_orphan_properties() {
        let src = "UID:orphan\nEND:VEVENT\nBEGIN:VEVENT\nUID:1\nEND:VEVENT\n";
        let roots = parse_components(src);
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].properties.len(), 1);
    }
}
