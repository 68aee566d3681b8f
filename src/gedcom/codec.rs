//! Line codec: grammar parse and format for a single physical line
//!
//! Every GEDCOM line has the shape `LEVEL [POINTER ]TAG[ VALUE]`:
//!
//! ```text
//! 0 @I1@ INDI
//! 1 NAME John /Smith/
//! 2 GIVN John
//! ```
//!
//! The value is everything after the single space following the tag, kept
//! verbatim. Formatting is the exact inverse of parsing for every line the
//! formatter can produce.

use super::error::{GedcomError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<level>[0-9]+) (?:(?P<id>@[A-Za-z0-9]+@) )?(?P<tag>[_A-Z0-9]+)(?: (?P<value>.*))?$")
        .unwrap()
});

static POINTER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^@[A-Za-z0-9]+@$").unwrap());

static TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[_A-Z0-9]+$").unwrap());

/// One parsed line, owning its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub level: usize,
    pub id: Option<String>,
    pub tag: String,
    pub value: Option<String>,
}

impl Line {
    pub fn as_line_ref(&self) -> LineRef<'_> {
        LineRef {
            level: self.level,
            id: self.id.as_deref(),
            tag: &self.tag,
            value: self.value.as_deref(),
        }
    }
}

/// Borrowed view of a line, used for formatting elements without cloning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRef<'a> {
    pub level: usize,
    pub id: Option<&'a str>,
    pub tag: &'a str,
    pub value: Option<&'a str>,
}

impl fmt::Display for LineRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.level)?;
        if let Some(id) = self.id {
            write!(f, " {id}")?;
        }
        write!(f, " {}", self.tag)?;
        match self.value {
            Some(value) if !value.is_empty() => write!(f, " {value}"),
            _ => Ok(()),
        }
    }
}

/// Parse one physical line.
///
/// A single trailing `\n` (and a `\r` right before it) is stripped; the value
/// is otherwise taken verbatim. `line_number` is only used for error context.
pub fn parse_line(raw: &str, line_number: usize) -> Result<Line> {
    let text = strip_newline(raw);
    let malformed = || GedcomError::MalformedLine {
        line_number,
        line: text.to_string(),
    };

    let caps = LINE_REGEX.captures(text).ok_or_else(malformed)?;
    let level = caps["level"].parse::<usize>().map_err(|_| malformed())?;

    Ok(Line {
        level,
        id: caps.name("id").map(|m| m.as_str().to_string()),
        tag: caps["tag"].to_string(),
        value: caps.name("value").map(|m| m.as_str().to_string()),
    })
}

/// Format one line: `{level}{ id} {tag}{ value}`, omitting an empty value
pub fn format_line(line: &LineRef<'_>) -> String {
    line.to_string()
}

/// Whether `candidate` is a well-formed pointer token such as `@I1@`
pub fn is_pointer(candidate: &str) -> bool {
    POINTER_REGEX.is_match(candidate)
}

/// Whether `candidate` can stand as the tag of a line
pub fn is_tag(candidate: &str) -> bool {
    TAG_REGEX.is_match(candidate)
}

/// Whether `candidate` fits on one line as a value
pub fn is_value(candidate: &str) -> bool {
    !candidate.contains(['\n', '\r'])
}

fn strip_newline(raw: &str) -> &str {
    match raw.strip_suffix('\n') {
        Some(rest) => rest.strip_suffix('\r').unwrap_or(rest),
        None => raw,
    }
}
