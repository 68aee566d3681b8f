//! Error types for parsing, tree lookups and document operations
//!
//! Every fallible operation in the crate returns [`GedcomError`]. The variants
//! fall into four groups:
//!
//! - structural parse errors (`MalformedLine`, `OrphanElement`, `DuplicatePointer`),
//!   which abort the whole parse and carry the 1-based line number
//! - tree lookup errors (`MissingTag`, `AmbiguousTag`, `UnresolvedPointer`, ...)
//! - domain rule violations (`MultipleParents`, `InvalidSex`, `MalformedName`, ...)
//! - resource errors (`AlreadyExists`, `IdSpaceExhausted`, `Io`)

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GedcomError {
    /// A line does not follow `LEVEL [POINTER ]TAG[ VALUE]`
    #[error("line {line_number}: malformed line {line:?}")]
    MalformedLine { line_number: usize, line: String },

    /// A line whose level has no open parent one level up
    #[error("line {line_number}: level {level} element {tag} has no open parent at level {}", .level - 1)]
    OrphanElement {
        line_number: usize,
        level: usize,
        tag: String,
    },

    #[error("pointer {pointer} is already bound to another element{}", at_line(.line_number))]
    DuplicatePointer {
        pointer: String,
        line_number: Option<usize>,
    },

    /// A line that is not valid UTF-8
    #[error("line {line_number}: invalid UTF-8")]
    InvalidUtf8 { line_number: usize },

    /// A pointer token that does not match `@[A-Za-z0-9]+@`
    #[error("malformed pointer {0:?}")]
    MalformedPointer(String),

    #[error("malformed tag {0:?}, expected [_A-Z0-9]+")]
    MalformedTag(String),

    /// A value that would not fit on a single line
    #[error("value {0:?} contains a line break")]
    MalformedValue(String),

    #[error("node {0} does not belong to this document")]
    UnknownNode(usize),

    #[error("kind for tag {declared} cannot be registered under tag {requested}")]
    TagMismatch { declared: String, requested: String },

    #[error("{parent} has no {tag} child")]
    MissingTag { parent: String, tag: String },

    #[error("{parent} has {count} {tag} children where exactly one was expected")]
    AmbiguousTag {
        parent: String,
        tag: String,
        count: usize,
    },

    /// The element whose subtree is being re-levelled has no level of its own
    #[error("{tag} has no level to propagate")]
    InvalidLevel { tag: String },

    #[error("pointer {0} does not resolve to any element")]
    UnresolvedPointer(String),

    #[error("pointer {pointer} resolves to {found}, expected {expected}")]
    KindMismatch {
        pointer: String,
        expected: String,
        found: String,
    },

    #[error("{parent} may not contain a {tag} child")]
    UnexpectedTag { parent: String, tag: String },

    /// Every NAME of an individual carries a TYPE, so none is preferred
    #[error("no preferred name among {count} typed names")]
    AmbiguousName { count: usize },

    #[error("name {0:?} does not split into given and family parts")]
    MalformedName(String),

    #[error("{count} parents recorded with sex {sex}")]
    MultipleParents { sex: char, count: usize },

    #[error("invalid sex {0:?}, expected M or F")]
    InvalidSex(String),

    /// Only individuals and families receive a level and pointer when added as roots
    #[error("{0} cannot be added as a fresh root record")]
    UnsupportedRootType(String),

    #[error("{tag} is already attached to the tree")]
    AlreadyAttached { tag: String },

    #[error("attaching {tag} would make it its own ancestor")]
    CyclicAttachment { tag: String },

    #[error("no free pointer with prefix {prefix} after {attempts} attempts")]
    IdSpaceExhausted { prefix: String, attempts: u64 },

    #[error("refusing to overwrite existing file {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for gedcom operations
pub type Result<T> = std::result::Result<T, GedcomError>;

fn at_line(line_number: &Option<usize>) -> String {
    match line_number {
        Some(n) => format!(" (line {n})"),
        None => String::new(),
    }
}

impl GedcomError {
    /// The 1-based source line this error points at, for parse errors
    pub fn line_number(&self) -> Option<usize> {
        match self {
            GedcomError::MalformedLine { line_number, .. }
            | GedcomError::OrphanElement { line_number, .. }
            | GedcomError::InvalidUtf8 { line_number } => Some(*line_number),
            GedcomError::DuplicatePointer { line_number, .. } => *line_number,
            _ => None,
        }
    }
}

/// Format source context around an error line
///
/// Shows 2 lines before the error, the error line with a >> marker, and 2 lines after.
/// `line_number` is 1-based, as carried by parse errors.
pub fn format_source_context(source: &str, line_number: usize) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let error_line = line_number.saturating_sub(1);

    let start_line = error_line.saturating_sub(2);
    let end_line = (error_line + 3).min(lines.len());

    let mut context = String::new();

    for (index, line) in lines.iter().enumerate().take(end_line).skip(start_line) {
        let marker = if index == error_line { ">>" } else { "  " };
        context.push_str(&format!("{} {:3} | {}\n", marker, index + 1, line));
    }

    context
}
