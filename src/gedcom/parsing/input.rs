//! Input entry points
//!
//! All of these end up in the same [`Parser`]; they only differ in where the
//! lines come from.

use super::parser::Parser;
use crate::gedcom::document::Document;
use crate::gedcom::error::Result;
use gedcom_config::GedcomConfig;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Parse GEDCOM text held in memory
pub fn parse_str(text: &str) -> Result<Document> {
    Parser::new().parse_str(text)
}

/// Parse from any buffered reader
pub fn parse_reader<R: BufRead>(reader: R) -> Result<Document> {
    Parser::new().parse_reader(reader)
}

/// Parse the file at `path`
pub fn parse_path(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "Parsing GEDCOM file");
    let file = File::open(path)?;
    Parser::new().parse_reader(BufReader::new(file))
}

/// Parse `input` as a path if it names an existing file, else as GEDCOM text.
///
/// Only strings up to `input.max_path_len` bytes are considered as paths.
pub fn parse(input: &str) -> Result<Document> {
    parse_with_config(input, GedcomConfig::default())
}

pub fn parse_with_config(input: &str, config: GedcomConfig) -> Result<Document> {
    let parser = Parser::with_config(config.clone());
    if looks_like_path(input, &config) {
        let file = File::open(input)?;
        parser.parse_reader(BufReader::new(file))
    } else {
        parser.parse_str(input)
    }
}

fn looks_like_path(input: &str, config: &GedcomConfig) -> bool {
    input.len() <= config.input.max_path_len && Path::new(input).is_file()
}
