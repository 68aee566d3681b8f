//! Level-stack parser
//!
//! GEDCOM encodes nesting only through the level number at the start of each
//! line. The parser keeps, for every level, the element most recently opened
//! there. A line at level `n` closes every open element at level `n` or
//! deeper and becomes the last child of the element open at `n - 1`:
//!
//! ```text
//! 0 @I1@ INDI          open = {0: INDI}
//! 1 BIRT               open = {0: INDI, 1: BIRT}
//! 2 DATE 1900          open = {0: INDI, 1: BIRT, 2: DATE}
//! 1 SEX M              open = {0: INDI, 1: SEX}
//! ```
//!
//! There is no backtracking: siblings keep input order and the first
//! structural error aborts the whole parse.

use crate::gedcom::ast::{Element, NodeId};
use crate::gedcom::codec::parse_line;
use crate::gedcom::document::Document;
use crate::gedcom::error::{GedcomError, Result};
use crate::gedcom::registry::{TagRegistry, REGISTRY};
use gedcom_config::GedcomConfig;
use std::collections::BTreeMap;
use std::io::BufRead;
use std::sync::Arc;

pub struct Parser {
    document: Document,
    open_at_level: BTreeMap<usize, NodeId>,
    line_number: usize,
}

impl Parser {
    /// A parser using the default registry and configuration
    pub fn new() -> Self {
        Self::with_config(GedcomConfig::default())
    }

    pub fn with_config(config: GedcomConfig) -> Self {
        Self::with_registry(Arc::clone(&REGISTRY), config)
    }

    pub fn with_registry(registry: Arc<TagRegistry>, config: GedcomConfig) -> Self {
        Self {
            document: Document::with_registry(registry, config),
            open_at_level: BTreeMap::new(),
            line_number: 0,
        }
    }

    /// Consume one physical line. Blank lines are skipped but still counted.
    pub fn feed_line(&mut self, raw: &str) -> Result<()> {
        self.line_number += 1;
        if raw.trim().is_empty() {
            return Ok(());
        }

        let line_number = self.line_number;
        let line = parse_line(raw, line_number)?;
        let level = line.level;

        // validate before mutating anything
        let parent = if level == 0 {
            None
        } else {
            let parent = self.open_at_level.get(&(level - 1)).copied().ok_or_else(|| {
                GedcomError::OrphanElement {
                    line_number,
                    level,
                    tag: line.tag.clone(),
                }
            })?;
            Some(parent)
        };
        if let Some(pointer) = line.id.as_deref() {
            if self.document.contains_pointer(pointer) {
                return Err(GedcomError::DuplicatePointer {
                    pointer: pointer.to_string(),
                    line_number: Some(line_number),
                });
            }
        }

        tracing::trace!(line_number, level, tag = %line.tag, "Parsed line");

        // close everything at this level or deeper
        self.open_at_level.split_off(&level);

        let kind = self.document.registry().resolve(&line.tag);
        let pointer = line.id.clone();
        let node = self.document.insert(Element::from_line(kind, line));

        if let Some(parent) = parent {
            self.document.attach(parent, node);
        }
        self.open_at_level.insert(level, node);

        if let Some(pointer) = pointer {
            self.document.bind_pointer(node, pointer, Some(line_number))?;
        }
        if level == 0 {
            self.document.push_root(node);
        }
        Ok(())
    }

    /// Finish parsing and hand over the document
    pub fn finish(self) -> Document {
        tracing::debug!(
            lines = self.line_number,
            roots = self.document.root_count(),
            pointers = self.document.pointer_count(),
            "Parsed document"
        );
        self.document
    }

    /// Parse a whole sequence of lines
    pub fn parse_lines<I, S>(mut self, lines: I) -> Result<Document>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.feed_line(line.as_ref())?;
        }
        Ok(self.finish())
    }

    /// Parse in-memory text; `\n` and `\r\n` line endings are both accepted
    pub fn parse_str(self, text: &str) -> Result<Document> {
        self.parse_lines(text.split_inclusive('\n'))
    }

    /// Parse from a buffered reader, line by line
    ///
    /// A line that is not UTF-8 fails with `InvalidUtf8` at its line number.
    pub fn parse_reader<R: BufRead>(mut self, mut reader: R) -> Result<Document> {
        let mut buffer = Vec::new();
        loop {
            buffer.clear();
            if reader.read_until(b'\n', &mut buffer)? == 0 {
                break;
            }
            let line = std::str::from_utf8(&buffer).map_err(|_| GedcomError::InvalidUtf8 {
                line_number: self.line_number + 1,
            })?;
            self.feed_line(line)?;
        }
        Ok(self.finish())
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gedcom::registry::ElementKind;

    #[test]
    fn test_nesting_follows_levels() {
        let doc = Parser::new()
            .parse_str("0 @I1@ INDI\n1 BIRT\n2 DATE 1900\n2 PLAC Town\n1 SEX M\n0 @I2@ INDI\n")
            .unwrap();

        assert_eq!(doc.root_count(), 2);
        let first = doc.get("@I1@").unwrap();
        let tags: Vec<_> = first.children().map(|child| child.tag()).collect();
        assert_eq!(tags, vec!["BIRT", "SEX"]);

        let birth = first.get_single("BIRT").unwrap();
        let tags: Vec<_> = birth.children().map(|child| child.tag()).collect();
        assert_eq!(tags, vec!["DATE", "PLAC"]);
        assert_eq!(doc.get("@I2@").unwrap().child_count(), 0);
    }

    #[test]
    fn test_dedent_by_several_levels() {
        let doc = Parser::new()
            .parse_str("0 @F1@ FAM\n1 MARR\n2 PLAC A\n3 MAP\n4 LATI N1\n1 CHIL @I1@\n")
            .unwrap();
        let family = doc.get("@F1@").unwrap();
        let tags: Vec<_> = family.children().map(|child| child.tag()).collect();
        assert_eq!(tags, vec!["MARR", "CHIL"]);
    }

    #[test]
    fn test_registry_kinds_are_applied() {
        let doc = Parser::new()
            .parse_str("0 @I1@ INDI\n1 BIRT\n1 NOTE x\n1 _CUSTOM y\n")
            .unwrap();
        let person = doc.get("@I1@").unwrap();
        assert_eq!(person.kind(), ElementKind::Individual);
        let kinds: Vec<_> = person.children().map(|child| child.kind()).collect();
        assert_eq!(
            kinds,
            vec![ElementKind::Birth, ElementKind::Note, ElementKind::Generic]
        );
    }

    #[test]
    fn test_empty_registry_makes_everything_generic() {
        let doc = Parser::with_registry(Arc::new(TagRegistry::new()), GedcomConfig::default())
            .parse_str("0 @I1@ INDI\n")
            .unwrap();
        assert_eq!(doc.get("@I1@").unwrap().kind(), ElementKind::Generic);
    }

    #[test]
    fn test_orphan_element() {
        let result = Parser::new().parse_str("0 @I1@ INDI\n2 DATE 1900\n");
        match result {
            Err(GedcomError::OrphanElement {
                line_number,
                level,
                tag,
            }) => {
                assert_eq!(line_number, 2);
                assert_eq!(level, 2);
                assert_eq!(tag, "DATE");
            }
            other => panic!("expected OrphanElement, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_first_line_may_not_be_nested() {
        assert!(matches!(
            Parser::new().parse_str("1 NAME x\n"),
            Err(GedcomError::OrphanElement { line_number: 1, .. })
        ));
    }

    #[test]
    fn test_closed_level_cannot_be_reopened_by_deeper_line() {
        // the level 1 entry is closed by the new root, so level 2 has no parent
        assert!(matches!(
            Parser::new().parse_str("0 A\n1 B\n0 C\n2 D\n"),
            Err(GedcomError::OrphanElement { line_number: 4, .. })
        ));
    }

    #[test]
    fn test_duplicate_pointer() {
        let result = Parser::new().parse_str("0 @I1@ INDI\n\n0 @I1@ INDI\n");
        match result {
            Err(GedcomError::DuplicatePointer {
                pointer,
                line_number,
            }) => {
                assert_eq!(pointer, "@I1@");
                assert_eq!(line_number, Some(3));
            }
            other => panic!("expected DuplicatePointer, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_rejected_line_leaves_no_trace() {
        let mut parser = Parser::new();
        parser.feed_line("0 @I1@ INDI").unwrap();
        parser.feed_line("1 NAME A /B/").unwrap();
        assert!(matches!(
            parser.feed_line("1 @I1@ NOTE x"),
            Err(GedcomError::DuplicatePointer { line_number: Some(3), .. })
        ));
        assert!(matches!(
            parser.feed_line("3 DATE 1900"),
            Err(GedcomError::OrphanElement { line_number: 4, .. })
        ));
        // level 1 is still open under the first record
        parser.feed_line("2 GIVN A").unwrap();
        parser.feed_line("0 TRLR").unwrap();

        let mut doc = parser.finish();
        assert_eq!(doc.element_count(), 4);
        assert_eq!(doc.get("@I1@").unwrap().tag(), "INDI");
        let name = doc.get("@I1@").unwrap().get_single("NAME").unwrap();
        assert_eq!(name.child_value("GIVN").unwrap(), Some("A"));

        let text = doc.to_gedcom_string().unwrap();
        assert!(!text.contains("NOTE x"));
        let reparsed = Parser::new().parse_str(&text).unwrap();
        assert_eq!(reparsed.snapshot(), doc.snapshot());
    }

    #[test]
    fn test_invalid_utf8_reports_line() {
        let source: &[u8] = b"0 @I1@ INDI\n1 NAME \xff\xfe /B/\n1 SEX M\n";
        match Parser::new().parse_reader(source) {
            Err(err @ GedcomError::InvalidUtf8 { .. }) => assert_eq!(err.line_number(), Some(2)),
            other => panic!("expected InvalidUtf8, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_malformed_line_aborts() {
        assert!(matches!(
            Parser::new().parse_str("0 HEAD\n1 CHAR UTF-8\nnot a line\n0 TRLR\n"),
            Err(GedcomError::MalformedLine { line_number: 3, .. })
        ));
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let doc = Parser::new()
            .parse_str("\n0 HEAD\n   \n0 TRLR\n\n")
            .unwrap();
        assert_eq!(doc.root_count(), 2);
    }

    #[test]
    fn test_parse_reader_keeps_values_verbatim() {
        let source = "0 @N1@ NOTE  spaced  \r\n1 CONC more\r\n";
        let doc = Parser::new().parse_reader(source.as_bytes()).unwrap();
        assert_eq!(doc.get("@N1@").unwrap().value(), Some(" spaced  "));
    }

    #[test]
    fn test_parse_str_accepts_crlf() {
        let doc = Parser::new()
            .parse_str("0 @I1@ INDI\r\n1 SEX F\r\n")
            .unwrap();
        assert_eq!(
            doc.get("@I1@").unwrap().child_value("SEX").unwrap(),
            Some("F")
        );
    }

    #[test]
    fn test_feed_line_incrementally() {
        let mut parser = Parser::new();
        parser.feed_line("0 @I1@ INDI").unwrap();
        parser.feed_line("1 SEX F").unwrap();
        let doc = parser.finish();
        assert_eq!(
            doc.get("@I1@").unwrap().child_value("SEX").unwrap(),
            Some("F")
        );
    }
}
