//! NOTE records
//!
//! Long note text is split over continuation lines: `CONT` starts a new line
//! of text, `CONC` continues the current one.
//!
//! ```text
//! 0 @N1@ NOTE Hello
//! 1 CONT World
//! 1 CONC !
//! ```
//!
//! reads back as `"Hello\nWorld!"`.

use super::Record;
use crate::gedcom::ast::ElementRef;
use crate::gedcom::error::{GedcomError, Result};
use crate::gedcom::registry::ElementKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note<'a> {
    element: ElementRef<'a>,
}

impl<'a> Record<'a> for Note<'a> {
    fn accepts(kind: ElementKind) -> bool {
        kind == ElementKind::Note
    }

    fn from_element(element: ElementRef<'a>) -> Self {
        Self { element }
    }

    fn element(&self) -> ElementRef<'a> {
        self.element
    }
}

impl<'a> Note<'a> {
    /// The note's own value followed by its CONT/CONC children, in order.
    ///
    /// Any other child tag fails with `UnexpectedTag`.
    pub fn full_text(&self) -> Result<String> {
        let mut text = self.element.value().unwrap_or_default().to_string();
        for child in self.element.children() {
            match child.tag() {
                "CONT" => {
                    text.push('\n');
                    text.push_str(child.value().unwrap_or_default());
                }
                "CONC" => text.push_str(child.value().unwrap_or_default()),
                other => {
                    return Err(GedcomError::UnexpectedTag {
                        parent: self.element.tag().to_string(),
                        tag: other.to_string(),
                    })
                }
            }
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gedcom::parsing::parse_str;

    fn note_text(source: &str) -> Result<String> {
        let doc = parse_str(source).unwrap();
        let note = Note::cast(doc.get("@N1@").unwrap()).expect("NOTE is registered");
        note.full_text()
    }

    #[test]
    fn test_cont_and_conc() {
        let text = note_text("0 @N1@ NOTE Hello\n1 CONT World\n1 CONC !\n").unwrap();
        assert_eq!(text, "Hello\nWorld!");
    }

    #[test]
    fn test_order_is_preserved() {
        let text = note_text("0 @N1@ NOTE a\n1 CONC b\n1 CONT c\n1 CONC d\n1 CONT\n").unwrap();
        assert_eq!(text, "ab\ncd\n");
    }

    #[test]
    fn test_empty_note() {
        assert_eq!(note_text("0 @N1@ NOTE\n").unwrap(), "");
    }

    #[test]
    fn test_unexpected_child() {
        match note_text("0 @N1@ NOTE a\n1 SOUR @S1@\n") {
            Err(GedcomError::UnexpectedTag { parent, tag }) => {
                assert_eq!(parent, "NOTE");
                assert_eq!(tag, "SOUR");
            }
            other => panic!("expected UnexpectedTag, got {other:?}"),
        }
    }
}
