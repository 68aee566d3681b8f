//! Read-only element handle
//!
//! [`ElementRef`] is the lookup surface shared by every record kind. Child
//! lookup comes in two explicitly typed flavors: [`ElementRef::get_single`]
//! for tags that must occur exactly once, and [`ElementRef::get_list`] for
//! tags that may repeat.

use super::element::{Element, NodeId};
use super::snapshot::ElementSnapshot;
use crate::gedcom::codec::format_line;
use crate::gedcom::document::Document;
use crate::gedcom::error::{GedcomError, Result};
use crate::gedcom::records::{Note, Record};
use crate::gedcom::registry::ElementKind;
use std::fmt;

#[derive(Clone, Copy)]
pub struct ElementRef<'a> {
    doc: &'a Document,
    node: NodeId,
}

impl<'a> ElementRef<'a> {
    pub(crate) fn new(doc: &'a Document, node: NodeId) -> Self {
        Self { doc, node }
    }

    pub fn node_id(&self) -> NodeId {
        self.node
    }

    /// The document this element belongs to
    pub fn document(&self) -> &'a Document {
        self.doc
    }

    pub fn data(&self) -> &'a Element {
        self.doc.data(self.node)
    }

    pub fn tag(&self) -> &'a str {
        &self.data().tag
    }

    pub fn value(&self) -> Option<&'a str> {
        self.data().value.as_deref()
    }

    pub fn id(&self) -> Option<&'a str> {
        self.data().id.as_deref()
    }

    pub fn level(&self) -> Option<usize> {
        self.data().level
    }

    pub fn kind(&self) -> ElementKind {
        self.data().kind
    }

    pub fn parent(&self) -> Option<ElementRef<'a>> {
        self.data().parent.map(|parent| ElementRef::new(self.doc, parent))
    }

    /// Children in document order
    pub fn children(&self) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        let doc = self.doc;
        self.data()
            .children
            .iter()
            .map(move |&child| ElementRef::new(doc, child))
    }

    pub fn child_count(&self) -> usize {
        self.data().children.len()
    }

    /// The unique child tagged `tag`.
    ///
    /// Fails with `MissingTag` when there is none and `AmbiguousTag` when
    /// there are several.
    pub fn get_single(&self, tag: &str) -> Result<ElementRef<'a>> {
        let mut matches = self.children().filter(|child| child.tag() == tag);
        let first = matches.next().ok_or_else(|| GedcomError::MissingTag {
            parent: self.tag().to_string(),
            tag: tag.to_string(),
        })?;
        let extra = matches.count();
        if extra > 0 {
            return Err(GedcomError::AmbiguousTag {
                parent: self.tag().to_string(),
                tag: tag.to_string(),
                count: extra + 1,
            });
        }
        Ok(first)
    }

    /// All children tagged `tag`, in document order (possibly empty)
    pub fn get_list(&self, tag: &str) -> Vec<ElementRef<'a>> {
        self.children().filter(|child| child.tag() == tag).collect()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.children().any(|child| child.tag() == tag)
    }

    /// Value of the unique child tagged `tag`, if that child has one
    pub fn child_value(&self, tag: &str) -> Result<Option<&'a str>> {
        Ok(self.get_single(tag)?.value())
    }

    /// Look up another element of the same document by pointer
    pub fn get_by_id(&self, pointer: &str) -> Result<ElementRef<'a>> {
        self.doc.get(pointer)
    }

    /// Full text of the sole NOTE child, if this element has one
    pub fn note(&self) -> Result<Option<String>> {
        if !self.contains("NOTE") {
            return Ok(None);
        }
        let note = Note::from_element(self.get_single("NOTE")?);
        note.full_text().map(Some)
    }

    /// This element formatted as a single line; needs a level
    pub fn to_line(&self) -> Result<String> {
        let line = self
            .data()
            .as_line_ref()
            .ok_or_else(|| GedcomError::InvalidLevel {
                tag: self.tag().to_string(),
            })?;
        Ok(format_line(&line))
    }

    pub fn snapshot(&self) -> ElementSnapshot {
        ElementSnapshot::from_element(*self)
    }
}

impl fmt::Debug for ElementRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.data();
        f.debug_struct("ElementRef")
            .field("node", &self.node)
            .field("level", &data.level)
            .field("tag", &data.tag)
            .field("id", &data.id)
            .field("value", &data.value)
            .field("children", &data.children.len())
            .finish()
    }
}

impl PartialEq for ElementRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.node == other.node
    }
}

impl Eq for ElementRef<'_> {}
