//! Element storage

use crate::gedcom::codec::{Line, LineRef};
use crate::gedcom::registry::ElementKind;

/// Index of an element inside the document that created it.
///
/// A `NodeId` is only meaningful for the document that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One node of the tree: a parsed line plus its place in the hierarchy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub(crate) level: Option<usize>,
    pub(crate) tag: String,
    pub(crate) value: Option<String>,
    pub(crate) id: Option<String>,
    pub(crate) kind: ElementKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Element {
    /// A detached element with no level yet
    pub(crate) fn detached(kind: ElementKind, tag: &str, value: Option<String>) -> Self {
        Self {
            level: None,
            tag: tag.to_string(),
            value,
            id: None,
            kind,
            parent: None,
            children: Vec::new(),
        }
    }

    pub(crate) fn from_line(kind: ElementKind, line: Line) -> Self {
        Self {
            level: Some(line.level),
            tag: line.tag,
            value: line.value,
            id: line.id,
            kind,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn level(&self) -> Option<usize> {
        self.level
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The line this element formats to, once it has a level
    pub fn as_line_ref(&self) -> Option<LineRef<'_>> {
        self.level.map(|level| self.line_at(level))
    }

    /// The line this element formats to when placed at `level`
    pub(crate) fn line_at(&self, level: usize) -> LineRef<'_> {
        LineRef {
            level,
            id: self.id.as_deref(),
            tag: &self.tag,
            value: self.value.as_deref(),
        }
    }
}
