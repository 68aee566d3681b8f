//! Tree mutation: attaching children and propagating levels
//!
//! These live on [`Document`] because it owns the element arena. A freshly
//! created element is detached and has no level; attaching it never sets a
//! level, so grafting a subtree is followed by
//! [`Document::set_levels_downward`] on its new parent or on the subtree.

use super::element::NodeId;
use crate::gedcom::codec::is_value;
use crate::gedcom::document::Document;
use crate::gedcom::error::{GedcomError, Result};

impl Document {
    /// Append `child` as the last child of `parent`.
    ///
    /// The child must be detached: no parent and not a root. Attaching an
    /// element below itself or one of its descendants fails.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.check_node(parent)?;
        self.check_node(child)?;
        self.ensure_detached(child)?;
        if self.is_ancestor_or_self(child, parent) {
            return Err(GedcomError::CyclicAttachment {
                tag: self.data(child).tag.clone(),
            });
        }
        self.attach(parent, child);
        Ok(())
    }

    /// Recompute the level of every descendant of `root` from `root`'s own
    /// level, depth-first in pre-order.
    pub fn set_levels_downward(&mut self, root: NodeId) -> Result<()> {
        self.check_node(root)?;
        let base = self.data(root).level.ok_or_else(|| GedcomError::InvalidLevel {
            tag: self.data(root).tag.clone(),
        })?;

        let mut stack = vec![(root, base)];
        while let Some((node, level)) = stack.pop() {
            self.data_mut(node).level = Some(level);
            let children = &self.data(node).children;
            stack.extend(children.iter().rev().map(|&child| (child, level + 1)));
        }
        Ok(())
    }

    /// Replace the value of an element; `None` clears it.
    ///
    /// A value containing a line break fails with `MalformedValue` and leaves
    /// the element unchanged.
    pub fn set_value(&mut self, node: NodeId, value: Option<String>) -> Result<()> {
        self.check_node(node)?;
        if let Some(text) = value.as_deref().filter(|text| !is_value(text)) {
            return Err(GedcomError::MalformedValue(text.to_string()));
        }
        self.data_mut(node).value = value;
        Ok(())
    }

    /// Append without checks; callers guarantee `child` is fresh
    pub(crate) fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.data_mut(child).parent = Some(parent);
        self.data_mut(parent).children.push(child);
    }

    pub(crate) fn ensure_detached(&self, node: NodeId) -> Result<()> {
        if self.data(node).parent.is_some() || self.is_root(node) {
            return Err(GedcomError::AlreadyAttached {
                tag: self.data(node).tag.clone(),
            });
        }
        Ok(())
    }

    fn is_ancestor_or_self(&self, candidate: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == candidate {
                return true;
            }
            current = self.data(id).parent;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use crate::gedcom::document::Document;
    use crate::gedcom::error::GedcomError;
    use crate::gedcom::parsing::parse_str;

    #[test]
    fn test_add_child_does_not_set_level() {
        let mut doc = Document::new();
        let birth = doc.element("BIRT").unwrap();
        let date = doc.element_with_value("DATE", "1 JAN 1900").unwrap();
        doc.add_child(birth, date).unwrap();

        let birth_ref = doc.node(birth);
        assert_eq!(birth_ref.child_count(), 1);
        assert_eq!(doc.node(date).parent(), Some(birth_ref));
        assert_eq!(doc.node(date).level(), None);
    }

    #[test]
    fn test_add_child_rejects_attached_child() {
        let mut doc = Document::new();
        let a = doc.element("BIRT").unwrap();
        let b = doc.element("DEAT").unwrap();
        let date = doc.element("DATE").unwrap();
        doc.add_child(a, date).unwrap();

        assert!(matches!(
            doc.add_child(b, date),
            Err(GedcomError::AlreadyAttached { tag }) if tag == "DATE"
        ));
        assert_eq!(doc.node(b).child_count(), 0);
    }

    #[test]
    fn test_add_child_rejects_cycles() {
        let mut doc = Document::new();
        let outer = doc.element("EVEN").unwrap();
        let inner = doc.element("PLAC").unwrap();
        doc.add_child(outer, inner).unwrap();

        assert!(matches!(
            doc.add_child(inner, outer),
            Err(GedcomError::CyclicAttachment { .. })
        ));
        assert!(matches!(
            doc.add_child(inner, inner),
            Err(GedcomError::AlreadyAttached { .. })
        ));
    }

    #[test]
    fn test_set_levels_downward_requires_level() {
        let mut doc = Document::new();
        let note = doc.element("NOTE").unwrap();
        assert!(matches!(
            doc.set_levels_downward(note),
            Err(GedcomError::InvalidLevel { tag }) if tag == "NOTE"
        ));
    }

    #[test]
    fn test_grafted_subtree_is_relevelled() {
        let mut doc = parse_str("0 @I1@ INDI\n1 NAME A /B/\n").unwrap();
        let indi = doc.get("@I1@").unwrap().node_id();

        let birth = doc.element("BIRT").unwrap();
        let date = doc.element_with_value("DATE", "1900").unwrap();
        let place = doc.element_with_value("PLAC", "Here").unwrap();
        doc.add_child(birth, date).unwrap();
        doc.add_child(birth, place).unwrap();
        doc.add_child(indi, birth).unwrap();
        doc.set_levels_downward(indi).unwrap();

        assert_eq!(doc.node(birth).level(), Some(1));
        assert_eq!(doc.node(date).level(), Some(2));
        assert_eq!(doc.node(place).level(), Some(2));
        crate::gedcom::testing::assert_levels_consistent(&doc);
    }

    #[test]
    fn test_set_value() {
        let mut doc = parse_str("0 @I1@ INDI\n1 SEX M\n").unwrap();
        let sex = doc.get("@I1@").unwrap().get_single("SEX").unwrap().node_id();
        doc.set_value(sex, Some("F".to_string())).unwrap();
        assert_eq!(doc.node(sex).value(), Some("F"));

        doc.set_value(sex, None).unwrap();
        assert_eq!(doc.node(sex).value(), None);
    }

    #[test]
    fn test_set_value_rejects_line_breaks() {
        let mut doc = parse_str("0 @I1@ INDI\n1 NOTE kept\n").unwrap();
        let note = doc.get("@I1@").unwrap().get_single("NOTE").unwrap().node_id();

        assert!(matches!(
            doc.set_value(note, Some("line one\nline two".to_string())),
            Err(GedcomError::MalformedValue(_))
        ));
        assert!(matches!(
            doc.set_value(note, Some("trailing\r".to_string())),
            Err(GedcomError::MalformedValue(_))
        ));
        assert_eq!(doc.node(note).value(), Some("kept"));
    }

    #[test]
    fn test_node_ids_from_another_document_are_rejected() {
        let mut big = parse_str("0 @I1@ INDI\n1 NAME A /B/\n1 SEX M\n").unwrap();
        let foreign = big.element("NOTE").unwrap();
        let mut small = Document::new();
        let local = small.element("BIRT").unwrap();

        assert!(small.try_node(foreign).is_none());
        assert!(small.try_node(local).is_some());
        assert!(matches!(
            small.add_child(local, foreign),
            Err(GedcomError::UnknownNode(_))
        ));
        assert!(matches!(
            small.add_child(foreign, local),
            Err(GedcomError::UnknownNode(_))
        ));
        assert!(matches!(
            small.set_value(foreign, None),
            Err(GedcomError::UnknownNode(_))
        ));
        assert!(matches!(
            small.set_levels_downward(foreign),
            Err(GedcomError::UnknownNode(_))
        ));
        assert_eq!(small.node(local).child_count(), 0);
    }
}
