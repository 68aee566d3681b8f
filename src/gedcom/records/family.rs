//! FAM records

use super::{Record, Spouse};
use crate::gedcom::ast::ElementRef;
use crate::gedcom::registry::ElementKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Family<'a> {
    element: ElementRef<'a>,
}

impl<'a> Record<'a> for Family<'a> {
    fn accepts(kind: ElementKind) -> bool {
        kind == ElementKind::Family
    }

    fn from_element(element: ElementRef<'a>) -> Self {
        Self { element }
    }

    fn element(&self) -> ElementRef<'a> {
        self.element
    }
}

impl<'a> Family<'a> {
    /// HUSB children followed by WIFE children; pointers are not dereferenced
    pub fn partners(&self) -> Vec<Spouse<'a>> {
        let mut partners = self.husbands();
        partners.extend(self.wives());
        partners
    }

    pub fn husbands(&self) -> Vec<Spouse<'a>> {
        self.spouses("HUSB")
    }

    pub fn wives(&self) -> Vec<Spouse<'a>> {
        self.spouses("WIFE")
    }

    /// CHIL pointer elements in document order
    pub fn children(&self) -> Vec<ElementRef<'a>> {
        self.element.get_list("CHIL")
    }

    /// Whether some CHIL element points at `pointer`
    pub fn has_child(&self, pointer: &str) -> bool {
        self.children()
            .iter()
            .any(|child| child.value() == Some(pointer))
    }

    fn spouses(&self, tag: &str) -> Vec<Spouse<'a>> {
        self.element
            .get_list(tag)
            .into_iter()
            .map(Spouse::from_element)
            .collect()
    }
}
