//! HUSB and WIFE pointers inside a family

use super::{Individual, Record};
use crate::gedcom::ast::ElementRef;
use crate::gedcom::error::{GedcomError, Result};
use crate::gedcom::registry::ElementKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpouseRole {
    Husband,
    Wife,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spouse<'a> {
    element: ElementRef<'a>,
}

impl<'a> Record<'a> for Spouse<'a> {
    fn accepts(kind: ElementKind) -> bool {
        kind.is_spouse()
    }

    fn from_element(element: ElementRef<'a>) -> Self {
        Self { element }
    }

    fn element(&self) -> ElementRef<'a> {
        self.element
    }
}

impl<'a> Spouse<'a> {
    pub fn role(&self) -> SpouseRole {
        if self.element.tag() == "WIFE" {
            SpouseRole::Wife
        } else {
            SpouseRole::Husband
        }
    }

    /// The raw pointer this element holds, e.g. `@I1@`
    pub fn pointer(&self) -> Option<&'a str> {
        self.element.value()
    }

    /// Dereference the pointer through the document
    pub fn as_individual(&self) -> Result<Individual<'a>> {
        let pointer = self.pointer().unwrap_or_default();
        let target = self.element.get_by_id(pointer)?;
        Individual::cast(target).ok_or_else(|| GedcomError::KindMismatch {
            pointer: pointer.to_string(),
            expected: ElementKind::Individual.to_string(),
            found: target.tag().to_string(),
        })
    }
}
