//! Events: BIRT, DEAT and MARR

use super::Record;
use crate::gedcom::ast::ElementRef;
use crate::gedcom::error::Result;
use crate::gedcom::registry::ElementKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event<'a> {
    element: ElementRef<'a>,
}

impl<'a> Record<'a> for Event<'a> {
    fn accepts(kind: ElementKind) -> bool {
        kind.is_event()
    }

    fn from_element(element: ElementRef<'a>) -> Self {
        Self { element }
    }

    fn element(&self) -> ElementRef<'a> {
        self.element
    }
}

impl<'a> Event<'a> {
    pub fn kind(&self) -> ElementKind {
        self.element.kind()
    }

    /// Value of the sole DATE child
    pub fn date(&self) -> Result<Option<&'a str>> {
        self.element.child_value("DATE")
    }

    /// Value of the sole PLAC child
    pub fn place(&self) -> Result<Option<&'a str>> {
        self.element.child_value("PLAC")
    }
}
