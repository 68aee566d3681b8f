//! Typed record views
//!
//! Each view wraps an [`ElementRef`] of a particular kind and adds the
//! derived queries for that record: names and parents of an individual,
//! partners of a family, date and place of an event, the reassembled text of
//! a note. Views borrow the document, so pointer dereferencing returns views
//! into the same document.
//!
//! Mutation goes through [`IndividualMut`], which borrows the document
//! mutably.

pub mod event;
pub mod family;
pub mod individual;
pub mod note;
pub mod spouse;

pub use event::Event;
pub use family::Family;
pub use individual::{Individual, IndividualMut, Name};
pub use note::Note;
pub use spouse::{Spouse, SpouseRole};

use crate::gedcom::ast::ElementRef;
use crate::gedcom::registry::ElementKind;

/// A typed view over an element of one or more record kinds
pub trait Record<'a>: Sized {
    /// Whether elements of `kind` can be viewed as this record
    fn accepts(kind: ElementKind) -> bool;

    /// Wrap `element` without checking its kind
    fn from_element(element: ElementRef<'a>) -> Self;

    fn element(&self) -> ElementRef<'a>;

    /// Wrap `element` if its kind is accepted
    fn cast(element: ElementRef<'a>) -> Option<Self> {
        if Self::accepts(element.kind()) {
            Some(Self::from_element(element))
        } else {
            None
        }
    }
}
