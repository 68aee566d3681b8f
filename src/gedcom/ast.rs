//! Element tree
//!
//! All elements of a document live in one arena owned by the
//! [`Document`](super::document::Document) and are addressed by [`NodeId`].
//! A parent lists its children in document order; nothing else owns an
//! element. Read access goes through [`ElementRef`], a copyable handle that
//! pairs a node with the document it belongs to, which is how an element
//! reaches the pointer table for dereferencing.
//!
//! Mutation (attaching children, re-levelling subtrees) happens through
//! methods on the document, see [`tree`].

pub mod element;
pub mod element_ref;
pub mod snapshot;
pub mod tree;

pub use element::{Element, NodeId};
pub use element_ref::ElementRef;
pub use snapshot::ElementSnapshot;
