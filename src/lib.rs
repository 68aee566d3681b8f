//! # gedcom
//!
//! A parser and serializer for GEDCOM, the line-oriented genealogy format in
//! which every line starts with its depth in the tree:
//!
//! ```text
//! 0 @I1@ INDI
//! 1 NAME John /Smith/
//! 1 BIRT
//! 2 DATE 1 JAN 1900
//! ```
//!
//! Layout:
//!
//! src/gedcom
//!   ├── codec       One line: parse and format
//!   ├── registry    Tag to record kind table
//!   ├── ast         Element arena, lookups, levelling
//!   ├── parsing     Level-stack parser and input entry points
//!   ├── document    Pointer namespace, header/trailer, serialization
//!   └── records     Typed views: individuals, families, events, notes
//!
//! Configuration (header contents, pointer prefixes) comes from the
//! `gedcom-config` crate.

pub mod gedcom;

pub use gedcom::ast::{ElementRef, ElementSnapshot, NodeId};
pub use gedcom::document::{Document, Lines};
pub use gedcom::error::{GedcomError, Result};
pub use gedcom::parsing::{parse, parse_path, parse_reader, parse_str, Parser};
pub use gedcom::records::{
    Event, Family, Individual, IndividualMut, Name, Note, Record, Spouse, SpouseRole,
};
pub use gedcom::registry::{ElementKind, TagRegistry, REGISTRY};
pub use gedcom_config::GedcomConfig;
