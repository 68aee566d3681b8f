//! Parsing: line sequences to documents
//!
//! [`parser`] holds the level-stack algorithm that rebuilds the tree from the
//! level number on each line. [`input`] unifies the ways text reaches it:
//! a string, a buffered reader, a path, or a string that may be either.

pub mod input;
pub mod parser;

pub use input::{parse, parse_path, parse_reader, parse_str, parse_with_config};
pub use parser::Parser;
