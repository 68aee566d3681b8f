//! Main module for gedcom library functionality

pub mod ast;
pub mod codec;
pub mod document;
pub mod error;
pub mod parsing;
pub mod records;
pub mod registry;
pub mod testing;
