//! Tag registry
//!
//! Maps a tag string to the record kind that handles it. Record kinds form a
//! closed set ([`ElementKind`]); each kind declares the one tag it stands for,
//! and tags nobody registered resolve to [`ElementKind::Generic`] so that
//! unknown and vendor tags (`_UID`, ...) never fail a parse.
//!
//! The process-wide [`REGISTRY`] is built once on first use and never mutated
//! afterwards. Callers wanting a different table build their own
//! [`TagRegistry`] and hand it to the parser.

use super::error::{GedcomError, Result};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// The default registry with every built-in record kind bound to its tag
pub static REGISTRY: Lazy<Arc<TagRegistry>> = Lazy::new(|| Arc::new(TagRegistry::with_defaults()));

/// The record kinds an element can be instantiated as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Generic,
    Individual,
    Family,
    Husband,
    Wife,
    Birth,
    Death,
    Marriage,
    Note,
}

impl ElementKind {
    /// Every kind that is bound to a fixed tag
    pub const BUILTIN: [ElementKind; 8] = [
        ElementKind::Individual,
        ElementKind::Family,
        ElementKind::Husband,
        ElementKind::Wife,
        ElementKind::Birth,
        ElementKind::Death,
        ElementKind::Marriage,
        ElementKind::Note,
    ];

    /// The tag this kind stands for; the generic kind has none
    pub fn declared_tag(self) -> Option<&'static str> {
        match self {
            ElementKind::Generic => None,
            ElementKind::Individual => Some("INDI"),
            ElementKind::Family => Some("FAM"),
            ElementKind::Husband => Some("HUSB"),
            ElementKind::Wife => Some("WIFE"),
            ElementKind::Birth => Some("BIRT"),
            ElementKind::Death => Some("DEAT"),
            ElementKind::Marriage => Some("MARR"),
            ElementKind::Note => Some("NOTE"),
        }
    }

    pub fn is_spouse(self) -> bool {
        matches!(self, ElementKind::Husband | ElementKind::Wife)
    }

    pub fn is_event(self) -> bool {
        matches!(
            self,
            ElementKind::Birth | ElementKind::Death | ElementKind::Marriage
        )
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.declared_tag().unwrap_or("generic element"))
    }
}

/// Table from tag to record kind
#[derive(Debug, Clone, Default)]
pub struct TagRegistry {
    kinds: HashMap<String, ElementKind>,
}

impl TagRegistry {
    /// Create a new empty registry; every tag resolves to the generic kind
    pub fn new() -> Self {
        Self {
            kinds: HashMap::new(),
        }
    }

    /// Bind `tag` to `kind`.
    ///
    /// Fails with [`GedcomError::TagMismatch`] unless `kind` declares exactly
    /// this tag. Re-registering the same pair is a no-op.
    pub fn register(&mut self, tag: &str, kind: ElementKind) -> Result<()> {
        match kind.declared_tag() {
            Some(declared) if declared == tag => {
                self.kinds.insert(tag.to_string(), kind);
                Ok(())
            }
            declared => Err(GedcomError::TagMismatch {
                declared: declared.unwrap_or("<none>").to_string(),
                requested: tag.to_string(),
            }),
        }
    }

    /// The kind registered for `tag`, falling back to the generic kind
    pub fn resolve(&self, tag: &str) -> ElementKind {
        self.kinds.get(tag).copied().unwrap_or(ElementKind::Generic)
    }

    pub fn has(&self, tag: &str) -> bool {
        self.kinds.contains_key(tag)
    }

    /// All registered tags (sorted)
    pub fn list_tags(&self) -> Vec<String> {
        let mut tags: Vec<_> = self.kinds.keys().cloned().collect();
        tags.sort();
        tags
    }

    /// Create a registry with every built-in kind registered under its own tag
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for kind in ElementKind::BUILTIN {
            if let Some(tag) = kind.declared_tag() {
                registry.kinds.insert(tag.to_string(), kind);
            }
        }
        registry
    }
}
