//! Element snapshot - an owned, serializable copy of a subtree
//!
//! Snapshots drop levels and node indices and keep only what a document
//! means: tags, pointers, values, nesting and order. Two documents with equal
//! snapshots serialize to the same lines.

use super::element_ref::ElementRef;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementSnapshot {
    pub tag: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementSnapshot>,
}

impl ElementSnapshot {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            id: None,
            value: None,
            children: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_child(mut self, child: ElementSnapshot) -> Self {
        self.children.push(child);
        self
    }

    /// Snapshot `element` and all its descendants
    pub fn from_element(element: ElementRef<'_>) -> Self {
        Self {
            tag: element.tag().to_string(),
            id: element.id().map(str::to_string),
            // an empty value formats the same as no value
            value: element
                .value()
                .filter(|value| !value.is_empty())
                .map(str::to_string),
            children: element.children().map(Self::from_element).collect(),
        }
    }
}
