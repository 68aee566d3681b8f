//! INDI records
//!
//! Names come either as a single slash-delimited value or as GIVN/SURN
//! children of an empty NAME:
//!
//! ```text
//! 1 NAME John /Smith/
//! 1 NAME
//! 2 GIVN John
//! 2 SURN Smith
//! ```
//!
//! A person may carry several NAME records; typed ones (`2 TYPE aka`,
//! `2 TYPE birth`, ...) are alternates and the first untyped one is the
//! preferred name.

use super::{Event, Family, Record};
use crate::gedcom::ast::{ElementRef, NodeId};
use crate::gedcom::document::Document;
use crate::gedcom::error::{GedcomError, Result};
use crate::gedcom::registry::ElementKind;

/// Given and family name of a person
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name {
    pub given: String,
    pub surname: String,
}

impl Name {
    pub fn new(given: impl Into<String>, surname: impl Into<String>) -> Self {
        Self {
            given: given.into(),
            surname: surname.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Individual<'a> {
    element: ElementRef<'a>,
}

impl<'a> Record<'a> for Individual<'a> {
    fn accepts(kind: ElementKind) -> bool {
        kind == ElementKind::Individual
    }

    fn from_element(element: ElementRef<'a>) -> Self {
        Self { element }
    }

    fn element(&self) -> ElementRef<'a> {
        self.element
    }
}

impl<'a> Individual<'a> {
    /// The preferred name.
    ///
    /// With a single NAME that one is used. With several, the first without
    /// a TYPE child wins; if all are typed the choice is ambiguous.
    pub fn name(&self) -> Result<Name> {
        let names = self.element.get_list("NAME");
        let preferred = match names.as_slice() {
            [] => {
                return Err(GedcomError::MissingTag {
                    parent: self.element.tag().to_string(),
                    tag: "NAME".to_string(),
                })
            }
            [only] => *only,
            several => several
                .iter()
                .find(|name| !name.contains("TYPE"))
                .copied()
                .ok_or(GedcomError::AmbiguousName {
                    count: several.len(),
                })?,
        };
        extract_name(preferred)
    }

    /// Every NAME whose TYPE is `aka` (any case), in document order
    pub fn aka(&self) -> Result<Vec<Name>> {
        let mut names = Vec::new();
        for name in self.element.get_list("NAME") {
            if !name.contains("TYPE") {
                continue;
            }
            let kind = name.child_value("TYPE")?.unwrap_or_default();
            if kind.eq_ignore_ascii_case("aka") {
                names.push(extract_name(name)?);
            }
        }
        Ok(names)
    }

    /// Value of the SEX child; `None` when there is none, `AmbiguousTag`
    /// when there are several
    pub fn sex(&self) -> Result<Option<&'a str>> {
        self.optional_value("SEX")
    }

    pub fn is_male(&self) -> Result<bool> {
        self.has_sex('M')
    }

    pub fn is_female(&self) -> Result<bool> {
        self.has_sex('F')
    }

    fn has_sex(&self, sex: char) -> Result<bool> {
        Ok(self
            .sex()?
            .is_some_and(|value| value.eq_ignore_ascii_case(&sex.to_string())))
    }

    fn optional_value(&self, tag: &str) -> Result<Option<&'a str>> {
        if self.element.contains(tag) {
            self.element.child_value(tag)
        } else {
            Ok(None)
        }
    }

    pub fn birth(&self) -> Result<Event<'a>> {
        self.element.get_single("BIRT").map(Event::from_element)
    }

    pub fn death(&self) -> Result<Event<'a>> {
        self.element.get_single("DEAT").map(Event::from_element)
    }

    /// Value of the TITL child; `None` when there is none
    pub fn title(&self) -> Result<Option<&'a str>> {
        self.optional_value("TITL")
    }

    /// The family this person is a child of, via FAMC
    pub fn family_of_origin(&self) -> Result<Option<Family<'a>>> {
        if !self.element.contains("FAMC") {
            return Ok(None);
        }
        let pointer = self.element.child_value("FAMC")?.unwrap_or_default();
        let target = self.element.get_by_id(pointer)?;
        let family = Family::cast(target).ok_or_else(|| GedcomError::KindMismatch {
            pointer: pointer.to_string(),
            expected: ElementKind::Family.to_string(),
            found: target.tag().to_string(),
        })?;
        Ok(Some(family))
    }

    /// Partners of the family of origin, dereferenced; empty without FAMC.
    ///
    /// The family is expected to list this person as a CHIL, but a missing
    /// entry is only logged.
    pub fn parents(&self) -> Result<Vec<Individual<'a>>> {
        let Some(family) = self.family_of_origin()? else {
            return Ok(Vec::new());
        };

        let listed = self
            .element
            .id()
            .is_some_and(|pointer| family.has_child(pointer));
        if !listed {
            tracing::warn!(
                individual = self.element.id().unwrap_or("<none>"),
                family = family.element().id().unwrap_or("<none>"),
                "Family of origin does not list individual as a child"
            );
        }

        family
            .partners()
            .iter()
            .map(|partner| partner.as_individual())
            .collect()
    }

    pub fn father(&self) -> Result<Option<Individual<'a>>> {
        self.parent_with_sex('M')
    }

    pub fn mother(&self) -> Result<Option<Individual<'a>>> {
        self.parent_with_sex('F')
    }

    fn parent_with_sex(&self, sex: char) -> Result<Option<Individual<'a>>> {
        let mut matching = Vec::new();
        for parent in self.parents()? {
            if parent.has_sex(sex)? {
                matching.push(parent);
            }
        }
        match matching.len() {
            0 | 1 => Ok(matching.pop()),
            count => Err(GedcomError::MultipleParents { sex, count }),
        }
    }
}

fn extract_name(name: ElementRef<'_>) -> Result<Name> {
    match name.value() {
        Some(value) if !value.is_empty() => split_name(value),
        _ => Ok(Name::new(
            name.child_value("GIVN")?.unwrap_or_default(),
            name.child_value("SURN")?.unwrap_or_default(),
        )),
    }
}

/// `Given /Family/ Suffix` - exactly two slashes
fn split_name(value: &str) -> Result<Name> {
    let parts: Vec<&str> = value.split('/').collect();
    match parts.as_slice() {
        [given, surname, _] => Ok(Name::new(given.trim(), surname.trim())),
        _ => Err(GedcomError::MalformedName(value.to_string())),
    }
}

/// Mutable access to an individual
pub struct IndividualMut<'a> {
    doc: &'a mut Document,
    node: NodeId,
}

impl Document {
    /// Mutable view of `node`, if it is an individual
    pub fn individual_mut(&mut self, node: NodeId) -> Option<IndividualMut<'_>> {
        if self
            .try_node(node)
            .is_some_and(|element| Individual::accepts(element.kind()))
        {
            Some(IndividualMut { doc: self, node })
        } else {
            None
        }
    }
}

impl IndividualMut<'_> {
    pub fn as_individual(&self) -> Individual<'_> {
        Individual::from_element(self.doc.node(self.node))
    }

    /// Set SEX to `M` or `F` (any case), updating the existing SEX child or
    /// appending a new one
    pub fn set_sex(&mut self, sex: &str) -> Result<()> {
        let normalized = sex.to_uppercase();
        if normalized != "M" && normalized != "F" {
            return Err(GedcomError::InvalidSex(sex.to_string()));
        }

        let existing: Vec<NodeId> = self
            .doc
            .node(self.node)
            .get_list("SEX")
            .iter()
            .map(|child| child.node_id())
            .collect();

        match existing.as_slice() {
            [] => {
                let child = self.doc.element_with_value("SEX", normalized)?;
                self.doc.add_child(self.node, child)?;
                if self.doc.node(self.node).level().is_some() {
                    self.doc.set_levels_downward(self.node)?;
                }
            }
            [only] => self.doc.set_value(*only, Some(normalized))?,
            several => {
                return Err(GedcomError::AmbiguousTag {
                    parent: self.doc.node(self.node).tag().to_string(),
                    tag: "SEX".to_string(),
                    count: several.len(),
                })
            }
        }
        Ok(())
    }
}
