//! Round-trip and idempotence of parse/serialize
//!
//! Parsing serialized output must give back the same tree (tags, pointers,
//! values, nesting, order), and serializing a parsed document twice must give
//! the same bytes.

use gedcom::gedcom::testing::{assert_levels_consistent, SIMPLE_FAMILY};
use gedcom::{parse_str, Document, ElementSnapshot};
use proptest::prelude::*;

fn render(snapshot: &ElementSnapshot, level: usize, out: &mut String) {
    out.push_str(&level.to_string());
    if let Some(id) = &snapshot.id {
        out.push(' ');
        out.push_str(id);
    }
    out.push(' ');
    out.push_str(&snapshot.tag);
    if let Some(value) = &snapshot.value {
        out.push(' ');
        out.push_str(value);
    }
    out.push('\n');
    for child in &snapshot.children {
        render(child, level + 1, out);
    }
}

/// Roots between the header and the trailer
fn body(doc: &Document) -> Vec<ElementSnapshot> {
    let mut roots = doc.snapshot();
    if roots.first().map(|root| root.tag.as_str()) == Some("HEAD") {
        roots.remove(0);
    }
    if roots.last().map(|root| root.tag.as_str()) == Some("TRLR") {
        roots.pop();
    }
    roots
}

#[test]
fn test_simple_family_round_trips() {
    let mut doc = parse_str(SIMPLE_FAMILY).unwrap();
    let text = doc.to_gedcom_string().unwrap();

    assert_eq!(text, SIMPLE_FAMILY);
    let reparsed = parse_str(&text).unwrap();
    assert_eq!(reparsed.snapshot(), doc.snapshot());
}

#[test]
fn test_serialize_is_idempotent() {
    let mut doc = parse_str("0 @I1@ INDI\n1 NAME John /Smith/\n1 SEX M\n").unwrap();
    let once = doc.to_gedcom_string().unwrap();
    let twice = doc.to_gedcom_string().unwrap();
    assert_eq!(once, twice);

    let mut reparsed = parse_str(&once).unwrap();
    assert_eq!(reparsed.to_gedcom_string().unwrap(), once);
}

#[test]
fn test_levels_are_normalized_on_serialize() {
    let mut doc = Document::new();
    let person = doc.individual();
    let birth = doc.element("BIRT").unwrap();
    let date = doc.element_with_value("DATE", "1815").unwrap();
    doc.add_child(birth, date).unwrap();
    doc.add_root(person).unwrap();
    // grafted after the root was levelled, so BIRT and DATE have no level yet
    doc.add_child(person, birth).unwrap();
    assert_eq!(doc.node(date).level(), None);

    let lines: Vec<_> = doc.serialize().unwrap().collect();
    assert!(lines.contains(&"1 BIRT".to_string()));
    assert!(lines.contains(&"2 DATE 1815".to_string()));
    assert_levels_consistent(&doc);
}

#[test]
fn test_new_document_snapshot() {
    let mut doc = Document::new();
    let person = doc.individual();
    let name = doc.element_with_value("NAME", "Ada /Lovelace/").unwrap();
    doc.add_child(person, name).unwrap();
    doc.add_root(person).unwrap();
    doc.individual_mut(person).unwrap().set_sex("f").unwrap();

    let family = doc.family();
    let wife = doc.element_with_value("WIFE", "@I1@").unwrap();
    doc.add_child(family, wife).unwrap();
    doc.add_root(family).unwrap();

    let text = doc.to_gedcom_string().unwrap();
    insta::assert_snapshot!(text.trim_end(), @r"
    0 HEAD
    1 SOUR
    2 NAME gedcom
    2 VERS 0.1.0
    1 CHAR UNICODE
    1 GEDC
    2 VERS 5.5
    2 FORM LINEAGE-LINKED
    0 @I1@ INDI
    1 NAME Ada /Lovelace/
    1 SEX F
    0 @F2@ FAM
    1 WIFE @I1@
    0 TRLR
    ");
}

fn tag_strategy() -> impl Strategy<Value = String> {
    "[A-Z_][A-Z0-9_]{1,4}".prop_filter("header and trailer are normalized", |tag| {
        tag != "HEAD" && tag != "TRLR"
    })
}

fn value_strategy() -> impl Strategy<Value = Option<String>> {
    proptest::option::of("[a-zA-Z0-9 ,./@]{1,16}")
}

fn element_strategy() -> impl Strategy<Value = ElementSnapshot> {
    let leaf = (tag_strategy(), value_strategy()).prop_map(|(tag, value)| ElementSnapshot {
        tag,
        id: None,
        value,
        children: Vec::new(),
    });
    leaf.prop_recursive(4, 32, 4, |inner| {
        (
            tag_strategy(),
            value_strategy(),
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(tag, value, children)| ElementSnapshot {
                tag,
                id: None,
                value,
                children,
            })
    })
}

fn document_strategy() -> impl Strategy<Value = Vec<ElementSnapshot>> {
    prop::collection::vec(element_strategy(), 1..6).prop_map(|roots| {
        roots
            .into_iter()
            .enumerate()
            .map(|(index, root)| root.with_id(format!("@R{index}@")))
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_parse_serialize_round_trip(roots in document_strategy()) {
        let mut source = String::new();
        for root in &roots {
            render(root, 0, &mut source);
        }

        let mut doc = parse_str(&source).unwrap();
        let text = doc.to_gedcom_string().unwrap();
        let reparsed = parse_str(&text).unwrap();

        prop_assert_eq!(body(&reparsed), roots);
        prop_assert_eq!(reparsed.snapshot(), doc.snapshot());
    }

    #[test]
    fn prop_levels_consistent_after_serialize(roots in document_strategy()) {
        let mut source = String::new();
        for root in &roots {
            render(root, 0, &mut source);
        }

        let mut doc = parse_str(&source).unwrap();
        let first = doc.to_gedcom_string().unwrap();
        assert_levels_consistent(&doc);
        prop_assert_eq!(doc.to_gedcom_string().unwrap(), first);
    }

    #[test]
    fn prop_allocated_ids_are_fresh_and_ascending(existing in prop::collection::btree_set(1u64..20, 0..10), count in 1usize..8) {
        let mut source = String::new();
        for n in &existing {
            source.push_str(&format!("0 @I{n}@ INDI\n"));
        }
        let mut doc = parse_str(&source).unwrap();

        let mut previous = 0u64;
        for _ in 0..count {
            let person = doc.individual();
            doc.add_root(person).unwrap();
            let id = doc.node(person).id().unwrap().to_string();
            let number: u64 = id.trim_start_matches("@I").trim_end_matches('@').parse().unwrap();

            prop_assert!(!existing.contains(&number));
            prop_assert!(number > previous);
            previous = number;
        }
        prop_assert_eq!(doc.pointer_count(), existing.len() + count);
    }
}
