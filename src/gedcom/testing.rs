//! Shared fixtures and assertions for unit and integration tests

use crate::gedcom::ast::ElementRef;
use crate::gedcom::document::Document;

/// A three-person family: John and Jane with their daughter Ann
pub const SIMPLE_FAMILY: &str = "\
0 HEAD
1 CHAR UTF-8
0 @I1@ INDI
1 NAME John /Smith/
1 SEX M
1 FAMS @F1@
0 @I2@ INDI
1 NAME Jane /Doe/
1 SEX F
1 FAMS @F1@
0 @I3@ INDI
1 NAME Ann /Smith/
1 SEX F
1 BIRT
2 DATE 2 FEB 1920
2 PLAC Springfield
1 FAMC @F1@
0 @F1@ FAM
1 HUSB @I1@
1 WIFE @I2@
1 MARR
2 DATE 1 JAN 1919
1 CHIL @I3@
0 @N1@ NOTE Family records
1 CONT collected by Ann
1 CONC  Smith
0 TRLR
";

/// Assert that every attached element sits exactly one level below its parent
pub fn assert_levels_consistent(doc: &Document) {
    for root in doc.roots() {
        assert_eq!(root.level(), Some(0), "root {} is not at level 0", root.tag());
        assert_children_levels(root);
    }
}

fn assert_children_levels(element: ElementRef<'_>) {
    let level = element.level().expect("attached elements have a level");
    for child in element.children() {
        assert_eq!(
            child.level(),
            Some(level + 1),
            "{} under {} is at the wrong level",
            child.tag(),
            element.tag()
        );
        assert_children_levels(child);
    }
}
