//! Integration tests for the full parse → fix → serialize cycle.

use fk_name_fix::changelog::Node;
use fk_name_fix::config::NamingConfig;
use fk_name_fix::locator::{ForeignKey, foreign_keys};
use fk_name_fix::{ChangelogDocument, fix_document};
use std::path::PathBuf;

/// Path to a file under tests/fixtures.
fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name)).expect("read fixture")
}

/// Constraint names of all foreign keys, in document order.
fn constraint_names(doc: &ChangelogDocument) -> Vec<Option<String>> {
    foreign_keys(doc)
        .map(|el| {
            ForeignKey::new(el.attributes())
                .constraint_name()
                .map(|n| n.into_owned())
        })
        .collect()
}

/// Parse, fix with default naming, and serialize.
fn fix_xml(xml: &str) -> (String, bool) {
    let mut doc = ChangelogDocument::parse(xml).expect("parse");
    let report = fix_document(&mut doc, &NamingConfig::default());
    (doc.to_xml().expect("serialize"), report.is_modified())
}

// ===========================================================================
// Fixtures
// ===========================================================================

#[test]
fn test_sqlite_diff_matches_expected_output() {
    let (fixed, modified) = fix_xml(&read_fixture("sqlite_diff.xml"));
    assert!(modified);
    assert_eq!(fixed, read_fixture("sqlite_diff.expected.xml"));
}

#[test]
fn test_sqlite_diff_report() {
    let mut doc = ChangelogDocument::from_file(&fixture_path("sqlite_diff.xml")).expect("load");
    let report = fix_document(&mut doc, &NamingConfig::default());

    let lines: Vec<String> = report.injections.iter().map(|i| i.to_string()).collect();
    assert_eq!(
        lines,
        vec![
            "constraintName='fk_orders_user_id_to_users' for FK orders(user_id) -> users",
            "constraintName='fk_orders_user_id_to_users_1' for FK orders(user_id) -> users",
            "constraintName='fk_order_items_tenant_id_user_id_to_users' for FK Order_Items(tenant_id_user_id) -> users",
        ]
    );
    assert_eq!(report.already_named, 1);
}

#[test]
fn test_already_named_fixture_untouched() {
    let xml = read_fixture("already_named.xml");
    let mut doc = ChangelogDocument::parse(&xml).expect("parse");
    let before = doc.clone();
    let report = fix_document(&mut doc, &NamingConfig::default());

    assert!(!report.is_modified());
    assert_eq!(report.already_named, 2);
    assert_eq!(doc, before);
}

#[test]
fn test_prefixed_fixture_treated_like_unprefixed() {
    let mut doc = ChangelogDocument::parse(&read_fixture("prefixed.xml")).expect("parse");
    fix_document(&mut doc, &NamingConfig::default());
    assert_eq!(
        constraint_names(&doc),
        vec![
            Some("fk_orders_user_id_to_users".to_string()),
            Some("fk_orders_user_id_to_users_1".to_string()),
        ]
    );
    let out = doc.to_xml().expect("serialize");
    assert!(out.contains(
        r#"<lb:addForeignKeyConstraint baseTableName="orders" baseColumnNames="user_id" referencedTableName="users" constraintName="fk_orders_user_id_to_users"/>"#
    ));
}

#[test]
fn test_latin1_fixture_decoded_and_written_as_utf8() {
    let mut doc = ChangelogDocument::from_file(&fixture_path("latin1.xml")).expect("load");
    let report = fix_document(&mut doc, &NamingConfig::default());
    assert_eq!(
        report.injections[0].constraint_name,
        "fk_commandes_client_id_to_clients"
    );

    let out = doc.to_xml().expect("serialize");
    assert!(out.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
    assert!(out.contains("<changeSet author=\"René\" id='1'>"), "got: {}", out);
}

#[test]
fn test_invalid_bytes_are_parse_error() {
    let mut bytes = b"<?xml version=\"1.0\" encoding=\"UTF-8\"?><a x=\"".to_vec();
    bytes.push(0xE9);
    bytes.extend_from_slice(b"\"/>");
    let err = ChangelogDocument::parse_bytes(&bytes).unwrap_err();
    assert!(err.to_string().contains("not valid UTF-8"), "got: {}", err);
}

#[test]
fn test_untouched_siblings_keep_source_layout() {
    let xml = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!DOCTYPE  databaseChangeLog>\n<databaseChangeLog>\n    <changeSet id='1'\n               author=\"dev\">\n        <addForeignKeyConstraint baseTableName=\"a\" baseColumnNames=\"b\" referencedTableName=\"c\"/>\n    </changeSet>\n</databaseChangeLog>\n";
    let (out, modified) = fix_xml(xml);
    assert!(modified);
    assert_eq!(
        out,
        xml.replace(
            "referencedTableName=\"c\"/>",
            "referencedTableName=\"c\" constraintName=\"fk_a_b_to_c\"/>"
        )
    );
}

#[test]
fn test_malformed_fixture_is_parse_error() {
    let err = ChangelogDocument::from_file(&fixture_path("malformed.xml")).unwrap_err();
    assert!(
        err.to_string().contains("Failed to parse"),
        "Expected parse error, got: {}",
        err
    );
}

// ===========================================================================
// Properties on hand-written documents
// ===========================================================================

#[test]
fn test_fix_is_idempotent() {
    let (once, _) = fix_xml(&read_fixture("sqlite_diff.xml"));
    let (twice, modified) = fix_xml(&once);
    assert!(!modified);
    assert_eq!(once, twice);
}

#[test]
fn test_structure_preserved() {
    let xml = read_fixture("sqlite_diff.xml");
    let original = ChangelogDocument::parse(&xml).expect("parse");
    let (fixed, _) = fix_xml(&xml);
    let fixed = ChangelogDocument::parse(&fixed).expect("reparse");

    let shape = |doc: &ChangelogDocument| -> Vec<String> {
        doc.elements().map(|el| el.name().expanded()).collect()
    };
    assert_eq!(shape(&original), shape(&fixed));

    // Every attribute that existed before is still there with the same value.
    for (before, after) in original.elements().zip(fixed.elements()) {
        for attr in before.attributes() {
            if attr.key == "constraintName" && attr.raw_value.is_empty() {
                continue;
            }
            assert_eq!(
                after.attributes().get(&attr.key),
                Some(attr.value()),
                "attribute {} changed on <{}>",
                attr.key,
                before.name().local()
            );
        }
    }
}

#[test]
fn test_same_input_same_names() {
    let xml = read_fixture("sqlite_diff.xml");
    assert_eq!(fix_xml(&xml), fix_xml(&xml));
}

#[test]
fn test_deeply_nested_foreign_key_found() {
    let xml = r#"<databaseChangeLog><changeSet id="1" author="a"><preConditions/><rollback><changeSet><addForeignKeyConstraint baseTableName="deep" baseColumnNames="x" referencedTableName="y"/></changeSet></rollback></changeSet></databaseChangeLog>"#;
    let (out, modified) = fix_xml(xml);
    assert!(modified);
    assert!(out.contains(r#"constraintName="fk_deep_x_to_y""#));
}

#[test]
fn test_comments_and_whitespace_survive() {
    let xml = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!-- top -->\n<databaseChangeLog>\n\t<!-- inner -->\n\t<addForeignKeyConstraint baseTableName=\"a\"/>\n</databaseChangeLog>\n";
    let (out, _) = fix_xml(xml);
    assert_eq!(
        out,
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!-- top -->\n<databaseChangeLog>\n\t<!-- inner -->\n\t<addForeignKeyConstraint baseTableName=\"a\" constraintName=\"fk_a_col_to_ref\"/>\n</databaseChangeLog>\n"
    );
}

#[test]
fn test_custom_naming_config() {
    let naming = NamingConfig {
        prefix: "fkey".to_string(),
        link: "ref".to_string(),
        ..NamingConfig::default()
    };
    let mut doc = ChangelogDocument::parse(
        r#"<c><addForeignKeyConstraint baseTableName="a" baseColumnNames="b" referencedTableName="c"/></c>"#,
    )
    .expect("parse");
    fix_document(&mut doc, &naming);
    assert_eq!(constraint_names(&doc), vec![Some("fkey_a_b_ref_c".to_string())]);
}

#[test]
fn test_top_level_nodes_kept_in_order() {
    let xml = "<?xml version=\"1.0\"?><!DOCTYPE databaseChangeLog><?build step=\"1\"?><databaseChangeLog/>";
    let doc = ChangelogDocument::parse(xml).expect("parse");
    let kinds: Vec<&str> = doc
        .nodes()
        .iter()
        .map(|node| match node {
            Node::DocType(_) => "doctype",
            Node::ProcessingInstruction(_) => "pi",
            Node::Element(_) => "element",
            Node::Comment(_) => "comment",
            Node::Text(_) => "text",
            Node::CData(_) => "cdata",
        })
        .collect();
    assert_eq!(kinds, vec!["doctype", "pi", "element"]);
}
