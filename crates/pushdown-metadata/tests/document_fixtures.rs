//! Integration tests: parse capability-document fixtures.
//!
//! Each fixture in tests/fixtures/ has:
//! - schema.json: the authoritative table schema
//! - document.json: the capability document
//! - expect.json: the expected canonical index projection

use pushdown_metadata::{MetadataParser, parse_capability_document};
use pushdown_model::{CapabilityKind, ColumnPath, TableSchema};
use serde_json::{Value, json};
use std::path::PathBuf;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn read_json(name: &str, file: &str) -> Value {
    let path = fixtures_dir().join(name).join(file);
    let text = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()));
    serde_json::from_str(&text).unwrap_or_else(|e| panic!("failed to parse {}: {e}", path.display()))
}

fn run_fixture(name: &str) {
    let schema = TableSchema::from_json(&read_json(name, "schema.json"))
        .unwrap_or_else(|e| panic!("invalid schema in {name}: {e}"));
    let document = read_json(name, "document.json");
    let expected = read_json(name, "expect.json");

    let index = parse_capability_document(&document, &schema)
        .unwrap_or_else(|e| panic!("fixture {name} failed to parse: {e}"));
    let actual = index.to_json();

    assert_eq!(
        actual,
        expected,
        "\n\nFixture: {name}\n\nGot:\n{}\n\nExpected:\n{}\n",
        serde_json::to_string_pretty(&actual).unwrap(),
        serde_json::to_string_pretty(&expected).unwrap(),
    );
}

#[test]
fn sort_name_amount() {
    run_fixture("sort_name_amount");
}

#[test]
fn merged_sections() {
    run_fixture("merged_sections");
}

#[test]
fn unknown_columns_dropped() {
    run_fixture("unknown_columns_dropped");
}

#[test]
fn parsing_twice_yields_equal_indices() {
    for name in ["sort_name_amount", "merged_sections", "unknown_columns_dropped"] {
        let schema = TableSchema::from_json(&read_json(name, "schema.json")).expect("schema");
        let document = read_json(name, "document.json");
        let parser = MetadataParser::standard();
        let first = parser.parse(&document, &schema).expect("first parse");
        let second = parser.parse(&document, &schema).expect("second parse");
        assert_eq!(first, second, "fixture {name}");
        assert_eq!(first.digest(), second.digest(), "fixture {name}");
    }
}

#[test]
fn no_capability_is_ever_asserted_for_unknown_columns() {
    let schema = TableSchema::from_json(&json!({
        "columns": [ { "name": "Name", "kind": "string" } ]
    }))
    .expect("schema");
    let document = json!({
        "sort": [ { "column": "Ghost" } ],
        "filter": [ { "column": "Ghost" } ],
        "group": [ "Ghost" ],
        "odata": {
            "SortRestrictions": { "AscendingOnlyProperties": ["Ghost"] },
            "FilterRestrictions": {},
            "GroupRestrictions": {}
        }
    });
    let index = parse_capability_document(&document, &schema).expect("parse");
    let ghost = ColumnPath::column("Ghost");
    for kind in CapabilityKind::ALL {
        assert!(!index.supports(&ghost, kind), "Ghost must not support {kind}");
    }
    assert!(index.column(&ghost).is_none());
    assert!(index.supports(&ColumnPath::column("Name"), CapabilityKind::Sort));
}

#[test]
fn columns_missing_from_sort_section_are_never_sortable() {
    let schema = TableSchema::from_json(&read_json("sort_name_amount", "schema.json"))
        .expect("schema");
    let index = parse_capability_document(
        &json!({ "sort": [ { "column": "Name" } ], "group": ["Amount"] }),
        &schema,
    )
    .expect("parse");
    assert!(!index.sort().is_sortable(&ColumnPath::column("Amount")));
    assert!(index.group().supports(&ColumnPath::column("Amount")));
}

#[test]
fn absent_sections_are_not_errors() {
    let schema = TableSchema::from_json(&read_json("sort_name_amount", "schema.json"))
        .expect("schema");
    let index = parse_capability_document(&json!({}), &schema).expect("empty document");
    assert!(index.is_empty());
    assert!(index.table_capabilities().is_empty());
}
