//! `sort` section: `[{ "column": <path>, "ascendingOnly"?: bool }]`.

use crate::common::{column_path, expect_array, expect_object, known_column, optional_bool};
use crate::error::MetadataError;
use crate::parser::section;
use pushdown_model::{CapabilityFragment, ColumnCapabilities, TableSchema};
use serde_json::Value;

pub fn parse_sort_section(
    value: &Value,
    schema: &TableSchema,
) -> Result<CapabilityFragment, MetadataError> {
    let mut fragment = CapabilityFragment::new();
    for (idx, item) in expect_array(value, section::SORT)?.iter().enumerate() {
        let path = format!("{}[{idx}]", section::SORT);
        let obj = expect_object(item, &path)?;
        let column_value = obj
            .get("column")
            .ok_or_else(|| MetadataError::structure(&path, "missing `column`"))?;
        let column = column_path(column_value, &format!("{path}.column"))?;
        let ascending_only = optional_bool(obj, "ascendingOnly", &path)?.unwrap_or(false);
        if known_column(schema, &column, section::SORT) {
            fragment.insert(column, ColumnCapabilities::sortable(ascending_only));
        }
    }
    Ok(fragment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pushdown_model::{CapabilityKind, Column, ColumnPath, ScalarKind};
    use serde_json::json;

    fn schema() -> TableSchema {
        TableSchema::new(vec![
            Column::scalar("Name", ScalarKind::String),
            Column::scalar("Amount", ScalarKind::Number),
        ])
        .expect("schema")
    }

    #[test]
    fn listed_columns_are_sortable_with_default_direction_flag() {
        let fragment = parse_sort_section(
            &json!([
                { "column": "Name", "ascendingOnly": true },
                { "column": "Amount" },
                { "column": "Ghost", "ascendingOnly": true }
            ]),
            &schema(),
        )
        .expect("parse sort section");
        let name = fragment.get(&ColumnPath::column("Name")).expect("name");
        assert!(name.supports(CapabilityKind::Sort));
        assert!(name.ascending_only);
        let amount = fragment.get(&ColumnPath::column("Amount")).expect("amount");
        assert!(!amount.ascending_only);
        assert!(fragment.get(&ColumnPath::column("Ghost")).is_none());
        assert_eq!(fragment.len(), 2);
    }

    #[test]
    fn wrong_shapes_are_structural_errors() {
        let cases = [
            (json!({ "column": "Name" }), "sort"),
            (json!(["Name"]), "sort[0]"),
            (json!([{ "ascendingOnly": true }]), "sort[0]"),
            (json!([{ "column": 3 }]), "sort[0].column"),
            (json!([{ "column": "Name", "ascendingOnly": "yes" }]), "sort[0].ascendingOnly"),
        ];
        for (section, expected_path) in cases {
            let err = parse_sort_section(&section, &schema()).expect_err("shape must fail");
            assert_eq!(err.path(), Some(expected_path), "section: {section}");
        }
    }
}
