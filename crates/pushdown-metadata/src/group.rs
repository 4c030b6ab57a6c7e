//! `group` section: an array of column references, either bare
//! (`"Name"`, `["Address", "City"]`) or wrapped (`{ "column": <path> }`).

use crate::common::{column_path, expect_array, known_column};
use crate::error::MetadataError;
use crate::parser::section;
use pushdown_model::{CapabilityFragment, ColumnCapabilities, TableSchema};
use serde_json::Value;

pub fn parse_group_section(
    value: &Value,
    schema: &TableSchema,
) -> Result<CapabilityFragment, MetadataError> {
    let mut fragment = CapabilityFragment::new();
    for (idx, item) in expect_array(value, section::GROUP)?.iter().enumerate() {
        let path = format!("{}[{idx}]", section::GROUP);
        let column = match item {
            Value::Object(obj) => {
                let column_value = obj
                    .get("column")
                    .ok_or_else(|| MetadataError::structure(&path, "missing `column`"))?;
                column_path(column_value, &format!("{path}.column"))?
            }
            other => column_path(other, &path)?,
        };
        if known_column(schema, &column, section::GROUP) {
            fragment.insert(column, ColumnCapabilities::groupable());
        }
    }
    Ok(fragment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pushdown_model::{CapabilityKind, Column, ColumnPath, ScalarKind};
    use serde_json::json;

    #[test]
    fn bare_and_wrapped_references_are_both_accepted() {
        let address = TableSchema::new(vec![Column::scalar("City", ScalarKind::String)])
            .expect("address schema");
        let schema = TableSchema::new(vec![
            Column::scalar("Name", ScalarKind::String),
            Column::record("Address", address),
        ])
        .expect("schema");
        let fragment = parse_group_section(
            &json!(["Name", { "column": ["Address", "City"] }, "Address/City"]),
            &schema,
        )
        .expect("parse group section");
        assert!(fragment
            .get(&ColumnPath::column("Name"))
            .is_some_and(|caps| caps.supports(CapabilityKind::Group)));
        assert!(fragment
            .get(&ColumnPath::from_segments(["Address", "City"]))
            .is_some());
        // `/` is only a separator in OData property paths.
        assert_eq!(fragment.len(), 2);
    }
}
