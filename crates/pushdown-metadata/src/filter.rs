//! `filter` section: `[{ "column": <path>, "operators"?: [name] }]`.
//!
//! An entry without `operators` supports every [`FilterOperator`]. Operator
//! names are case-insensitive; names this crate does not know are skipped.

use crate::common::{column_path, expect_array, expect_object, known_column};
use crate::error::MetadataError;
use crate::parser::section;
use pushdown_model::{CapabilityFragment, ColumnCapabilities, FilterOperator, TableSchema};
use serde_json::Value;
use std::collections::BTreeSet;

pub fn parse_filter_section(
    value: &Value,
    schema: &TableSchema,
) -> Result<CapabilityFragment, MetadataError> {
    let mut fragment = CapabilityFragment::new();
    for (idx, item) in expect_array(value, section::FILTER)?.iter().enumerate() {
        let path = format!("{}[{idx}]", section::FILTER);
        let obj = expect_object(item, &path)?;
        let column_value = obj
            .get("column")
            .ok_or_else(|| MetadataError::structure(&path, "missing `column`"))?;
        let column = column_path(column_value, &format!("{path}.column"))?;
        let operators = match obj.get("operators") {
            None | Some(Value::Null) => FilterOperator::ALL.into_iter().collect(),
            Some(list) => parse_operators(list, &format!("{path}.operators"))?,
        };
        if known_column(schema, &column, section::FILTER) {
            fragment.insert(column, ColumnCapabilities::filterable(operators));
        }
    }
    Ok(fragment)
}

fn parse_operators(value: &Value, path: &str) -> Result<BTreeSet<FilterOperator>, MetadataError> {
    let mut operators = BTreeSet::new();
    for (idx, entry) in expect_array(value, path)?.iter().enumerate() {
        let name = entry.as_str().ok_or_else(|| {
            MetadataError::structure(format!("{path}[{idx}]"), "expected an operator name")
        })?;
        match FilterOperator::parse(name) {
            Some(op) => {
                operators.insert(op);
            }
            None => tracing::debug!(operator = name, "skipping unknown filter operator"),
        }
    }
    Ok(operators)
}
