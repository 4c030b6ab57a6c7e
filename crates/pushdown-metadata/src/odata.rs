//! `odata` section: adapter from OData capability annotations.
//!
//! ```json
//! { "SortRestrictions":   { "Sortable": true, "NonSortableProperties": ["Notes"],
//!                           "AscendingOnlyProperties": ["Name"] },
//!   "FilterRestrictions": { "Filterable": true, "NonFilterableProperties": [] },
//!   "GroupRestrictions":  { "Groupable": false } }
//! ```
//!
//! A restriction object that is present grants its kind to every scalar leaf
//! column of the schema except the listed properties, unless its boolean is
//! `false`. Absent restriction objects grant nothing.

use crate::common::{expect_array, expect_object, optional_bool, property_path};
use crate::error::MetadataError;
use crate::parser::section;
use pushdown_model::{
    CapabilityFragment, ColumnCapabilities, ColumnPath, FilterOperator, TableSchema,
};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

const SORT_RESTRICTIONS: &str = "SortRestrictions";
const FILTER_RESTRICTIONS: &str = "FilterRestrictions";
const GROUP_RESTRICTIONS: &str = "GroupRestrictions";

pub fn parse_odata_section(
    value: &Value,
    schema: &TableSchema,
) -> Result<CapabilityFragment, MetadataError> {
    let obj = expect_object(value, section::ODATA)?;
    let leaves = schema.scalar_leaf_paths();
    let mut fragment = CapabilityFragment::new();

    if let Some(restrictions) = restriction(obj, SORT_RESTRICTIONS)? {
        let path = format!("{}.{SORT_RESTRICTIONS}", section::ODATA);
        let excluded = property_set(restrictions, "NonSortableProperties", &path)?;
        let ascending_only = property_set(restrictions, "AscendingOnlyProperties", &path)?;
        if optional_bool(restrictions, "Sortable", &path)?.unwrap_or(true) {
            for leaf in leaves.iter().filter(|leaf| !excluded.contains(*leaf)) {
                fragment.insert(
                    leaf.clone(),
                    ColumnCapabilities::sortable(ascending_only.contains(leaf)),
                );
            }
        }
    }

    if let Some(restrictions) = restriction(obj, FILTER_RESTRICTIONS)? {
        let path = format!("{}.{FILTER_RESTRICTIONS}", section::ODATA);
        let excluded = property_set(restrictions, "NonFilterableProperties", &path)?;
        if optional_bool(restrictions, "Filterable", &path)?.unwrap_or(true) {
            for leaf in leaves.iter().filter(|leaf| !excluded.contains(*leaf)) {
                fragment.insert(
                    leaf.clone(),
                    ColumnCapabilities::filterable(FilterOperator::ALL),
                );
            }
        }
    }

    if let Some(restrictions) = restriction(obj, GROUP_RESTRICTIONS)? {
        let path = format!("{}.{GROUP_RESTRICTIONS}", section::ODATA);
        let excluded = property_set(restrictions, "UngroupableProperties", &path)?;
        if optional_bool(restrictions, "Groupable", &path)?.unwrap_or(true) {
            for leaf in leaves.iter().filter(|leaf| !excluded.contains(*leaf)) {
                fragment.insert(leaf.clone(), ColumnCapabilities::groupable());
            }
        }
    }

    Ok(fragment)
}

fn restriction<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
) -> Result<Option<&'a Map<String, Value>>, MetadataError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => expect_object(value, &format!("{}.{key}", section::ODATA)).map(Some),
    }
}

fn property_set(
    restrictions: &Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<BTreeSet<ColumnPath>, MetadataError> {
    let value = match restrictions.get(key) {
        None | Some(Value::Null) => return Ok(BTreeSet::new()),
        Some(value) => value,
    };
    let list_path = format!("{path}.{key}");
    expect_array(value, &list_path)?
        .iter()
        .enumerate()
        .map(|(idx, entry)| property_path(entry, &format!("{list_path}[{idx}]")))
        .collect()
}
