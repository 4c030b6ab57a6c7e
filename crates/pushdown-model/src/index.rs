//! Per-column capability records and the aggregated capability index.
//!
//! ```text
//! CapabilityFragment*   ← one per document section, unvalidated
//!     │  build(schema, fragments)
//! CapabilityIndex       ← schema-filtered, merged, immutable
//!     ├── SortIndex     ← supports(path, kind), ascending_only(path)
//!     ├── FilterIndex   ← supports(path), operators(path)
//!     └── GroupIndex    ← supports(path)
//! ```
//!
//! There is no `&mut` API on [`CapabilityIndex`]; a refreshed document yields
//! a new index instead.

use crate::capability::{CapabilityKind, CapabilitySet, FilterOperator};
use crate::column_path::ColumnPath;
use crate::schema::TableSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};

const INDEX_DIGEST_PREFIX: &str = "ci1_";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnCapabilities {
    pub kinds: CapabilitySet,
    /// Sort may only be delegated in ascending order.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub ascending_only: bool,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub filter_operators: BTreeSet<FilterOperator>,
}

impl ColumnCapabilities {
    pub fn sortable(ascending_only: bool) -> Self {
        Self {
            kinds: CapabilitySet::SORT,
            ascending_only,
            filter_operators: BTreeSet::new(),
        }
    }

    pub fn filterable(operators: impl IntoIterator<Item = FilterOperator>) -> Self {
        Self {
            kinds: CapabilitySet::FILTER,
            ascending_only: false,
            filter_operators: operators.into_iter().collect(),
        }
    }

    pub fn groupable() -> Self {
        Self {
            kinds: CapabilitySet::GROUP,
            ..Self::default()
        }
    }

    pub fn supports(&self, kind: CapabilityKind) -> bool {
        self.kinds.contains(kind)
    }

    /// Union of kinds and operators; ascending-only wins when either side
    /// asserts it for a sortable column.
    pub fn merge(&mut self, other: &ColumnCapabilities) {
        self.kinds |= other.kinds;
        self.ascending_only |= other.ascending_only;
        self.filter_operators
            .extend(other.filter_operators.iter().copied());
    }
}

/// Capabilities contributed by one document section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilityFragment {
    columns: BTreeMap<ColumnPath, ColumnCapabilities>,
}

impl CapabilityFragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: ColumnPath, capabilities: ColumnCapabilities) {
        self.columns
            .entry(path)
            .and_modify(|existing| existing.merge(&capabilities))
            .or_insert(capabilities);
    }

    pub fn merge(&mut self, other: CapabilityFragment) {
        for (path, capabilities) in other.columns {
            self.insert(path, capabilities);
        }
    }

    pub fn get(&self, path: &ColumnPath) -> Option<&ColumnCapabilities> {
        self.columns.get(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ColumnPath, &ColumnCapabilities)> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Sort sub-index contract shared by parsed indices and entity metadata.
pub trait SortMetadata {
    fn supports(&self, path: &ColumnPath, kind: CapabilityKind) -> bool;
    fn ascending_only(&self, path: &ColumnPath) -> bool;
}

/// Delegation metadata as seen by the decision engine.
///
/// [`CapabilityIndex`] implements it; entity-bound tables may supply their
/// own implementation.
pub trait DelegationMetadata: Send + Sync {
    fn table_capabilities(&self) -> CapabilitySet;
    fn sort_metadata(&self) -> &dyn SortMetadata;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortIndex {
    /// Sortable columns mapped to their ascending-only flag.
    columns: BTreeMap<ColumnPath, bool>,
}

impl SortIndex {
    pub fn is_sortable(&self, path: &ColumnPath) -> bool {
        self.columns.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl SortMetadata for SortIndex {
    fn supports(&self, path: &ColumnPath, kind: CapabilityKind) -> bool {
        kind == CapabilityKind::Sort && self.is_sortable(path)
    }

    fn ascending_only(&self, path: &ColumnPath) -> bool {
        self.columns.get(path).copied().unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterIndex {
    columns: BTreeMap<ColumnPath, BTreeSet<FilterOperator>>,
}

impl FilterIndex {
    pub fn supports(&self, path: &ColumnPath) -> bool {
        self.columns.contains_key(path)
    }

    pub fn supports_operator(&self, path: &ColumnPath, op: FilterOperator) -> bool {
        self.columns
            .get(path)
            .is_some_and(|operators| operators.contains(&op))
    }

    pub fn operators(&self, path: &ColumnPath) -> Option<&BTreeSet<FilterOperator>> {
        self.columns.get(path)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupIndex {
    columns: BTreeSet<ColumnPath>,
}

impl GroupIndex {
    pub fn supports(&self, path: &ColumnPath) -> bool {
        self.columns.contains(path)
    }
}

/// Immutable, schema-validated capability index for one data source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilityIndex {
    columns: BTreeMap<ColumnPath, ColumnCapabilities>,
    table: CapabilitySet,
    sort: SortIndex,
    filter: FilterIndex,
    group: GroupIndex,
}

impl CapabilityIndex {
    /// Merge `fragments` and keep only entries whose path exists in `schema`.
    pub fn build<I>(schema: &TableSchema, fragments: I) -> Self
    where
        I: IntoIterator<Item = CapabilityFragment>,
    {
        let mut merged = CapabilityFragment::new();
        for fragment in fragments {
            merged.merge(fragment);
        }

        let mut index = CapabilityIndex::default();
        for (path, capabilities) in merged.columns {
            if !schema.contains(&path) || capabilities.kinds.is_empty() {
                continue;
            }
            index.table |= capabilities.kinds;
            if capabilities.supports(CapabilityKind::Sort) {
                index
                    .sort
                    .columns
                    .insert(path.clone(), capabilities.ascending_only);
            }
            if capabilities.supports(CapabilityKind::Filter) {
                index
                    .filter
                    .columns
                    .insert(path.clone(), capabilities.filter_operators.clone());
            }
            if capabilities.supports(CapabilityKind::Group) {
                index.group.columns.insert(path.clone());
            }
            index.columns.insert(path, capabilities);
        }
        index
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn column(&self, path: &ColumnPath) -> Option<&ColumnCapabilities> {
        self.columns.get(path)
    }

    pub fn columns(&self) -> impl Iterator<Item = (&ColumnPath, &ColumnCapabilities)> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn supports(&self, path: &ColumnPath, kind: CapabilityKind) -> bool {
        self.columns
            .get(path)
            .is_some_and(|capabilities| capabilities.supports(kind))
    }

    /// Union of every column's kinds.
    pub fn table_capabilities(&self) -> CapabilitySet {
        self.table
    }

    pub fn sort(&self) -> &SortIndex {
        &self.sort
    }

    pub fn filter(&self) -> &FilterIndex {
        &self.filter
    }

    pub fn group(&self) -> &GroupIndex {
        &self.group
    }

    /// Canonical JSON projection (columns in path order).
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self.wire()).unwrap_or(Value::Null)
    }

    /// Content digest: `ci1_` + lowercase hex SHA-256 of the canonical JSON.
    ///
    /// Two indices are structurally equal exactly when their digests match.
    pub fn digest(&self) -> String {
        let bytes = serde_json::to_vec(&self.wire()).unwrap_or_default();
        let hash = Sha256::digest(&bytes);
        let hex: String = hash.iter().map(|byte| format!("{byte:02x}")).collect();
        format!("{INDEX_DIGEST_PREFIX}{hex}")
    }

    fn wire(&self) -> IndexWire<'_> {
        IndexWire {
            table_capabilities: self.table,
            columns: self
                .columns
                .iter()
                .map(|(path, capabilities)| IndexRow { path, capabilities })
                .collect(),
        }
    }
}

impl DelegationMetadata for CapabilityIndex {
    fn table_capabilities(&self) -> CapabilitySet {
        self.table
    }

    fn sort_metadata(&self) -> &dyn SortMetadata {
        &self.sort
    }
}

impl Serialize for CapabilityIndex {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.wire().serialize(serializer)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IndexWire<'a> {
    table_capabilities: CapabilitySet,
    columns: Vec<IndexRow<'a>>,
}

#[derive(Serialize)]
struct IndexRow<'a> {
    path: &'a ColumnPath,
    #[serde(flatten)]
    capabilities: &'a ColumnCapabilities,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Column, ScalarKind};
    use serde_json::json;

    fn schema() -> TableSchema {
        TableSchema::new(vec![
            Column::scalar("Name", ScalarKind::String),
            Column::scalar("Amount", ScalarKind::Number),
        ])
        .expect("schema")
    }

    fn sort_fragment(entries: &[(&str, bool)]) -> CapabilityFragment {
        let mut fragment = CapabilityFragment::new();
        for (name, ascending_only) in entries {
            fragment.insert(
                ColumnPath::column(*name),
                ColumnCapabilities::sortable(*ascending_only),
            );
        }
        fragment
    }

    #[test]
    fn build_drops_columns_absent_from_schema() {
        let index = CapabilityIndex::build(
            &schema(),
            [sort_fragment(&[("Name", true), ("Ghost", false)])],
        );
        assert!(index.supports(&ColumnPath::column("Name"), CapabilityKind::Sort));
        assert!(index.column(&ColumnPath::column("Ghost")).is_none());
        assert!(!index.sort().is_sortable(&ColumnPath::column("Ghost")));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn merge_unions_kinds_and_keeps_ascending_only() {
        let mut filter = CapabilityFragment::new();
        filter.insert(
            ColumnPath::column("Name"),
            ColumnCapabilities::filterable([FilterOperator::Eq]),
        );
        let index = CapabilityIndex::build(
            &schema(),
            [
                sort_fragment(&[("Name", false)]),
                filter,
                sort_fragment(&[("Name", true)]),
            ],
        );
        let name = ColumnPath::column("Name");
        let caps = index.column(&name).expect("name entry");
        assert!(caps.supports(CapabilityKind::Sort));
        assert!(caps.supports(CapabilityKind::Filter));
        assert!(index.sort().ascending_only(&name));
        assert!(index.filter().supports_operator(&name, FilterOperator::Eq));
        assert!(!index.group().supports(&name));
        assert_eq!(
            index.table_capabilities(),
            CapabilitySet::SORT | CapabilitySet::FILTER
        );
    }

    #[test]
    fn sort_index_answers_only_for_sort_kind() {
        let index = CapabilityIndex::build(&schema(), [sort_fragment(&[("Amount", false)])]);
        let amount = ColumnPath::column("Amount");
        let sort: &dyn SortMetadata = index.sort_metadata();
        assert!(sort.supports(&amount, CapabilityKind::Sort));
        assert!(!sort.supports(&amount, CapabilityKind::Filter));
        assert!(!sort.ascending_only(&amount));
        assert!(!sort.supports(&ColumnPath::column("Name"), CapabilityKind::Sort));
    }

    #[test]
    fn digest_and_json_are_deterministic() {
        let first = CapabilityIndex::build(
            &schema(),
            [sort_fragment(&[("Amount", false), ("Name", true)])],
        );
        let second = CapabilityIndex::build(
            &schema(),
            [sort_fragment(&[("Name", true)]), sort_fragment(&[("Amount", false)])],
        );
        assert_eq!(first, second);
        assert_eq!(first.digest(), second.digest());
        assert!(first.digest().starts_with("ci1_"));
        assert_ne!(first.digest(), CapabilityIndex::empty().digest());
        assert_eq!(
            first.to_json(),
            json!({
                "tableCapabilities": ["sort"],
                "columns": [
                    { "path": ["Amount"], "kinds": ["sort"] },
                    { "path": ["Name"], "kinds": ["sort"], "ascendingOnly": true }
                ]
            })
        );
    }

    #[test]
    fn filter_operators_serialize_in_declaration_order() {
        let mut fragment = CapabilityFragment::new();
        fragment.insert(
            ColumnPath::column("Amount"),
            ColumnCapabilities::filterable([FilterOperator::Ge, FilterOperator::Gt]),
        );
        let index = CapabilityIndex::build(&schema(), [fragment]);
        insta::assert_json_snapshot!(index, @r#"
        {
          "tableCapabilities": [
            "filter"
          ],
          "columns": [
            {
              "path": [
                "Amount"
              ],
              "kinds": [
                "filter"
              ],
              "filterOperators": [
                "gt",
                "ge"
              ]
            }
          ]
        }
        "#);
    }
}
