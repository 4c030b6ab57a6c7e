//! Table schemas and scalar column kinds.
//!
//! The schema is authoritative over any capability document: the index only
//! ever carries entries for paths that [`TableSchema::contains`] accepts.
//!
//! Wire form:
//!
//! ```json
//! { "columns": [
//!     { "name": "Name", "kind": "string" },
//!     { "name": "Status", "kind": "string", "optionSet": true },
//!     { "name": "Address", "record": { "columns": [ { "name": "City", "kind": "string" } ] } }
//! ] }
//! ```

use crate::column_path::ColumnPath;
use crate::error::SchemaError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

const ROOT_PARENT: &str = "<root>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScalarKind {
    Boolean,
    Number,
    Decimal,
    Currency,
    Date,
    Time,
    DateTime,
    Color,
    String,
    Guid,
    Hyperlink,
    Image,
    PenImage,
    Media,
    Blob,
}

impl ScalarKind {
    pub const ALL: [ScalarKind; 15] = [
        ScalarKind::Boolean,
        ScalarKind::Number,
        ScalarKind::Decimal,
        ScalarKind::Currency,
        ScalarKind::Date,
        ScalarKind::Time,
        ScalarKind::DateTime,
        ScalarKind::Color,
        ScalarKind::String,
        ScalarKind::Guid,
        ScalarKind::Hyperlink,
        ScalarKind::Image,
        ScalarKind::PenImage,
        ScalarKind::Media,
        ScalarKind::Blob,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnType {
    Scalar(ScalarKind),
    Record(TableSchema),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub ty: ColumnType,
    pub option_set: bool,
}

impl Column {
    pub fn scalar(name: impl Into<String>, kind: ScalarKind) -> Self {
        Self {
            name: name.into(),
            ty: ColumnType::Scalar(kind),
            option_set: false,
        }
    }

    /// A scalar column whose values come from an option set.
    pub fn option_set(name: impl Into<String>, kind: ScalarKind) -> Self {
        Self {
            option_set: true,
            ..Self::scalar(name, kind)
        }
    }

    pub fn record(name: impl Into<String>, fields: TableSchema) -> Self {
        Self {
            name: name.into(),
            ty: ColumnType::Record(fields),
            option_set: false,
        }
    }

    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        match self.ty {
            ColumnType::Scalar(kind) => Some(kind),
            ColumnType::Record(_) => None,
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self.ty, ColumnType::Scalar(_))
    }
}

/// Ordered, validated set of columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TableSpec", into = "TableSpec")]
pub struct TableSchema {
    columns: Vec<Column>,
}

impl TableSchema {
    /// Build a schema, rejecting empty or duplicate names at this level.
    ///
    /// Nested record schemas are already validated by their own `new` call.
    pub fn new(columns: Vec<Column>) -> Result<Self, SchemaError> {
        let mut seen = BTreeSet::new();
        for column in &columns {
            if column.name.trim().is_empty() {
                return Err(SchemaError::EmptyColumnName {
                    parent: ROOT_PARENT.to_string(),
                });
            }
            if !seen.insert(column.name.as_str()) {
                return Err(SchemaError::DuplicateColumn {
                    name: column.name.clone(),
                    parent: ROOT_PARENT.to_string(),
                });
            }
        }
        Ok(Self { columns })
    }

    pub fn from_json(value: &Value) -> Result<Self, SchemaError> {
        serde_json::from_value(value.clone()).map_err(|e| SchemaError::Payload(e.to_string()))
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    /// Resolve a root-relative path. The root path itself is not a column.
    pub fn resolve(&self, path: &ColumnPath) -> Option<&Column> {
        let (first, rest) = path.segments().split_first()?;
        let mut column = self.column(first)?;
        for segment in rest {
            let ColumnType::Record(fields) = &column.ty else {
                return None;
            };
            column = fields.column(segment)?;
        }
        Some(column)
    }

    pub fn contains(&self, path: &ColumnPath) -> bool {
        self.resolve(path).is_some()
    }

    /// Every scalar column at any depth, depth-first in declaration order.
    pub fn scalar_leaf_paths(&self) -> Vec<ColumnPath> {
        let mut out = Vec::new();
        collect_leaves(self, &ColumnPath::root(), &mut out);
        out
    }
}

fn collect_leaves(schema: &TableSchema, prefix: &ColumnPath, out: &mut Vec<ColumnPath>) {
    for column in &schema.columns {
        let path = prefix.append(column.name.clone());
        match &column.ty {
            ColumnType::Scalar(_) => out.push(path),
            ColumnType::Record(fields) => collect_leaves(fields, &path, out),
        }
    }
}

// ─── Wire form ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TableSpec {
    columns: Vec<ColumnSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ColumnSpec {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kind: Option<ScalarKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    record: Option<TableSpec>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    option_set: bool,
}

impl TryFrom<TableSpec> for TableSchema {
    type Error = SchemaError;

    fn try_from(spec: TableSpec) -> Result<Self, Self::Error> {
        let columns = spec
            .columns
            .into_iter()
            .map(Column::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        TableSchema::new(columns)
    }
}

impl TryFrom<ColumnSpec> for Column {
    type Error = SchemaError;

    fn try_from(spec: ColumnSpec) -> Result<Self, Self::Error> {
        let ty = match (spec.kind, spec.record) {
            (Some(kind), None) => ColumnType::Scalar(kind),
            (None, Some(record)) => {
                let fields = TableSchema::try_from(record).map_err(|err| reparent(err, &spec.name))?;
                ColumnType::Record(fields)
            }
            _ => return Err(SchemaError::AmbiguousColumnType { name: spec.name }),
        };
        Ok(Column {
            name: spec.name,
            ty,
            option_set: spec.option_set,
        })
    }
}

/// Prefix the error's parent with `record`, building a dotted path from the
/// outermost record down.
fn reparent(err: SchemaError, record: &str) -> SchemaError {
    let qualify = |parent: String| {
        if parent == ROOT_PARENT {
            record.to_string()
        } else {
            format!("{record}.{parent}")
        }
    };
    match err {
        SchemaError::EmptyColumnName { parent } => SchemaError::EmptyColumnName {
            parent: qualify(parent),
        },
        SchemaError::DuplicateColumn { name, parent } => SchemaError::DuplicateColumn {
            name,
            parent: qualify(parent),
        },
        other => other,
    }
}

impl From<TableSchema> for TableSpec {
    fn from(schema: TableSchema) -> Self {
        TableSpec {
            columns: schema.columns.into_iter().map(ColumnSpec::from).collect(),
        }
    }
}

impl From<Column> for ColumnSpec {
    fn from(column: Column) -> Self {
        let (kind, record) = match column.ty {
            ColumnType::Scalar(kind) => (Some(kind), None),
            ColumnType::Record(fields) => (None, Some(TableSpec::from(fields))),
        };
        ColumnSpec {
            name: column.name,
            kind,
            record,
            option_set: column.option_set,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nested() -> TableSchema {
        TableSchema::from_json(&json!({
            "columns": [
                { "name": "Name", "kind": "string" },
                { "name": "Status", "kind": "string", "optionSet": true },
                { "name": "Address", "record": { "columns": [
                    { "name": "City", "kind": "string" },
                    { "name": "Zip", "kind": "number" }
                ] } }
            ]
        }))
        .expect("valid nested schema")
    }

    #[test]
    fn resolves_nested_paths_and_rejects_walking_through_scalars() {
        let schema = nested();
        assert!(schema.contains(&ColumnPath::column("Name")));
        assert!(schema.contains(&ColumnPath::from_segments(["Address", "City"])));
        assert!(!schema.contains(&ColumnPath::from_segments(["Name", "City"])));
        assert!(!schema.contains(&ColumnPath::column("Missing")));
        assert!(!schema.contains(&ColumnPath::root()));
        assert!(schema.column("Status").expect("status").option_set);
    }

    #[test]
    fn scalar_leaves_follow_declaration_order() {
        let leaves: Vec<String> = nested()
            .scalar_leaf_paths()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(leaves, vec!["Name", "Status", "Address.City", "Address.Zip"]);
    }

    #[test]
    fn duplicate_and_ambiguous_columns_are_rejected() {
        let duplicate = TableSchema::from_json(&json!({
            "columns": [ { "name": "A", "kind": "number" }, { "name": "A", "kind": "string" } ]
        }));
        assert!(matches!(duplicate, Err(SchemaError::Payload(msg)) if msg.contains("duplicate column `A`")));

        let ambiguous = TableSchema::from_json(&json!({ "columns": [ { "name": "A" } ] }));
        assert!(matches!(ambiguous, Err(SchemaError::Payload(msg)) if msg.contains("exactly one")));

        let nested_dup = TableSchema::from_json(&json!({
            "columns": [ { "name": "R", "record": { "columns": [
                { "name": "x", "kind": "number" }, { "name": "x", "kind": "number" }
            ] } } ]
        }));
        assert!(matches!(nested_dup, Err(SchemaError::Payload(msg)) if msg.contains("under `R`")));

        let deep_dup = TableSchema::from_json(&json!({
            "columns": [ { "name": "P", "record": { "columns": [
                { "name": "R", "record": { "columns": [
                    { "name": "x", "kind": "number" }, { "name": "x", "kind": "number" }
                ] } }
            ] } } ]
        }));
        assert!(matches!(deep_dup, Err(SchemaError::Payload(msg)) if msg.contains("under `P.R`")));

        let empty = TableSchema::new(vec![Column::scalar(" ", ScalarKind::String)]);
        assert!(matches!(empty, Err(SchemaError::EmptyColumnName { .. })));
    }

    #[test]
    fn wire_form_round_trips_through_serde() {
        let schema = nested();
        let json = serde_json::to_value(&schema).expect("serialize schema");
        assert_eq!(json["columns"][1]["optionSet"], json!(true));
        assert!(json["columns"][0].get("optionSet").is_none());
        let back = TableSchema::from_json(&json).expect("reparse schema");
        assert_eq!(back, schema);
    }
}
