//! Shape helpers shared by the section sub-parsers.

use crate::error::MetadataError;
use pushdown_model::{ColumnPath, TableSchema};
use serde_json::{Map, Value};

pub(crate) fn expect_array<'a>(value: &'a Value, path: &str) -> Result<&'a [Value], MetadataError> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| MetadataError::structure(path, "expected an array"))
}

pub(crate) fn expect_object<'a>(
    value: &'a Value,
    path: &str,
) -> Result<&'a Map<String, Value>, MetadataError> {
    value
        .as_object()
        .ok_or_else(|| MetadataError::structure(path, "expected an object"))
}

pub(crate) fn optional_bool(
    obj: &Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<Option<bool>, MetadataError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(flag)) => Ok(Some(*flag)),
        Some(_) => Err(MetadataError::structure(
            format!("{path}.{key}"),
            "expected a boolean",
        )),
    }
}

/// Column reference: a single name, or an array of name segments.
pub(crate) fn column_path(value: &Value, path: &str) -> Result<ColumnPath, MetadataError> {
    match value {
        Value::String(name) => {
            let name = name.trim();
            if name.is_empty() {
                return Err(MetadataError::structure(path, "column name must not be empty"));
            }
            Ok(ColumnPath::column(name))
        }
        Value::Array(segments) => segment_list(segments, path),
        _ => Err(MetadataError::structure(
            path,
            "expected a column name or an array of name segments",
        )),
    }
}

/// OData property path: `/`-separated segments, or an array of segments.
pub(crate) fn property_path(value: &Value, path: &str) -> Result<ColumnPath, MetadataError> {
    match value {
        Value::String(raw) => {
            let segments: Vec<&str> = raw.split('/').map(str::trim).collect();
            if segments.iter().any(|segment| segment.is_empty()) {
                return Err(MetadataError::structure(
                    path,
                    format!("invalid property path `{raw}`"),
                ));
            }
            Ok(ColumnPath::from_segments(segments))
        }
        Value::Array(segments) => segment_list(segments, path),
        _ => Err(MetadataError::structure(path, "expected a property path")),
    }
}

fn segment_list(segments: &[Value], path: &str) -> Result<ColumnPath, MetadataError> {
    if segments.is_empty() {
        return Err(MetadataError::structure(path, "column path must not be empty"));
    }
    let mut names = Vec::with_capacity(segments.len());
    for (idx, segment) in segments.iter().enumerate() {
        let name = segment
            .as_str()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                MetadataError::structure(format!("{path}[{idx}]"), "expected a non-empty name")
            })?;
        names.push(name);
    }
    Ok(ColumnPath::from_segments(names))
}

/// Schema authority: unknown columns are skipped, never asserted.
pub(crate) fn known_column(schema: &TableSchema, column: &ColumnPath, section: &str) -> bool {
    if schema.contains(column) {
        return true;
    }
    tracing::debug!(
        section,
        column = %column,
        "skipping capability entry for column absent from schema"
    );
    false
}
