//! Comparator classes used when a sort runs locally, and the per-table
//! column → comparator mapping handed to the runtime.

use pushdown_model::{ScalarKind, TableSchema};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ComparatorId {
    /// `"0"`
    Boolean,
    /// `"1"`: numeric, temporal and color values.
    Ordinal,
    /// `"2"`: everything compared as text.
    Text,
}

impl ComparatorId {
    pub fn as_str(self) -> &'static str {
        match self {
            ComparatorId::Boolean => "0",
            ComparatorId::Ordinal => "1",
            ComparatorId::Text => "2",
        }
    }
}

impl fmt::Display for ComparatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn comparator_id(kind: ScalarKind) -> ComparatorId {
    match kind {
        ScalarKind::Boolean => ComparatorId::Boolean,
        ScalarKind::Number
        | ScalarKind::Decimal
        | ScalarKind::Currency
        | ScalarKind::Date
        | ScalarKind::Time
        | ScalarKind::DateTime
        | ScalarKind::Color => ComparatorId::Ordinal,
        ScalarKind::String
        | ScalarKind::Guid
        | ScalarKind::Hyperlink
        | ScalarKind::Image
        | ScalarKind::PenImage
        | ScalarKind::Media
        | ScalarKind::Blob => ComparatorId::Text,
    }
}

/// `{"Name":2,"Amount":1}` over top-level scalar columns in schema order.
/// Option-set and record columns are left out; names are JSON-escaped.
pub fn sort_comparator_mapping(schema: &TableSchema) -> String {
    let entries: Vec<String> = schema
        .columns()
        .iter()
        .filter(|column| !column.option_set)
        .filter_map(|column| {
            let kind = column.scalar_kind()?;
            let name = Value::String(column.name.clone());
            Some(format!("{name}:{}", comparator_id(kind)))
        })
        .collect();
    format!("{{{}}}", entries.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pushdown_model::Column;

    #[test]
    fn every_scalar_kind_has_a_comparator() {
        let ids: Vec<&str> = ScalarKind::ALL
            .into_iter()
            .map(|kind| comparator_id(kind).as_str())
            .collect();
        assert_eq!(
            ids,
            vec!["0", "1", "1", "1", "1", "1", "1", "1", "2", "2", "2", "2", "2", "2", "2"]
        );
    }

    #[test]
    fn mapping_skips_option_sets_and_records_and_escapes_names() {
        let address = TableSchema::new(vec![Column::scalar("City", ScalarKind::String)])
            .expect("record schema");
        let schema = TableSchema::new(vec![
            Column::scalar("Name", ScalarKind::String),
            Column::option_set("Status", ScalarKind::String),
            Column::record("Address", address),
            Column::scalar("Say \"hi\"", ScalarKind::Boolean),
            Column::scalar("Amount", ScalarKind::Number),
        ])
        .expect("schema");
        insta::assert_snapshot!(
            sort_comparator_mapping(&schema),
            @r#"{"Name":2,"Say \"hi\"":0,"Amount":1}"#
        );
        assert_eq!(sort_comparator_mapping(&TableSchema::default()), "{}");
    }
}
