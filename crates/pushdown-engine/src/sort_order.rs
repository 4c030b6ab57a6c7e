//! Sort-order tokens and the validator that recovers them from order
//! argument nodes.

use crate::binder::Binder;
use crate::node::Node;
use pushdown_model::{ColumnPath, SortMetadata};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the enum whose members spell sort orders, as in `SortOrder.Descending`.
pub const SORT_ORDER_ENUM: &str = "SortOrder";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    /// Case-insensitive exact match; accepts `asc` and `desc`.
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "ascending" | "asc" => Some(SortOrder::Ascending),
            "descending" | "desc" => Some(SortOrder::Descending),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Ascending => "ascending",
            SortOrder::Descending => "descending",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Statically recover the sort order an order argument denotes.
pub fn resolve_sort_order(node: &Node, binder: &dyn Binder) -> Option<SortOrder> {
    let constant = || {
        binder
            .constant_string(node)
            .and_then(|value| SortOrder::parse(&value))
    };
    match node {
        Node::StrLit { value } => SortOrder::parse(value),
        Node::FirstName { name } => SortOrder::parse(name).or_else(constant),
        Node::DottedName { left, right } => {
            let enum_member = match left.as_ref() {
                Node::FirstName { name } if name == SORT_ORDER_ENUM => SortOrder::parse(right),
                _ => None,
            };
            enum_member.or_else(constant)
        }
        Node::Call(_) => constant(),
        Node::NumLit { .. } | Node::BoolLit { .. } | Node::BinaryOp { .. } => None,
    }
}

/// Descending is refused only for ascending-only columns. The model has no way
/// to restrict ascending order on a sortable column.
pub fn is_order_supported(order: SortOrder, metadata: &dyn SortMetadata, column: &ColumnPath) -> bool {
    match order {
        SortOrder::Ascending => true,
        SortOrder::Descending => !metadata.ascending_only(column),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::SchemaBinder;
    use pushdown_model::{Column, ScalarKind, TableSchema};

    fn binder() -> SchemaBinder {
        let schema = TableSchema::new(vec![Column::scalar("Name", ScalarKind::String)])
            .expect("schema");
        SchemaBinder::new("T", schema)
            .with_constant("Direction", "DESC")
            .with_constant("Label", "newest first")
    }

    #[test]
    fn tokens_are_case_insensitive_with_abbreviations() {
        assert_eq!(SortOrder::parse("Descending"), Some(SortOrder::Descending));
        assert_eq!(SortOrder::parse("ASC"), Some(SortOrder::Ascending));
        assert_eq!(SortOrder::parse("desc"), Some(SortOrder::Descending));
        assert_eq!(SortOrder::parse("down"), None);
        assert_eq!(SortOrder::parse(" desc "), None);
        assert_eq!(SortOrder::parse("Descending\t"), None);
        assert_eq!(SortOrder::parse(""), None);
    }

    #[test]
    fn validator_follows_node_shape() {
        let binder = binder();
        let resolve = |node: Node| resolve_sort_order(&node, &binder);

        assert_eq!(resolve(Node::str_lit("descending")), Some(SortOrder::Descending));
        assert_eq!(resolve(Node::str_lit("sideways")), None);
        assert_eq!(resolve(Node::first_name("Ascending")), Some(SortOrder::Ascending));
        assert_eq!(resolve(Node::first_name("Direction")), Some(SortOrder::Descending));
        assert_eq!(resolve(Node::first_name("Label")), None);
        assert_eq!(
            resolve(Node::dotted(Node::first_name(SORT_ORDER_ENUM), "Descending")),
            Some(SortOrder::Descending)
        );
        assert_eq!(
            resolve(Node::dotted(Node::first_name("Other"), "Descending")),
            None
        );
        assert_eq!(resolve(Node::call("Direction", vec![])), Some(SortOrder::Descending));
        assert_eq!(resolve(Node::call("f", vec![])), None);
        assert_eq!(resolve(Node::NumLit { value: 1.0 }), None);
    }

    #[test]
    fn ascending_is_supported_even_on_ascending_only_columns() {
        let index = pushdown_metadata::parse_capability_document(
            &serde_json::json!({ "sort": [{ "column": "Name", "ascendingOnly": true }] }),
            binder().schema(),
        )
        .expect("index");
        let name = ColumnPath::column("Name");
        assert!(is_order_supported(SortOrder::Ascending, index.sort(), &name));
        assert!(!is_order_supported(SortOrder::Descending, index.sort(), &name));
    }
}
