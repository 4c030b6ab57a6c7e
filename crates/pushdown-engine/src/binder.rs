//! Binder contract: name resolution and asynchrony, answered per node.

use crate::node::Node;
use pushdown_model::{ColumnPath, TableSchema};
use std::collections::{BTreeMap, BTreeSet};

/// What the decision engine needs to know about an already-bound expression.
pub trait Binder {
    /// True when evaluating `node` (or any part of it) is asynchronous.
    fn is_async(&self, node: &Node) -> bool;

    /// Column the node resolves to in the row scope of the call's source.
    fn column_path(&self, node: &Node) -> Option<ColumnPath>;

    /// Compile-time string value of `node`, when the binder knows one.
    fn constant_string(&self, _node: &Node) -> Option<String> {
        None
    }

    /// Name of the table a source argument refers to.
    fn source_name(&self, node: &Node) -> Option<String>;
}

/// Binder over a single table.
///
/// Top-level column names resolve to column paths, the table name resolves
/// as a source, calls to registered async functions are asynchronous and
/// named constants (bare names or zero-argument calls) carry string values.
#[derive(Debug, Clone)]
pub struct SchemaBinder {
    table: String,
    schema: TableSchema,
    async_functions: BTreeSet<String>,
    constants: BTreeMap<String, String>,
}

impl SchemaBinder {
    pub fn new(table: impl Into<String>, schema: TableSchema) -> Self {
        Self {
            table: table.into(),
            schema,
            async_functions: BTreeSet::new(),
            constants: BTreeMap::new(),
        }
    }

    pub fn with_async_function(mut self, name: impl Into<String>) -> Self {
        self.async_functions.insert(name.into());
        self
    }

    pub fn with_constant(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.constants.insert(name.into(), value.into());
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }
}

impl Binder for SchemaBinder {
    fn is_async(&self, node: &Node) -> bool {
        if let Node::Call(call) = node {
            if self.async_functions.contains(&call.name) {
                return true;
            }
        }
        node.children().into_iter().any(|child| self.is_async(child))
    }

    fn column_path(&self, node: &Node) -> Option<ColumnPath> {
        match node {
            Node::FirstName { name } if self.schema.column(name).is_some() => {
                Some(ColumnPath::column(name.clone()))
            }
            _ => None,
        }
    }

    fn constant_string(&self, node: &Node) -> Option<String> {
        let name = match node {
            Node::FirstName { name } => name,
            Node::Call(call) if call.args.is_empty() => &call.name,
            _ => return None,
        };
        self.constants.get(name).cloned()
    }

    fn source_name(&self, node: &Node) -> Option<String> {
        match node {
            Node::FirstName { name } if *name == self.table => Some(name.clone()),
            _ => None,
        }
    }
}
