//! Error types for capability-model construction.

/// Errors raised while building a [`TableSchema`](crate::schema::TableSchema).
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// A column (at any nesting level) has an empty or whitespace-only name.
    #[error("column name must not be empty (under `{parent}`)")]
    EmptyColumnName { parent: String },

    /// Two columns at the same level share a name.
    #[error("duplicate column `{name}` (under `{parent}`)")]
    DuplicateColumn { name: String, parent: String },

    /// A column declares neither or both of `kind` and `record`.
    #[error("column `{name}` must declare exactly one of `kind` or `record`")]
    AmbiguousColumnType { name: String },

    /// The schema payload is not valid JSON for a table description.
    #[error("invalid schema payload: {0}")]
    Payload(String),
}
