//! Error types for capability document parsing.

/// A capability document could not be turned into an index.
///
/// Any of these aborts the whole parse; no partial index is produced.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// The document text is not JSON.
    #[error("capability document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The document, or one of its sections, has the wrong shape.
    #[error("malformed capability document at `{path}`: {message}")]
    Structure { path: String, message: String },
}

impl MetadataError {
    pub fn structure(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Structure {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Document location of a structural error, if any.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Structure { path, .. } => Some(path),
            Self::Json(_) => None,
        }
    }
}
