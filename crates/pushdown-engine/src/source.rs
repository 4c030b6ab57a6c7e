//! Data sources as seen by the engine: external descriptors that own a parsed
//! capability document, bound entities that carry their own metadata, and the
//! registry that maps table names to both.

use pushdown_metadata::{MetadataError, MetadataParser};
use pushdown_model::{CapabilityIndex, CapabilitySet, DelegationMetadata, TableSchema};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// An external data source with its parsed capability index.
///
/// The document is parsed once at construction. [`refresh`](Self::refresh)
/// parses a replacement and swaps it in; callers still holding the previous
/// `Arc<CapabilityIndex>` keep seeing it unchanged.
#[derive(Debug)]
pub struct DataSourceDescriptor {
    name: String,
    schema: TableSchema,
    parser: MetadataParser,
    index: RwLock<Arc<CapabilityIndex>>,
    declared: CapabilitySet,
    delegatable: bool,
}

impl DataSourceDescriptor {
    pub fn new(
        name: impl Into<String>,
        schema: TableSchema,
        document: &Value,
    ) -> Result<Self, MetadataError> {
        Self::with_parser(name, schema, document, MetadataParser::standard())
    }

    pub fn with_parser(
        name: impl Into<String>,
        schema: TableSchema,
        document: &Value,
        parser: MetadataParser,
    ) -> Result<Self, MetadataError> {
        let name = name.into();
        let index = parser.parse(document, &schema)?;
        tracing::debug!(
            source = %name,
            columns = index.len(),
            digest = %index.digest(),
            "capability document parsed"
        );
        Ok(Self {
            name,
            schema,
            parser,
            index: RwLock::new(Arc::new(index)),
            declared: CapabilitySet::READ,
            delegatable: true,
        })
    }

    /// Table-level permissions the source grants beyond what the document
    /// lists per column. Defaults to read.
    pub fn with_declared_capabilities(mut self, declared: CapabilitySet) -> Self {
        self.declared = declared;
        self
    }

    pub fn with_delegatable(mut self, delegatable: bool) -> Self {
        self.delegatable = delegatable;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    pub fn is_delegatable(&self) -> bool {
        self.delegatable
    }

    pub fn declared_capabilities(&self) -> CapabilitySet {
        self.declared
    }

    /// Current index. The returned handle stays valid across refreshes.
    pub fn index(&self) -> Arc<CapabilityIndex> {
        Arc::clone(&self.index.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Declared permissions plus every kind some column supports.
    pub fn table_capabilities(&self) -> CapabilitySet {
        self.declared | self.index().table_capabilities()
    }

    /// Parse `document` and replace the cached index. On error the previous
    /// index stays in place.
    pub fn refresh(&self, document: &Value) -> Result<(), MetadataError> {
        let next = Arc::new(self.parser.parse(document, &self.schema)?);
        tracing::debug!(
            source = %self.name,
            columns = next.len(),
            digest = %next.digest(),
            "capability document refreshed"
        );
        *self.index.write().unwrap_or_else(PoisonError::into_inner) = next;
        Ok(())
    }
}

/// What is bound under one table name.
#[derive(Clone, Default)]
pub struct RegisteredSource {
    pub entity: Option<Arc<dyn DelegationMetadata>>,
    pub external: Option<Arc<DataSourceDescriptor>>,
}

impl fmt::Debug for RegisteredSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredSource")
            .field("entity", &self.entity.is_some())
            .field("external", &self.external.as_ref().map(|d| d.name()))
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct DataSourceRegistry {
    sources: BTreeMap<String, RegisteredSource>,
}

impl DataSourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an external descriptor under its own name, replacing any
    /// earlier descriptor for that name.
    pub fn register_external(&mut self, descriptor: Arc<DataSourceDescriptor>) -> &mut Self {
        let name = descriptor.name().to_string();
        self.sources.entry(name).or_default().external = Some(descriptor);
        self
    }

    pub fn register_entity(
        &mut self,
        name: impl Into<String>,
        metadata: Arc<dyn DelegationMetadata>,
    ) -> &mut Self {
        self.sources.entry(name.into()).or_default().entity = Some(metadata);
        self
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredSource> {
        self.sources.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }
}
