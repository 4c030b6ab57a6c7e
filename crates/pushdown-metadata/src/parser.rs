//! Registry of section sub-parsers and the document-level parse.
//!
//! The registry is an ordered list of `(section key, function)` pairs. Each
//! registered section present in the document is parsed against the schema;
//! the resulting fragments are merged into one [`CapabilityIndex`].

use crate::error::MetadataError;
use crate::filter::parse_filter_section;
use crate::group::parse_group_section;
use crate::odata::parse_odata_section;
use crate::sort::parse_sort_section;
use pushdown_model::{CapabilityFragment, CapabilityIndex, TableSchema};
use serde_json::Value;

/// Document section keys understood by [`MetadataParser::standard`].
pub mod section {
    pub const SORT: &str = "sort";
    pub const FILTER: &str = "filter";
    pub const GROUP: &str = "group";
    pub const ODATA: &str = "odata";
}

/// Translates one document section into a capability fragment.
pub type SectionParser = fn(&Value, &TableSchema) -> Result<CapabilityFragment, MetadataError>;

#[derive(Debug, Clone, Default)]
pub struct MetadataParser {
    parsers: Vec<(String, SectionParser)>,
}

impl MetadataParser {
    /// An empty registry; every document parses to an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sort, filter, group and OData sub-parsers, in that order.
    pub fn standard() -> Self {
        let mut parser = Self::new();
        parser
            .register(section::SORT, parse_sort_section)
            .register(section::FILTER, parse_filter_section)
            .register(section::GROUP, parse_group_section)
            .register(section::ODATA, parse_odata_section);
        parser
    }

    /// Add a sub-parser. Re-registering a section replaces its parser in place.
    pub fn register(&mut self, section: impl Into<String>, parser: SectionParser) -> &mut Self {
        let section = section.into();
        match self.parsers.iter_mut().find(|(key, _)| *key == section) {
            Some(slot) => slot.1 = parser,
            None => self.parsers.push((section, parser)),
        }
        self
    }

    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.parsers.iter().map(|(key, _)| key.as_str())
    }

    /// Parse a document against `schema`.
    ///
    /// Missing sections contribute nothing; sections without a registered
    /// parser are ignored. The first structural error aborts the parse.
    pub fn parse(
        &self,
        document: &Value,
        schema: &TableSchema,
    ) -> Result<CapabilityIndex, MetadataError> {
        let root = document.as_object().ok_or_else(|| {
            MetadataError::structure("$", "capability document must be a JSON object")
        })?;

        let mut fragments = Vec::with_capacity(self.parsers.len());
        for (key, parser) in &self.parsers {
            let Some(section) = root.get(key.as_str()) else {
                continue;
            };
            let fragment = parser(section, schema)?;
            tracing::trace!(section = key.as_str(), columns = fragment.len(), "parsed section");
            fragments.push(fragment);
        }

        let index = CapabilityIndex::build(schema, fragments);
        tracing::debug!(
            columns = index.len(),
            digest = %index.digest(),
            "built capability index"
        );
        Ok(index)
    }

    pub fn parse_str(
        &self,
        document: &str,
        schema: &TableSchema,
    ) -> Result<CapabilityIndex, MetadataError> {
        let value: Value = serde_json::from_str(document)?;
        self.parse(&value, schema)
    }
}

/// Parse with the standard section registry.
pub fn parse_capability_document(
    document: &Value,
    schema: &TableSchema,
) -> Result<CapabilityIndex, MetadataError> {
    MetadataParser::standard().parse(document, schema)
}
