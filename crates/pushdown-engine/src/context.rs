//! Per-decision context and capability-source resolution.

use crate::binder::Binder;
use crate::config::FeatureFlags;
use crate::diagnostics::{DelegationHint, DelegationStatus, DiagnosticEvent, DiagnosticSink};
use crate::node::Node;
use crate::source::DataSourceRegistry;
use pushdown_model::{CapabilityIndex, CapabilityKind, CapabilitySet, DelegationMetadata, SortMetadata};
use std::fmt;
use std::sync::Arc;

/// Everything one decision reads, passed in by the caller.
pub struct DelegationContext<'a> {
    pub binder: &'a dyn Binder,
    pub sources: &'a DataSourceRegistry,
    pub features: FeatureFlags,
    pub sink: &'a mut dyn DiagnosticSink,
}

/// Where a decision reads column capabilities from.
#[derive(Clone)]
pub enum CapabilitySource {
    /// Metadata carried by a bound entity.
    Entity(Arc<dyn DelegationMetadata>),
    /// Index parsed from an external descriptor's document.
    External(Arc<CapabilityIndex>),
}

impl CapabilitySource {
    pub fn sort_metadata(&self) -> &dyn SortMetadata {
        match self {
            CapabilitySource::Entity(entity) => entity.sort_metadata(),
            CapabilitySource::External(index) => index.sort(),
        }
    }
}

impl fmt::Debug for CapabilitySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapabilitySource::Entity(_) => f.write_str("Entity"),
            CapabilitySource::External(index) => {
                f.debug_tuple("External").field(&index.digest()).finish()
            }
        }
    }
}

#[derive(Debug)]
pub enum SourceResolution {
    Resolved(CapabilitySource),
    Unavailable {
        /// An entity was bound under the source name but could not be used.
        entity_bound: bool,
    },
}

impl<'a> DelegationContext<'a> {
    pub fn new(
        binder: &'a dyn Binder,
        sources: &'a DataSourceRegistry,
        features: FeatureFlags,
        sink: &'a mut dyn DiagnosticSink,
    ) -> Self {
        Self {
            binder,
            sources,
            features,
            sink,
        }
    }

    /// Pick the capability source for `source` when it can serve `kind` and
    /// grants `required`.
    ///
    /// A bound entity wins when enhanced delegation is on and the entity
    /// supports array lookup. Otherwise a delegatable external descriptor is
    /// used if its table capabilities cover `kind` and `required`.
    pub fn capability_source(
        &self,
        source: &Node,
        kind: CapabilityKind,
        required: CapabilitySet,
    ) -> SourceResolution {
        let Some(registered) = self
            .binder
            .source_name(source)
            .and_then(|name| self.sources.get(&name))
        else {
            return SourceResolution::Unavailable {
                entity_bound: false,
            };
        };

        if let Some(entity) = &registered.entity {
            if self.features.enhanced_delegation
                && entity
                    .table_capabilities()
                    .contains(CapabilityKind::ArrayLookup)
            {
                return SourceResolution::Resolved(CapabilitySource::Entity(Arc::clone(entity)));
            }
        }

        if let Some(descriptor) = &registered.external {
            let index = descriptor.index();
            let table = descriptor.declared_capabilities() | index.table_capabilities();
            if descriptor.is_delegatable() && table.contains_all(required.with(kind)) {
                return SourceResolution::Resolved(CapabilitySource::External(index));
            }
        }

        SourceResolution::Unavailable {
            entity_bound: registered.entity.is_some(),
        }
    }

    /// Record a rejection and return the negative decision.
    pub fn reject(
        &mut self,
        status: DelegationStatus,
        function: &str,
        node: &dyn fmt::Display,
        hint: bool,
    ) -> bool {
        let event = DiagnosticEvent {
            status,
            function: function.to_string(),
            node: node.to_string(),
            hint: hint.then_some(DelegationHint::RestructureForDelegation),
        };
        tracing::debug!(
            status = status.as_str(),
            function,
            node = %event.node,
            "delegation check failed"
        );
        self.sink.push(event);
        false
    }
}
