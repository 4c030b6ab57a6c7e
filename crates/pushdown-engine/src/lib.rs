//! # Pushdown Engine
//!
//! Decides whether a table-transformation call can be delegated to the data
//! source it reads from.
//!
//! ```text
//! CallNode ── DelegationEngine ── FunctionCatalog ── FunctionDescriptor.check
//!                   │
//!          DelegationContext { binder, sources, features, sink }
//!                   │
//!  DataSourceRegistry ── entity metadata | DataSourceDescriptor (Arc<CapabilityIndex>)
//! ```
//!
//! A decision is a `bool`. A negative decision also pushes one
//! [`DiagnosticEvent`] naming the reason; nothing is mutated otherwise.

pub mod binder;
pub mod catalog;
pub mod comparator;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod engine;
pub mod node;
pub mod sort;
pub mod sort_order;
pub mod source;

pub use binder::{Binder, SchemaBinder};
pub use catalog::{DelegationCheck, FunctionCatalog, FunctionDescriptor};
pub use comparator::{ComparatorId, comparator_id, sort_comparator_mapping};
pub use config::{ConfigError, EngineConfig, FeatureFlags};
pub use context::{CapabilitySource, DelegationContext, SourceResolution};
pub use diagnostics::{
    DelegationHint, DelegationStatus, DiagnosticEvent, DiagnosticSink, TracingSink, VecSink,
};
pub use engine::DelegationEngine;
pub use node::{CallNode, Node};
pub use sort_order::{SORT_ORDER_ENUM, SortOrder, is_order_supported, resolve_sort_order};
pub use source::{DataSourceDescriptor, DataSourceRegistry, RegisteredSource};
