//! # Pushdown Model
//!
//! The capability model consulted by delegation decisions: which table and
//! column operations a remote data source declares it can execute itself.
//!
//! ## Architecture
//!
//! ```text
//! TableSchema           ← Authoritative columns (name, scalar kind, option set)
//!     │
//! ColumnPath            ← Root-relative column addresses
//!     │
//! CapabilityFragment    ← One document section's per-column claims
//!     │
//! CapabilityIndex       ← Merged, schema-filtered, immutable
//!     │
//! Sort/Filter/GroupIndex← Per-kind sub-indices
//! ```

pub mod capability;
pub mod column_path;
pub mod error;
pub mod index;
pub mod schema;

pub use capability::{CapabilityKind, CapabilitySet, FilterOperator};
pub use column_path::ColumnPath;
pub use error::SchemaError;
pub use index::{
    CapabilityFragment, CapabilityIndex, ColumnCapabilities, DelegationMetadata, FilterIndex,
    GroupIndex, SortIndex, SortMetadata,
};
pub use schema::{Column, ColumnType, ScalarKind, TableSchema};
