//! # Pushdown Metadata
//!
//! Turns an externally supplied capability document into a
//! [`CapabilityIndex`](pushdown_model::CapabilityIndex).
//!
//! ```text
//! { "sort": [...], "filter": [...], "group": [...], "odata": {...} }
//!     │  MetadataParser: one registered sub-parser per section
//! CapabilityFragment × n
//!     │  CapabilityIndex::build (schema filter + union merge)
//! CapabilityIndex
//! ```
//!
//! The table schema is authoritative: document entries that name unknown
//! columns are skipped. A malformed document fails as a whole.

mod common;
pub mod error;
pub mod filter;
pub mod group;
pub mod odata;
pub mod parser;
pub mod sort;

pub use error::MetadataError;
pub use filter::parse_filter_section;
pub use group::parse_group_section;
pub use odata::parse_odata_section;
pub use parser::{MetadataParser, SectionParser, parse_capability_document, section};
pub use sort::parse_sort_section;
