//! Rejection diagnostics.
//!
//! Every negative decision pushes exactly one [`DiagnosticEvent`]; a positive
//! decision pushes nothing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reason code attached to a rejected delegation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DelegationStatus {
    /// Neither a capable bound entity nor a delegatable external source.
    NoCapabilitySource,
    /// The value argument is not a plain, synchronous, resolvable column name.
    UnsupportedSortArg,
    /// The column is not sortable at the source.
    NoDelSupportByColumn,
    /// The requested direction is not supported for the column.
    SortOrderNotSupportedByColumn,
    AsyncSortOrder,
    /// The order argument has a shape or value that is not a sort order.
    UnsupportedSortOrder,
}

impl DelegationStatus {
    pub const ALL: [DelegationStatus; 6] = [
        DelegationStatus::NoCapabilitySource,
        DelegationStatus::UnsupportedSortArg,
        DelegationStatus::NoDelSupportByColumn,
        DelegationStatus::SortOrderNotSupportedByColumn,
        DelegationStatus::AsyncSortOrder,
        DelegationStatus::UnsupportedSortOrder,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DelegationStatus::NoCapabilitySource => "NoCapabilitySource",
            DelegationStatus::UnsupportedSortArg => "UnsupportedSortArg",
            DelegationStatus::NoDelSupportByColumn => "NoDelSupportByColumn",
            DelegationStatus::SortOrderNotSupportedByColumn => "SortOrderNotSupportedByColumn",
            DelegationStatus::AsyncSortOrder => "AsyncSortOrder",
            DelegationStatus::UnsupportedSortOrder => "UnsupportedSortOrder",
        }
    }
}

impl fmt::Display for DelegationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DelegationHint {
    RestructureForDelegation,
}

impl DelegationHint {
    pub fn message(self) -> &'static str {
        match self {
            DelegationHint::RestructureForDelegation => {
                "Rewrite the expression so the data source can evaluate it, or expect local evaluation over a partial result."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticEvent {
    pub status: DelegationStatus,
    pub function: String,
    /// Formula text of the offending node.
    pub node: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<DelegationHint>,
}

pub trait DiagnosticSink {
    fn push(&mut self, event: DiagnosticEvent);
}

impl DiagnosticSink for Vec<DiagnosticEvent> {
    fn push(&mut self, event: DiagnosticEvent) {
        Vec::push(self, event);
    }
}

/// Collects events in emission order.
#[derive(Debug, Clone, Default)]
pub struct VecSink {
    events: Vec<DiagnosticEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[DiagnosticEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<DiagnosticEvent> {
        self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl DiagnosticSink for VecSink {
    fn push(&mut self, event: DiagnosticEvent) {
        self.events.push(event);
    }
}

/// Forwards each event to `tracing` at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn push(&mut self, event: DiagnosticEvent) {
        tracing::info!(
            status = event.status.as_str(),
            function = %event.function,
            node = %event.node,
            hint = event.hint.map(DelegationHint::message),
            "delegation rejected"
        );
    }
}
