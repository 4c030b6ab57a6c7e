//! Delegation check for `Sort(source, value, [order])`.

use crate::catalog::FunctionDescriptor;
use crate::context::{DelegationContext, SourceResolution};
use crate::diagnostics::DelegationStatus;
use crate::node::{CallNode, Node};
use crate::sort_order::{SortOrder, is_order_supported, resolve_sort_order};
use pushdown_model::{CapabilityKind, CapabilitySet, ColumnPath, SortMetadata};

pub const SORT: &str = "Sort";

pub fn descriptor() -> FunctionDescriptor {
    FunctionDescriptor {
        name: SORT,
        min_arity: 2,
        max_arity: 3,
        required_capabilities: CapabilitySet::READ,
        check: is_sort_delegatable,
    }
}

/// Sort is delegable when the source can sort, the value argument names a
/// sortable column and the order is one the column supports.
pub fn is_sort_delegatable(
    call: &CallNode,
    function: &FunctionDescriptor,
    cx: &mut DelegationContext<'_>,
) -> bool {
    let source_node = &call.args[0];
    let source = match cx.capability_source(
        source_node,
        CapabilityKind::Sort,
        function.required_capabilities,
    ) {
        SourceResolution::Resolved(source) => source,
        SourceResolution::Unavailable { entity_bound } => {
            return cx.reject(
                DelegationStatus::NoCapabilitySource,
                function.name,
                source_node,
                entity_bound,
            );
        }
    };
    let metadata = source.sort_metadata();

    let value = &call.args[1];
    if !matches!(value, Node::FirstName { .. }) || cx.binder.is_async(value) {
        return cx.reject(DelegationStatus::UnsupportedSortArg, function.name, value, true);
    }
    let Some(column) = cx.binder.column_path(value) else {
        return cx.reject(DelegationStatus::UnsupportedSortArg, function.name, value, true);
    };
    if !metadata.supports(&column, CapabilityKind::Sort) {
        return cx.reject(DelegationStatus::NoDelSupportByColumn, function.name, value, true);
    }

    // Without an order argument the sort is ascending, which every sortable
    // column supports.
    let Some(order) = call.args.get(2) else {
        return true;
    };

    match check_order(order, metadata, &column, cx) {
        Ok(()) => true,
        Err(status) => cx.reject(status, function.name, order, true),
    }
}

fn check_order(
    order: &Node,
    metadata: &dyn SortMetadata,
    column: &ColumnPath,
    cx: &DelegationContext<'_>,
) -> Result<(), DelegationStatus> {
    if cx.binder.is_async(order) {
        return Err(DelegationStatus::AsyncSortOrder);
    }
    match order {
        Node::FirstName { .. } | Node::StrLit { .. } => {
            let resolved = resolve_sort_order(order, cx.binder)
                .ok_or(DelegationStatus::UnsupportedSortOrder)?;
            if is_order_supported(resolved, metadata, column) {
                Ok(())
            } else {
                Err(DelegationStatus::SortOrderNotSupportedByColumn)
            }
        }
        Node::DottedName { .. } | Node::Call(_) => {
            if let Some(resolved) = resolve_sort_order(order, cx.binder) {
                if is_order_supported(resolved, metadata, column) {
                    return Ok(());
                }
            }
            // A column sortable both ways accepts any indirect order, even one
            // whose value cannot be shown to be a valid token here.
            if is_order_supported(SortOrder::Ascending, metadata, column)
                && is_order_supported(SortOrder::Descending, metadata, column)
            {
                Ok(())
            } else {
                Err(DelegationStatus::SortOrderNotSupportedByColumn)
            }
        }
        Node::NumLit { .. } | Node::BoolLit { .. } | Node::BinaryOp { .. } => {
            Err(DelegationStatus::UnsupportedSortOrder)
        }
    }
}
