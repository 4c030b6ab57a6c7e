//! Entry point for delegation decisions.

use crate::catalog::FunctionCatalog;
use crate::context::DelegationContext;
use crate::node::CallNode;

/// Stateless across calls; every input arrives through the context.
#[derive(Debug, Clone)]
pub struct DelegationEngine {
    catalog: FunctionCatalog,
}

impl Default for DelegationEngine {
    fn default() -> Self {
        Self::new(FunctionCatalog::builtins())
    }
}

impl DelegationEngine {
    pub fn new(catalog: FunctionCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &FunctionCatalog {
        &self.catalog
    }

    /// Decide whether `call` can run entirely at its data source.
    ///
    /// A rejection pushes exactly one diagnostic into the context's sink.
    /// Unknown functions are not delegable and report nothing.
    ///
    /// # Panics
    ///
    /// If the argument count is outside the function's declared arity; the
    /// binder is expected to have rejected such calls already.
    pub fn is_server_delegatable(&self, call: &CallNode, cx: &mut DelegationContext<'_>) -> bool {
        let Some(function) = self.catalog.get(&call.name) else {
            tracing::debug!(function = %call.name, "no delegation rule for function");
            return false;
        };
        assert!(
            function.accepts_arity(call.args.len()),
            "{} called with {} arguments, expected {}..={}",
            function.name,
            call.args.len(),
            function.min_arity,
            function.max_arity
        );
        let delegable = (function.check)(call, function, cx);
        tracing::debug!(function = function.name, delegable, call = %call, "delegation decided");
        delegable
    }
}
