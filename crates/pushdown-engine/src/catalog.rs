//! Builtin functions as data: name, arity window, required table
//! capabilities and the check that decides delegation.

use crate::context::DelegationContext;
use crate::node::CallNode;
use crate::sort;
use pushdown_model::CapabilitySet;

/// Delegation check for one function. Runs only after the arity was validated.
pub type DelegationCheck = fn(&CallNode, &FunctionDescriptor, &mut DelegationContext<'_>) -> bool;

#[derive(Debug, Clone)]
pub struct FunctionDescriptor {
    pub name: &'static str,
    pub min_arity: usize,
    pub max_arity: usize,
    /// Table capabilities the source must grant, beyond the operation's own kind.
    pub required_capabilities: CapabilitySet,
    pub check: DelegationCheck,
}

impl FunctionDescriptor {
    pub fn accepts_arity(&self, argc: usize) -> bool {
        (self.min_arity..=self.max_arity).contains(&argc)
    }
}

#[derive(Debug, Clone, Default)]
pub struct FunctionCatalog {
    functions: Vec<FunctionDescriptor>,
}

impl FunctionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builtins() -> Self {
        let mut catalog = Self::new();
        catalog.register(sort::descriptor());
        catalog
    }

    /// Add a function; a descriptor with the same name is replaced.
    pub fn register(&mut self, descriptor: FunctionDescriptor) -> &mut Self {
        match self
            .functions
            .iter_mut()
            .find(|existing| existing.name == descriptor.name)
        {
            Some(existing) => *existing = descriptor,
            None => self.functions.push(descriptor),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&FunctionDescriptor> {
        self.functions.iter().find(|function| function.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.functions.iter().map(|function| function.name)
    }
}
