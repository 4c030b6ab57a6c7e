use crate::support::{
    load_config_or_exit, print_json_or_exit, read_json_file_or_exit, schema_from_value_or_exit,
    yes_no,
};
use pushdown_engine::{
    CallNode, DataSourceDescriptor, DataSourceRegistry, DelegationContext, DelegationEngine,
    SchemaBinder, VecSink,
};
use pushdown_metadata::MetadataParser;
use pushdown_model::{CapabilityIndex, CapabilitySet, DelegationMetadata, SortMetadata, TableSchema};
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::Arc;

/// One sort-check case file.
///
/// ```json
/// { "table": "T",
///   "schema": { "columns": [...] },
///   "document": { "sort": [...] },
///   "asyncFunctions": ["Fetch"],
///   "constants": { "Newest": "Descending" },
///   "call": { "name": "Sort", "args": [ { "kind": "firstName", "name": "T" }, ... ] } }
/// ```
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SortCheckCase {
    table: String,
    schema: Value,
    #[serde(default)]
    document: Option<Value>,
    #[serde(default)]
    declared_capabilities: Option<CapabilitySet>,
    #[serde(default = "default_true")]
    delegatable: bool,
    #[serde(default)]
    entity: Option<EntityCase>,
    #[serde(default)]
    async_functions: Vec<String>,
    #[serde(default)]
    constants: BTreeMap<String, String>,
    call: CallNode,
}

/// Metadata of a bound entity, given as a capability document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntityCase {
    document: Value,
    #[serde(default)]
    array_lookup: bool,
}

fn default_true() -> bool {
    true
}

struct EntityMetadata {
    index: CapabilityIndex,
    array_lookup: bool,
}

impl DelegationMetadata for EntityMetadata {
    fn table_capabilities(&self) -> CapabilitySet {
        let caps = self.index.table_capabilities();
        if self.array_lookup {
            caps | CapabilitySet::ARRAY_LOOKUP
        } else {
            caps
        }
    }

    fn sort_metadata(&self) -> &dyn SortMetadata {
        self.index.sort()
    }
}

pub fn run(case_path: String, config_path: Option<String>, json_output: bool) {
    let case: SortCheckCase = read_json_file_or_exit(&case_path, "sort-check case");
    let config = load_config_or_exit(config_path.as_deref());
    let schema = schema_from_value_or_exit(&case.schema, "case schema");
    let registry = build_registry_or_exit(&case, &schema);

    let engine = DelegationEngine::default();
    match engine.catalog().get(&case.call.name) {
        Some(function) if !function.accepts_arity(case.call.args.len()) => {
            eprintln!(
                "error: {} expects {}..={} arguments, case has {}",
                function.name,
                function.min_arity,
                function.max_arity,
                case.call.args.len()
            );
            std::process::exit(1);
        }
        _ => {}
    }

    let mut binder = SchemaBinder::new(case.table.clone(), schema);
    for name in &case.async_functions {
        binder = binder.with_async_function(name.clone());
    }
    for (name, value) in &case.constants {
        binder = binder.with_constant(name.clone(), value.clone());
    }

    let mut sink = VecSink::new();
    let mut cx = DelegationContext::new(&binder, &registry, config.features, &mut sink);
    let delegable = engine.is_server_delegatable(&case.call, &mut cx);
    let events = sink.into_events();

    if json_output {
        let payload = json!({
            "call": case.call.to_string(),
            "delegable": delegable,
            "enhancedDelegation": config.features.enhanced_delegation,
            "diagnostics": events,
        });
        print_json_or_exit(&payload, "sort-check");
        return;
    }

    println!("pushdown sort-check");
    println!("  Call: {}", case.call);
    println!("  Delegable: {}", yes_no(delegable));
    for event in &events {
        println!("  Rejected: {} at `{}`", event.status, event.node);
        if let Some(hint) = event.hint {
            println!("    Hint: {}", hint.message());
        }
    }
}

fn build_registry_or_exit(case: &SortCheckCase, schema: &TableSchema) -> DataSourceRegistry {
    let mut registry = DataSourceRegistry::new();

    if let Some(document) = &case.document {
        let descriptor = DataSourceDescriptor::new(case.table.clone(), schema.clone(), document)
            .unwrap_or_else(|e| {
                eprintln!("error: invalid case document: {e}");
                std::process::exit(1);
            })
            .with_delegatable(case.delegatable);
        let descriptor = match case.declared_capabilities {
            Some(declared) => descriptor.with_declared_capabilities(declared),
            None => descriptor,
        };
        registry.register_external(Arc::new(descriptor));
    }

    if let Some(entity) = &case.entity {
        let index = MetadataParser::standard()
            .parse(&entity.document, schema)
            .unwrap_or_else(|e| {
                eprintln!("error: invalid entity document: {e}");
                std::process::exit(1);
            });
        registry.register_entity(
            case.table.clone(),
            Arc::new(EntityMetadata {
                index,
                array_lookup: entity.array_lookup,
            }),
        );
    }

    registry
}
