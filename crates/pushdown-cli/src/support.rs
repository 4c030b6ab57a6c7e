use pushdown_engine::EngineConfig;
use pushdown_model::TableSchema;
use serde_json::Value;
use std::fs;
use tracing_subscriber::EnvFilter;

/// Logs go to stderr; `PUSHDOWN_LOG` takes precedence over `RUST_LOG`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("PUSHDOWN_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn read_json_file_or_exit<T>(path: &str, label: &str) -> T
where
    T: serde::de::DeserializeOwned,
{
    let bytes = fs::read(path).unwrap_or_else(|e| {
        eprintln!("error: failed to read {label} at {path}: {e}");
        std::process::exit(1);
    });
    serde_json::from_slice::<T>(&bytes).unwrap_or_else(|e| {
        eprintln!("error: failed to parse {label} JSON at {path}: {e}");
        std::process::exit(1);
    })
}

pub fn schema_from_value_or_exit(value: &Value, label: &str) -> TableSchema {
    TableSchema::from_json(value).unwrap_or_else(|e| {
        eprintln!("error: invalid {label}: {e}");
        std::process::exit(1);
    })
}

pub fn load_config_or_exit(path: Option<&str>) -> EngineConfig {
    let Some(path) = path else {
        return EngineConfig::default();
    };
    EngineConfig::load(path).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    })
}

pub fn print_json_or_exit(payload: &Value, label: &str) {
    let rendered = serde_json::to_string_pretty(payload).unwrap_or_else(|err| {
        eprintln!("error: failed to render {label} json: {err}");
        std::process::exit(2);
    });
    println!("{rendered}");
}

pub fn yes_no(ok: bool) -> &'static str {
    if ok { "yes" } else { "no" }
}
