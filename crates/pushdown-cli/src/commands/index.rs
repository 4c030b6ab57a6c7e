use crate::support::{print_json_or_exit, read_json_file_or_exit, schema_from_value_or_exit};
use pushdown_metadata::MetadataParser;
use serde_json::{Value, json};

pub fn run(document_path: String, schema_path: String, json_output: bool) {
    let schema_value: Value = read_json_file_or_exit(&schema_path, "table schema");
    let schema = schema_from_value_or_exit(&schema_value, "table schema");
    let document: Value = read_json_file_or_exit(&document_path, "capability document");

    let index = MetadataParser::standard()
        .parse(&document, &schema)
        .unwrap_or_else(|e| {
            eprintln!("error: invalid capability document at {document_path}: {e}");
            std::process::exit(1);
        });

    if json_output {
        let payload = json!({
            "digest": index.digest(),
            "index": index.to_json(),
        });
        print_json_or_exit(&payload, "index");
        return;
    }

    let table: Vec<&str> = index
        .table_capabilities()
        .iter()
        .map(|kind| kind.as_str())
        .collect();
    println!("pushdown index");
    println!("  Digest: {}", index.digest());
    println!("  Table capabilities: {}", table.join(", "));
    println!("  Columns: {}", index.len());
    for (path, caps) in index.columns() {
        let kinds: Vec<&str> = caps.kinds.iter().map(|kind| kind.as_str()).collect();
        let mut line = format!("    - {path}: {}", kinds.join(", "));
        if caps.ascending_only {
            line.push_str(" (ascending only)");
        }
        println!("{line}");
    }
}
