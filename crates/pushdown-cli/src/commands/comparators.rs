use crate::support::{read_json_file_or_exit, schema_from_value_or_exit};
use pushdown_engine::sort_comparator_mapping;
use serde_json::Value;

pub fn run(schema_path: String) {
    let value: Value = read_json_file_or_exit(&schema_path, "table schema");
    let schema = schema_from_value_or_exit(&value, "table schema");
    println!("{}", sort_comparator_mapping(&schema));
}
