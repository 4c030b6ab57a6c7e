use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "pushdown",
    about = "Pushdown: capability indices and delegation decisions for table operations",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a capability document against a table schema and print the index
    Index {
        /// Path to capability document JSON
        #[arg(long)]
        document: String,

        /// Path to table schema JSON
        #[arg(long)]
        schema: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Decide whether one Sort call can be delegated
    SortCheck {
        /// Path to sort-check case JSON (schema, document, binder facts, call)
        #[arg(long)]
        case: String,

        /// Optional engine config TOML (feature flags)
        #[arg(long)]
        config: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the column-to-comparator mapping for a table schema
    Comparators {
        /// Path to table schema JSON
        #[arg(long)]
        schema: String,
    },
}
