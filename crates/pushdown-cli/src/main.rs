//! Pushdown CLI: the `pushdown` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    support::init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Index {
            document,
            schema,
            json,
        } => commands::index::run(document, schema, json),

        Commands::SortCheck { case, config, json } => {
            commands::sort_check::run(case, config, json)
        }

        Commands::Comparators { schema } => commands::comparators::run(schema),
    }
}
