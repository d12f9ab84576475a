//! askdb command-line interface
//!
//! Ask natural-language questions about a SQLite database:
//!
//! ```bash
//! askdb --db chinook.db ask "How many genres are there?"
//! askdb --db chinook.db tables
//! askdb --db chinook.db schema Genre
//! ```
//!
//! Set `RUST_LOG=debug` for verbose logging. The API key is read from
//! `OPENAI_API_KEY` or `ANTHROPIC_API_KEY` depending on the provider.

mod args;
mod commands;

use clap::Parser;
use colored::Colorize;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = args::Cli::parse();
    if let Err(err) = commands::run(cli).await {
        // Fatal session errors get a one-line termination message, never a
        // stack trace.
        eprintln!("{} {}", "session terminated:".red().bold(), err);
        std::process::exit(1);
    }
}
