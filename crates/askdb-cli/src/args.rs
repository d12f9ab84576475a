//! Command-line argument definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Ask natural-language questions about a SQL database
#[derive(Debug, Parser)]
#[command(name = "askdb", version, about)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the SQLite database file
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Model name override (e.g. gpt-4o-mini)
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Provider override (openai or anthropic)
    #[arg(long, global = true)]
    pub provider: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Ask a question and print the final answer
    Ask {
        /// The natural-language question
        question: String,

        /// Maximum rows per query execution
        #[arg(long)]
        top_k: Option<usize>,

        /// Maximum proposal/observation rounds
        #[arg(long)]
        max_rounds: Option<u32>,

        /// Print every proposal and observation, not just the answer
        #[arg(long)]
        show_steps: bool,
    },

    /// Print the database dialect and the available tables
    Tables,

    /// Describe one table: columns, types, sample rows
    Schema {
        /// Name of the table to describe
        table: String,
    },

    /// List the registered tools and their descriptions
    Tools,
}
