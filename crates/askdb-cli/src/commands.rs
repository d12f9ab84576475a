//! Subcommand handlers

use crate::args::{Cli, Commands};
use askdb_core::agent::{Session, Turn};
use askdb_core::config::{self, Config};
use askdb_core::db::{SchemaInspector, SqlDatabase};
use askdb_core::error::{AskdbError, AskdbResult};
use askdb_core::llm::ModelClient;
use askdb_core::tools::ToolRegistry;
use colored::Colorize;
use std::sync::Arc;
use tracing::info;

/// Merge the config file (if any) with command-line overrides
fn resolve_config(cli: &Cli) -> AskdbResult<Config> {
    let mut config = match &cli.config {
        Some(path) => config::load_from_path(path)?,
        None => Config::default(),
    };

    if let Some(db) = &cli.db {
        config.database.path = db.clone();
    }
    if let Some(model) = &cli.model {
        config.model.model = model.clone();
    }
    if let Some(provider) = &cli.provider {
        config.model.provider = provider
            .parse()
            .map_err(|e: String| AskdbError::config(e))?;
    }

    if config.database.path.as_os_str().is_empty() {
        return Err(AskdbError::config(
            "no database given; pass --db or set database.path in the config file",
        ));
    }

    Ok(config)
}

/// Dispatch the parsed command line
pub async fn run(cli: Cli) -> AskdbResult<()> {
    let config = resolve_config(&cli)?;

    match &cli.command {
        Commands::Ask {
            question,
            top_k,
            max_rounds,
            show_steps,
        } => {
            let mut config = config;
            if let Some(top_k) = top_k {
                config.agent.top_k = *top_k;
            }
            if let Some(max_rounds) = max_rounds {
                config.agent.max_rounds = *max_rounds;
            }
            ask(&config, question, *show_steps).await
        }
        Commands::Tables => tables(&config),
        Commands::Schema { table } => schema(&config, table),
        Commands::Tools => tools(&config),
    }
}

async fn ask(config: &Config, question: &str, show_steps: bool) -> AskdbResult<()> {
    let db = SqlDatabase::open(&config.database.path)?;
    let dialect = db.dialect();

    let registry = ToolRegistry::for_database(db, &config.agent);
    let (provider, provider_config, params) = config.model.clone().into_client_parts();
    let model = ModelClient::new(provider, provider_config, params)?;

    let session = Session::new(
        question,
        Arc::new(model),
        registry,
        config.agent.clone(),
        dialect,
    );
    info!(session = %session.id(), "running question");

    let report = session.run().await?;

    if show_steps {
        print_steps(report.transcript.turns());
        println!();
    }

    println!("{}", report.answer.green().bold());
    println!("{}", report.summary().dimmed());
    Ok(())
}

fn print_steps(turns: &[Turn]) {
    for turn in turns {
        match turn {
            Turn::ModelProposal { content, call } => {
                if !content.is_empty() {
                    println!("{}", content.italic());
                }
                println!(
                    "{} {}({})",
                    "->".cyan().bold(),
                    call.name.cyan(),
                    serde_json::to_string(&call.arguments).unwrap_or_default()
                );
            }
            Turn::ToolObservation { observation } => {
                let text = observation.render();
                if observation.success {
                    println!("{} {}", "<-".dimmed(), text.dimmed());
                } else {
                    println!("{} {}", "<-".yellow().bold(), text.yellow());
                }
            }
            Turn::FinalAnswer { .. } => {}
        }
    }
}

fn tables(config: &Config) -> AskdbResult<()> {
    let db = SqlDatabase::open(&config.database.path)?;
    let inspector = SchemaInspector::new(db.clone(), config.agent.sample_rows);

    let names = inspector.list_tables()?;

    println!("Dialect: {}", db.dialect().bold());
    println!("Available tables: {}", names.join(", "));
    Ok(())
}

fn schema(config: &Config, table: &str) -> AskdbResult<()> {
    let db = SqlDatabase::open(&config.database.path)?;
    let inspector = SchemaInspector::new(db, config.agent.sample_rows);

    let info = inspector.describe_table(table)?;
    println!("{}", info.render());
    Ok(())
}

fn tools(config: &Config) -> AskdbResult<()> {
    let db = SqlDatabase::open(&config.database.path)?;
    let registry = ToolRegistry::for_database(db, &config.agent);

    for schema in registry.schemas() {
        println!(
            "{} {}",
            format!("{}:", schema.name).green().bold(),
            schema.description.green()
        );
    }
    Ok(())
}
