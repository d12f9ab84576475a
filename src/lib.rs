//! askdb — answer natural-language questions about a SQL database.
//!
//! This crate fronts [`askdb_core`] with a one-call API: build the
//! database handle, tool registry, model client, and session from a
//! [`Config`], then run a single question to completion.
//!
//! ```no_run
//! use askdb::{ask, Config};
//!
//! # async fn example() -> askdb::AskdbResult<()> {
//! let mut config = Config::default();
//! config.database.path = "chinook.db".into();
//!
//! let report = ask(&config, "How many genres are there?").await?;
//! println!("{}", report.answer);
//! # Ok(())
//! # }
//! ```

pub use askdb_core as core;
pub use askdb_core::{
    AskdbError, AskdbResult, ChatModel, Config, ModelClient, Session, SessionReport, SqlDatabase,
    ToolRegistry,
};

use std::sync::Arc;
use tracing::info;

/// Answer one question using the configured model provider.
pub async fn ask(config: &Config, question: &str) -> AskdbResult<SessionReport> {
    let (provider, provider_config, params) = config.model.clone().into_client_parts();
    let model = ModelClient::new(provider, provider_config, params)?;
    ask_with_model(config, question, Arc::new(model)).await
}

/// Answer one question with a caller-supplied model.
///
/// This is the seam for embedding: anything implementing [`ChatModel`]
/// (including a test fake) can drive the loop.
pub async fn ask_with_model(
    config: &Config,
    question: &str,
    model: Arc<dyn ChatModel>,
) -> AskdbResult<SessionReport> {
    let db = SqlDatabase::open(&config.database.path)?;
    let dialect = db.dialect();
    let registry = ToolRegistry::for_database(db, &config.agent);

    let session = Session::new(question, model, registry, config.agent.clone(), dialect);
    info!(session = %session.id(), question, "running session");
    session.run().await
}
