//! Config file loading

use super::Config;
use crate::error::{AskdbError, AskdbResult};
use std::path::Path;
use tracing::debug;

/// Load a [`Config`] from a TOML file.
///
/// Missing sections fall back to defaults; the file only needs to name what
/// it overrides. Secrets left out of the file are resolved from the
/// environment when the model client is built.
pub fn load_from_path(path: impl AsRef<Path>) -> AskdbResult<Config> {
    let path = path.as_ref();
    debug!(path = %path.display(), "loading configuration");

    let raw = std::fs::read_to_string(path)
        .map_err(|e| AskdbError::config(format!("failed to read {}: {}", path.display(), e)))?;

    let config: Config = toml::from_str(&raw)
        .map_err(|e| AskdbError::config(format!("failed to parse {}: {}", path.display(), e)))?;

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> AskdbResult<()> {
    if config.agent.top_k == 0 {
        return Err(AskdbError::config("agent.top_k must be at least 1"));
    }
    if config.agent.max_rounds == 0 {
        return Err(AskdbError::config("agent.max_rounds must be at least 1"));
    }
    if config.model.model.trim().is_empty() {
        return Err(AskdbError::config("model.model must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_and_validates_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [database]
            path = "test.db"

            [model]
            model = "gpt-4o-mini"

            [agent]
            max_rounds = 6
            "#
        )
        .unwrap();

        let config = load_from_path(file.path()).unwrap();
        assert_eq!(config.agent.max_rounds, 6);
    }

    #[test]
    fn rejects_zero_round_cap() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[agent]\nmax_rounds = 0").unwrap();

        let err = load_from_path(file.path()).unwrap_err();
        assert!(matches!(err, AskdbError::Config(_)));
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = load_from_path("/nonexistent/askdb.toml").unwrap_err();
        assert!(matches!(err, AskdbError::Config(_)));
    }
}
