//! Model client
//!
//! One HTTP client per session, speaking either the OpenAI chat-completions
//! or the Anthropic messages API. Transient failures are retried with
//! exponential backoff; everything else surfaces immediately.

use super::convert::{MessageConverter, ToolConverter};
use super::messages::{LlmMessage, LlmResponse};
use super::parse::ResponseParser;
use super::provider::{LlmProvider, ModelParameters, ProviderConfig};
use crate::error::{AskdbError, AskdbResult};
use crate::tools::ToolSchema;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, instrument, warn};

/// Anthropic messages API requires an explicit completion budget
const DEFAULT_MAX_TOKENS: u32 = 1024;

/// The model boundary: one request, one response.
///
/// The reasoning loop depends on this trait rather than on a concrete
/// client, so tests drive it with a scripted fake.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send the conversation and tool declarations, get the next response
    async fn chat(
        &self,
        messages: &[LlmMessage],
        tools: Option<&[ToolSchema]>,
    ) -> AskdbResult<LlmResponse>;
}

/// HTTP-backed [`ChatModel`] implementation
pub struct ModelClient {
    provider: LlmProvider,
    config: ProviderConfig,
    params: ModelParameters,
    http: Client,
}

impl ModelClient {
    /// Create a client for the given provider
    pub fn new(
        provider: LlmProvider,
        config: ProviderConfig,
        params: ModelParameters,
    ) -> AskdbResult<Self> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AskdbError::llm(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            provider,
            config,
            params,
            http,
        })
    }

    /// Model name this client requests
    pub fn model(&self) -> &str {
        &self.params.model
    }

    /// Provider this client speaks to
    pub fn provider(&self) -> LlmProvider {
        self.provider
    }

    fn api_key(&self) -> AskdbResult<String> {
        self.config.resolve_api_key(self.provider).ok_or_else(|| {
            AskdbError::config(format!(
                "no API key for provider '{}'; set {} or configure model.api_key",
                self.provider,
                self.provider.api_key_env()
            ))
        })
    }

    async fn request_once(
        &self,
        messages: &[LlmMessage],
        tools: Option<&[ToolSchema]>,
    ) -> AskdbResult<LlmResponse> {
        match self.provider {
            LlmProvider::OpenAi => self.chat_openai(messages, tools).await,
            LlmProvider::Anthropic => self.chat_anthropic(messages, tools).await,
        }
    }

    async fn chat_openai(
        &self,
        messages: &[LlmMessage],
        tools: Option<&[ToolSchema]>,
    ) -> AskdbResult<LlmResponse> {
        let url = format!("{}/chat/completions", self.config.resolve_base_url(self.provider));

        let mut body = json!({
            "model": self.params.model,
            "messages": MessageConverter::to_openai(messages),
        });
        if let Some(max_tokens) = self.params.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }
        if let Some(temperature) = self.params.temperature {
            body["temperature"] = json!(temperature);
        }
        if let Some(top_p) = self.params.top_p {
            body["top_p"] = json!(top_p);
        }
        if let Some(tools) = tools {
            if !tools.is_empty() {
                body["tools"] = json!(ToolConverter::to_openai(tools));
            }
        }

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.api_key()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| AskdbError::Http(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AskdbError::llm(format!("API error (status {status}): {text}")));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| AskdbError::llm(format!("failed to parse response: {e}")))?;
        ResponseParser::parse_openai(payload)
    }

    async fn chat_anthropic(
        &self,
        messages: &[LlmMessage],
        tools: Option<&[ToolSchema]>,
    ) -> AskdbResult<LlmResponse> {
        let url = format!("{}/v1/messages", self.config.resolve_base_url(self.provider));

        let mut body = json!({
            "model": self.params.model,
            "max_tokens": self.params.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            "messages": MessageConverter::to_anthropic(messages),
        });
        if let Some(system) = MessageConverter::extract_system_message(messages) {
            body["system"] = json!(system);
        }
        if let Some(temperature) = self.params.temperature {
            body["temperature"] = json!(temperature);
        }
        if let Some(tools) = tools {
            if !tools.is_empty() {
                body["tools"] = json!(ToolConverter::to_anthropic(tools));
            }
        }

        let response = self
            .http
            .post(&url)
            .header("x-api-key", self.api_key()?)
            .header("anthropic-version", "2023-06-01")
            .json(&body)
            .send()
            .await
            .map_err(|e| AskdbError::Http(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AskdbError::llm(format!("API error (status {status}): {text}")));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| AskdbError::llm(format!("failed to parse response: {e}")))?;
        ResponseParser::parse_anthropic(payload)
    }

    /// Run a request with exponential backoff on retryable failures
    async fn execute_with_retry<F, Fut>(&self, operation: F) -> AskdbResult<LlmResponse>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = AskdbResult<LlmResponse>>,
    {
        let max_retries = self.config.max_retries;
        let mut last_error = None;

        for attempt in 0..=max_retries {
            match operation().await {
                Ok(response) => {
                    if attempt > 0 {
                        debug!(attempt, "request succeeded after retry");
                    }
                    return Ok(response);
                }
                Err(error) => {
                    if !error.is_retryable() {
                        return Err(error);
                    }

                    if attempt < max_retries {
                        let delay = Duration::from_secs(2_u64.pow(attempt));
                        warn!(
                            attempt = attempt + 1,
                            max_attempts = max_retries + 1,
                            delay_secs = delay.as_secs(),
                            error = %error,
                            "retrying model request"
                        );
                        sleep(delay).await;
                    }
                    last_error = Some(error);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| AskdbError::llm("all retry attempts failed without error details")))
    }
}

#[async_trait]
impl ChatModel for ModelClient {
    #[instrument(skip(self, messages, tools), fields(provider = %self.provider, model = %self.params.model))]
    async fn chat(
        &self,
        messages: &[LlmMessage],
        tools: Option<&[ToolSchema]>,
    ) -> AskdbResult<LlmResponse> {
        self.execute_with_retry(|| async { self.request_once(messages, tools).await })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_is_a_config_error() {
        let client = ModelClient::new(
            LlmProvider::OpenAi,
            ProviderConfig {
                api_key: None,
                base_url: None,
                max_retries: 0,
            },
            ModelParameters::new("gpt-4o-mini"),
        )
        .unwrap();

        // Guard against ambient credentials leaking into the test
        if std::env::var("OPENAI_API_KEY").is_err() {
            let err = client.api_key().unwrap_err();
            assert!(matches!(err, AskdbError::Config(_)));
        }
    }

    #[test]
    fn client_reports_its_identity() {
        let client = ModelClient::new(
            LlmProvider::Anthropic,
            ProviderConfig::default().with_api_key("k"),
            ModelParameters::new("claude-sonnet").with_max_tokens(512),
        )
        .unwrap();

        assert_eq!(client.model(), "claude-sonnet");
        assert_eq!(client.provider(), LlmProvider::Anthropic);
    }
}
