//! The reasoning loop
//!
//! One session answers one question. The loop alternates a model call
//! (Proposing) with a tool invocation (Observing) until the model produces
//! a final answer or a hard bound fires. Tool failures are fed back into
//! the transcript as observations; the loop itself never rewrites a query.

use super::outcome::SessionReport;
use super::state::SessionState;
use super::turn::{Transcript, TranscriptError};
use crate::config::AgentConfig;
use crate::error::{AskdbError, AskdbResult};
use crate::llm::{ChatModel, LlmUsage};
use crate::tools::{ObservationErrorKind, ToolRegistry};
use chrono::Utc;
use std::sync::Arc;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

impl From<TranscriptError> for AskdbError {
    fn from(error: TranscriptError) -> Self {
        AskdbError::session(error.to_string())
    }
}

/// A single question/answer session over the reasoning loop
pub struct Session {
    id: Uuid,
    question: String,
    model: Arc<dyn ChatModel>,
    registry: ToolRegistry,
    config: AgentConfig,
    system_prompt: String,
    cancel: CancellationToken,
}

impl Session {
    /// Create a session for one question.
    ///
    /// `dialect` parameterises the policy text (e.g. "sqlite").
    pub fn new(
        question: impl Into<String>,
        model: Arc<dyn ChatModel>,
        registry: ToolRegistry,
        config: AgentConfig,
        dialect: &str,
    ) -> Self {
        let system_prompt = crate::prompts::system_policy(dialect, config.top_k);
        Self {
            id: Uuid::new_v4(),
            question: question.into(),
            model,
            registry,
            config,
            system_prompt,
            cancel: CancellationToken::new(),
        }
    }

    /// Session identifier
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Token that cancels this session between rounds
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    fn advance(&self, state: &mut SessionState, next: SessionState) {
        debug_assert!(
            state.can_transition_to(next),
            "invalid session transition {state} -> {next}"
        );
        debug!(from = %state, to = %next, "session transition");
        *state = next;
    }

    /// Drive the loop to completion.
    ///
    /// # Errors
    ///
    /// Fatal conditions only: connection loss, model timeout, round-cap
    /// exhaustion ([`AskdbError::NoAnswer`]), the forbidden-statement abort
    /// ([`AskdbError::PolicyViolation`]), and cancellation. Everything else
    /// is absorbed into the transcript.
    #[instrument(skip(self), fields(session = %self.id))]
    pub async fn run(self) -> AskdbResult<SessionReport> {
        let started_at = Utc::now();
        let mut state = SessionState::Start;
        let mut transcript = Transcript::new(&self.question);
        let mut usage = LlmUsage::default();
        let mut forbidden_attempts: u32 = 0;
        let schemas = self.registry.schemas();

        info!(question = %self.question, max_rounds = self.config.max_rounds, "session started");
        self.advance(&mut state, SessionState::Proposing);

        for round in 1..=self.config.max_rounds {
            // Cancellation point: between rounds, before the model call
            if self.cancel.is_cancelled() {
                info!(round, "session cancelled");
                self.advance(&mut state, SessionState::Terminated);
                return Err(AskdbError::Cancelled);
            }

            let messages = transcript.to_messages(&self.system_prompt);
            let response = match timeout(
                self.config.model_timeout(),
                self.model.chat(&messages, Some(&schemas)),
            )
            .await
            {
                Ok(result) => result?,
                Err(_) => {
                    warn!(round, "model call timed out");
                    self.advance(&mut state, SessionState::Terminated);
                    return Err(AskdbError::timeout(self.config.model_timeout_secs));
                }
            };

            if let Some(round_usage) = &response.usage {
                usage.add(round_usage);
            }

            if !response.has_tool_calls() {
                transcript.push_final_answer(&response.content)?;
                self.advance(&mut state, SessionState::Done);
                self.advance(&mut state, SessionState::Terminated);

                let report = SessionReport {
                    session_id: self.id,
                    answer: response.content,
                    rounds: round,
                    usage,
                    transcript,
                    started_at,
                    completed_at: Utc::now(),
                };
                info!(summary = %report.summary(), "session answered");
                return Ok(report);
            }

            self.advance(&mut state, SessionState::Observing);
            for (index, call) in response.tool_calls.iter().enumerate() {
                // Accompanying text belongs to the first proposal of the round
                let content = if index == 0 { response.content.as_str() } else { "" };
                transcript.push_proposal(content, call.clone())?;

                let observation = self.registry.invoke(call).await;

                match observation.error_kind {
                    Some(ObservationErrorKind::Connection) => {
                        let message = observation.error.clone().unwrap_or_default();
                        transcript.push_observation(observation)?;
                        self.advance(&mut state, SessionState::Terminated);
                        return Err(AskdbError::Connection(message));
                    }
                    Some(ObservationErrorKind::ForbiddenStatement) => {
                        forbidden_attempts += 1;
                        warn!(
                            round,
                            attempts = forbidden_attempts,
                            "forbidden statement proposed"
                        );
                        transcript.push_observation(observation)?;
                        if let Some(limit) = self.config.forbidden_limit {
                            if forbidden_attempts >= limit {
                                self.advance(&mut state, SessionState::Terminated);
                                return Err(AskdbError::PolicyViolation {
                                    attempts: forbidden_attempts,
                                });
                            }
                        }
                    }
                    _ => transcript.push_observation(observation)?,
                }
            }
            self.advance(&mut state, SessionState::Proposing);
        }

        info!(rounds = self.config.max_rounds, "round cap exhausted");
        self.advance(&mut state, SessionState::Terminated);
        Err(AskdbError::NoAnswer {
            rounds: self.config.max_rounds,
        })
    }
}
