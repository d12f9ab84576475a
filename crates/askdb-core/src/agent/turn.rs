//! Turns and the session transcript

use crate::llm::LlmMessage;
use crate::tools::{Observation, ToolCall};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One step of the session history
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Turn {
    /// The model proposed a tool call, optionally with accompanying text
    ModelProposal {
        /// Text the model produced alongside the call
        content: String,
        /// The proposed call
        call: ToolCall,
    },
    /// The registry answered a proposal
    ToolObservation {
        /// The structured result
        observation: Observation,
    },
    /// The model produced its final answer
    FinalAnswer {
        /// The answer text
        text: String,
    },
}

/// Violations of the transcript ordering invariant
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TranscriptError {
    /// A proposal was appended while another was still unanswered
    #[error("proposal appended while call '{0}' is still unanswered")]
    ProposalPending(String),

    /// An observation was appended with no proposal waiting for one
    #[error("observation appended with no pending proposal")]
    NoPendingProposal,

    /// An observation answered a different call than the pending one
    #[error("observation answers call '{got}' but call '{expected}' is pending")]
    CallIdMismatch {
        /// Call id of the pending proposal
        expected: String,
        /// Call id the observation carried
        got: String,
    },

    /// The transcript already holds a final answer
    #[error("transcript is closed by a final answer")]
    Closed,
}

/// Ordered, append-only session history.
///
/// Appends enforce the pairing invariant: every proposal is answered by
/// exactly one observation for the same call id before the next proposal or
/// the final answer, and nothing follows a final answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    question: String,
    turns: Vec<Turn>,
}

impl Transcript {
    /// Start a transcript for one question
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            turns: Vec::new(),
        }
    }

    /// The session question
    pub fn question(&self) -> &str {
        &self.question
    }

    /// All turns, in order
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// The final answer, once produced
    pub fn final_answer(&self) -> Option<&str> {
        match self.turns.last() {
            Some(Turn::FinalAnswer { text }) => Some(text),
            _ => None,
        }
    }

    /// Whether a final answer closed the transcript
    pub fn is_closed(&self) -> bool {
        self.final_answer().is_some()
    }

    fn pending_call_id(&self) -> Option<&str> {
        match self.turns.last() {
            Some(Turn::ModelProposal { call, .. }) => Some(&call.id),
            _ => None,
        }
    }

    fn ensure_open(&self) -> Result<(), TranscriptError> {
        if self.is_closed() {
            Err(TranscriptError::Closed)
        } else {
            Ok(())
        }
    }

    /// Append a model proposal
    pub fn push_proposal(
        &mut self,
        content: impl Into<String>,
        call: ToolCall,
    ) -> Result<(), TranscriptError> {
        self.ensure_open()?;
        if let Some(pending) = self.pending_call_id() {
            return Err(TranscriptError::ProposalPending(pending.to_string()));
        }
        self.turns.push(Turn::ModelProposal {
            content: content.into(),
            call,
        });
        Ok(())
    }

    /// Append the observation answering the pending proposal
    pub fn push_observation(&mut self, observation: Observation) -> Result<(), TranscriptError> {
        self.ensure_open()?;
        let Some(pending) = self.pending_call_id() else {
            return Err(TranscriptError::NoPendingProposal);
        };
        if pending != observation.call_id {
            return Err(TranscriptError::CallIdMismatch {
                expected: pending.to_string(),
                got: observation.call_id.clone(),
            });
        }
        self.turns.push(Turn::ToolObservation { observation });
        Ok(())
    }

    /// Append the final answer, closing the transcript
    pub fn push_final_answer(&mut self, text: impl Into<String>) -> Result<(), TranscriptError> {
        self.ensure_open()?;
        if let Some(pending) = self.pending_call_id() {
            return Err(TranscriptError::ProposalPending(pending.to_string()));
        }
        self.turns.push(Turn::FinalAnswer { text: text.into() });
        Ok(())
    }

    /// Render the transcript as the model conversation
    pub fn to_messages(&self, system_prompt: &str) -> Vec<LlmMessage> {
        let mut messages = Vec::with_capacity(self.turns.len() + 2);
        messages.push(LlmMessage::system(system_prompt));
        messages.push(LlmMessage::user(&self.question));

        for turn in &self.turns {
            match turn {
                Turn::ModelProposal { content, call } => {
                    messages.push(LlmMessage::assistant_with_tools(
                        content.clone(),
                        vec![call.clone()],
                    ));
                }
                Turn::ToolObservation { observation } => {
                    messages.push(LlmMessage::tool(
                        observation.render(),
                        observation.call_id.clone(),
                        observation.tool_name.clone(),
                    ));
                }
                Turn::FinalAnswer { text } => {
                    messages.push(LlmMessage::assistant(text.clone()));
                }
            }
        }

        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MessageRole;
    use std::collections::HashMap;

    fn call(id: &str) -> ToolCall {
        ToolCall::new(id, "list_tables", HashMap::new())
    }

    fn observation(id: &str) -> Observation {
        Observation::success(id, "list_tables", "Tables: Genre")
    }

    #[test]
    fn proposal_then_observation_then_answer() {
        let mut transcript = Transcript::new("How many genres?");
        transcript.push_proposal("checking", call("c1")).unwrap();
        transcript.push_observation(observation("c1")).unwrap();
        transcript.push_final_answer("25").unwrap();

        assert_eq!(transcript.turns().len(), 3);
        assert_eq!(transcript.final_answer(), Some("25"));
        assert!(transcript.is_closed());
    }

    #[test]
    fn unanswered_proposal_blocks_the_next_proposal() {
        let mut transcript = Transcript::new("q");
        transcript.push_proposal("", call("c1")).unwrap();

        let err = transcript.push_proposal("", call("c2")).unwrap_err();
        assert_eq!(err, TranscriptError::ProposalPending("c1".to_string()));
    }

    #[test]
    fn unanswered_proposal_blocks_the_final_answer() {
        let mut transcript = Transcript::new("q");
        transcript.push_proposal("", call("c1")).unwrap();

        let err = transcript.push_final_answer("answer").unwrap_err();
        assert_eq!(err, TranscriptError::ProposalPending("c1".to_string()));
    }

    #[test]
    fn observation_requires_a_matching_pending_call() {
        let mut transcript = Transcript::new("q");
        let err = transcript.push_observation(observation("c1")).unwrap_err();
        assert_eq!(err, TranscriptError::NoPendingProposal);

        transcript.push_proposal("", call("c1")).unwrap();
        let err = transcript.push_observation(observation("c9")).unwrap_err();
        assert_eq!(
            err,
            TranscriptError::CallIdMismatch {
                expected: "c1".to_string(),
                got: "c9".to_string(),
            }
        );
    }

    #[test]
    fn closed_transcript_rejects_everything() {
        let mut transcript = Transcript::new("q");
        transcript.push_final_answer("done").unwrap();

        assert_eq!(
            transcript.push_proposal("", call("c1")).unwrap_err(),
            TranscriptError::Closed
        );
        assert_eq!(
            transcript.push_observation(observation("c1")).unwrap_err(),
            TranscriptError::Closed
        );
        assert_eq!(
            transcript.push_final_answer("again").unwrap_err(),
            TranscriptError::Closed
        );
    }

    #[test]
    fn renders_as_a_model_conversation() {
        let mut transcript = Transcript::new("How many genres?");
        transcript.push_proposal("checking", call("c1")).unwrap();
        transcript.push_observation(observation("c1")).unwrap();
        transcript.push_final_answer("25").unwrap();

        let messages = transcript.to_messages("policy");
        assert_eq!(messages.len(), 5);
        assert_eq!(messages[0].role, MessageRole::System);
        assert_eq!(messages[1].content, "How many genres?");
        assert!(messages[2].tool_calls.is_some());
        assert_eq!(messages[3].role, MessageRole::Tool);
        assert_eq!(messages[3].tool_call_id.as_deref(), Some("c1"));
        assert_eq!(messages[4].content, "25");
    }
}
