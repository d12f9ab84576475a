//! Session result representation

use super::turn::Transcript;
use crate::llm::LlmUsage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The result of a completed session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Session identifier
    pub session_id: Uuid,
    /// The final natural-language answer
    pub answer: String,
    /// Proposal/observation round-trips used
    pub rounds: u32,
    /// Total token usage across all model calls
    pub usage: LlmUsage,
    /// Full session history
    pub transcript: Transcript,
    /// Session start time
    pub started_at: DateTime<Utc>,
    /// Session completion time
    pub completed_at: DateTime<Utc>,
}

impl SessionReport {
    /// Wall-clock duration of the session
    pub fn duration(&self) -> chrono::Duration {
        self.completed_at - self.started_at
    }

    /// One-line summary for logs
    pub fn summary(&self) -> String {
        format!(
            "answered in {} rounds, {} tokens, {:.2}s",
            self.rounds,
            self.usage.total_tokens,
            self.duration().num_milliseconds() as f64 / 1000.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_reports_rounds_and_tokens() {
        let started = Utc::now();
        let report = SessionReport {
            session_id: Uuid::new_v4(),
            answer: "25".to_string(),
            rounds: 4,
            usage: LlmUsage {
                prompt_tokens: 900,
                completion_tokens: 100,
                total_tokens: 1000,
            },
            transcript: Transcript::new("q"),
            started_at: started,
            completed_at: started + chrono::Duration::milliseconds(1500),
        };

        let summary = report.summary();
        assert!(summary.contains("4 rounds"));
        assert!(summary.contains("1000 tokens"));
        assert!(summary.contains("1.50s"));
    }
}
