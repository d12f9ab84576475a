//! Session state machine

use serde::{Deserialize, Serialize};

/// Current state of a reasoning-loop session.
///
/// The loop alternates Proposing and Observing until it reaches Done (a
/// final answer) or jumps straight to Terminated (cancellation, timeout,
/// round cap, policy abort).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Session created, transcript not yet seeded
    Start,
    /// Waiting on the model for the next action
    Proposing,
    /// Executing the proposed tool call
    Observing,
    /// A final answer was produced
    Done,
    /// Session over, successfully or not
    Terminated,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Start => write!(f, "start"),
            SessionState::Proposing => write!(f, "proposing"),
            SessionState::Observing => write!(f, "observing"),
            SessionState::Done => write!(f, "done"),
            SessionState::Terminated => write!(f, "terminated"),
        }
    }
}

impl SessionState {
    /// Whether the session is over
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Terminated)
    }

    /// Whether the loop is actively working
    pub fn is_active(&self) -> bool {
        matches!(self, SessionState::Proposing | SessionState::Observing)
    }

    /// Check if a transition to another state is valid
    pub fn can_transition_to(&self, target: SessionState) -> bool {
        match (self, target) {
            (SessionState::Start, SessionState::Proposing) => true,
            // The model either proposes an action or answers; fatal errors
            // terminate from anywhere active.
            (
                SessionState::Proposing,
                SessionState::Observing | SessionState::Done | SessionState::Terminated,
            ) => true,
            (SessionState::Observing, SessionState::Proposing | SessionState::Terminated) => true,
            (SessionState::Done, SessionState::Terminated) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_transitions_are_valid() {
        assert!(SessionState::Start.can_transition_to(SessionState::Proposing));
        assert!(SessionState::Proposing.can_transition_to(SessionState::Observing));
        assert!(SessionState::Observing.can_transition_to(SessionState::Proposing));
        assert!(SessionState::Proposing.can_transition_to(SessionState::Done));
        assert!(SessionState::Done.can_transition_to(SessionState::Terminated));
    }

    #[test]
    fn fatal_exits_terminate_from_active_states() {
        assert!(SessionState::Proposing.can_transition_to(SessionState::Terminated));
        assert!(SessionState::Observing.can_transition_to(SessionState::Terminated));
    }

    #[test]
    fn invalid_transitions_are_rejected() {
        assert!(!SessionState::Start.can_transition_to(SessionState::Observing));
        assert!(!SessionState::Start.can_transition_to(SessionState::Done));
        assert!(!SessionState::Observing.can_transition_to(SessionState::Done));
        assert!(!SessionState::Terminated.can_transition_to(SessionState::Proposing));
        assert!(!SessionState::Done.can_transition_to(SessionState::Proposing));
    }

    #[test]
    fn terminal_and_active_classification() {
        assert!(SessionState::Terminated.is_terminal());
        assert!(!SessionState::Done.is_terminal());
        assert!(SessionState::Proposing.is_active());
        assert!(SessionState::Observing.is_active());
        assert!(!SessionState::Start.is_active());
    }
}
