//! Agent state management

use crate::messages::MessageKind;

/// Mutable per-run state owned by the agent loop
#[derive(Debug, Clone)]
pub struct AgentState {
    /// The goal the agent is working toward
    pub goal: String,
    /// Number of iterations started so far
    pub loop_count: u32,
}

impl AgentState {
    pub fn new(goal: impl Into<String>) -> Self {
        Self {
            goal: goal.into(),
            loop_count: 0,
        }
    }

    /// Count a new iteration, returning the updated count
    pub fn increment_loop(&mut self) -> u32 {
        self.loop_count += 1;
        self.loop_count
    }
}

/// Why the agent stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// `stop()` was observed at an iteration boundary
    ManualStop,
    /// The task queue drained
    Completed,
    /// The iteration cap was exceeded
    LoopLimit,
    /// The initial decomposition failed
    StartError,
}

impl Termination {
    /// The system message announcing this termination
    pub fn message_kind(&self) -> MessageKind {
        match self {
            Termination::ManualStop => MessageKind::ManualShutdown,
            Termination::Completed => MessageKind::Completed,
            Termination::LoopLimit => MessageKind::LoopLimit,
            Termination::StartError => MessageKind::StartError,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Termination::LoopLimit | Termination::StartError)
    }
}

impl std::fmt::Display for Termination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Termination::ManualStop => write!(f, "manual-stop"),
            Termination::Completed => write!(f, "completed"),
            Termination::LoopLimit => write!(f, "loop-limit"),
            Termination::StartError => write!(f, "start-error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_state() {
        let mut state = AgentState::new("goal");
        assert_eq!(state.loop_count, 0);
        assert_eq!(state.increment_loop(), 1);
        assert_eq!(state.increment_loop(), 2);
        assert_eq!(state.goal, "goal");
    }

    #[test]
    fn test_termination_display() {
        assert_eq!(Termination::ManualStop.to_string(), "manual-stop");
        assert_eq!(Termination::StartError.to_string(), "start-error");
        assert!(Termination::LoopLimit.is_error());
        assert!(!Termination::Completed.is_error());
    }
}
