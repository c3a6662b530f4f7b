//! User-facing status text
//!
//! Some messages carry different remediation advice depending on whether
//! the caller supplied their own credential. They are looked up by
//! `(MessageKind, has_credential)` so the loop never branches on wording.

/// Label of the action emitted when re-planning yields no new tasks
pub const TASK_COMPLETE: &str = "Task marked as complete!";

/// Label of the action emitted when an iteration fails and is skipped
pub const TASK_COMPLETE_AFTER_ERROR: &str = "Task marked as complete.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// Initial decomposition failed
    StartError,
    /// Iteration cap exceeded
    LoopLimit,
    /// Execute or re-plan failed; the loop continues
    IterationError,
    /// `stop()` was observed
    ManualShutdown,
    /// Task queue drained
    Completed,
}

/// Look up the message for `kind`
pub fn message(kind: MessageKind, has_credential: bool) -> &'static str {
    match (kind, has_credential) {
        (MessageKind::StartError, false) => {
            "ERROR retrieving initial tasks array. Retry, make your goal more clear, or revise \
             your goal such that it is within our model's policies to run. Shutting Down."
        }
        (MessageKind::StartError, true) => {
            "ERROR retrieving initial tasks array. Make sure your API key is not the free tier, \
             make your goal more clear, or revise your goal such that it is within our model's \
             policies to run. Shutting Down."
        }
        (MessageKind::LoopLimit, false) => {
            "Sorry, because this is a demo, we cannot have our agents running for too long. \
             If you would like to run longer, please provide your own API key in the settings. \
             Shutting down."
        }
        (MessageKind::LoopLimit, true) => {
            "This agent has been running for too long. To save your wallet and our \
             infrastructure costs, this agent is shutting down. The iteration budget can be \
             raised in the agent configuration."
        }
        (MessageKind::IterationError, _) => {
            "ERROR adding additional task(s). It might have been against our model's policies \
             to run them. Continuing."
        }
        (MessageKind::ManualShutdown, _) => "The agent has been manually shutdown.",
        (MessageKind::Completed, _) => "All tasks completed. Shutting down.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_sensitive_messages_differ() {
        for kind in [MessageKind::StartError, MessageKind::LoopLimit] {
            assert_ne!(message(kind, false), message(kind, true));
        }
        assert!(message(MessageKind::StartError, true).contains("API key"));
        assert!(message(MessageKind::LoopLimit, false).contains("demo"));
    }

    #[test]
    fn test_shared_messages_ignore_credential() {
        for kind in [
            MessageKind::IterationError,
            MessageKind::ManualShutdown,
            MessageKind::Completed,
        ] {
            assert_eq!(message(kind, false), message(kind, true));
        }
    }
}
