//! Agent lifecycle events
//!
//! The agent reports progress through a one-way sink. Emitting never
//! blocks and never fails; a sink whose observer has gone away drops
//! events silently.

use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;

/// Tag of an [`AgentEvent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Goal,
    Thinking,
    Task,
    System,
    Action,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::Goal => write!(f, "goal"),
            EventKind::Thinking => write!(f, "thinking"),
            EventKind::Task => write!(f, "task"),
            EventKind::System => write!(f, "system"),
            EventKind::Action => write!(f, "action"),
        }
    }
}

/// An event emitted by the agent loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentEvent {
    /// The goal the agent was started with
    Goal(String),
    /// Transient "working" indicator
    Thinking,
    /// A newly known task
    Task(String),
    /// Status or error text
    System(String),
    /// A task result or bookkeeping action
    Action {
        label: String,
        detail: Option<String>,
    },
}

impl AgentEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            AgentEvent::Goal(_) => EventKind::Goal,
            AgentEvent::Thinking => EventKind::Thinking,
            AgentEvent::Task(_) => EventKind::Task,
            AgentEvent::System(_) => EventKind::System,
            AgentEvent::Action { .. } => EventKind::Action,
        }
    }
}

/// Wire shape for hosts that forward events as JSON
#[derive(Debug, Serialize)]
pub struct EventRecord<'a> {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub value: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<&'a str>,
}

impl<'a> From<&'a AgentEvent> for EventRecord<'a> {
    fn from(event: &'a AgentEvent) -> Self {
        let (value, info) = match event {
            AgentEvent::Goal(goal) => (goal.as_str(), None),
            AgentEvent::Thinking => ("", None),
            AgentEvent::Task(task) => (task.as_str(), None),
            AgentEvent::System(text) => (text.as_str(), None),
            AgentEvent::Action { label, detail } => {
                (detail.as_deref().unwrap_or(""), Some(label.as_str()))
            }
        };
        Self {
            kind: event.kind(),
            value,
            info,
        }
    }
}

/// Receiver side of the event stream, supplied by the host
pub trait EventSink: Send + Sync {
    fn emit(&self, event: AgentEvent);
}

impl EventSink for UnboundedSender<AgentEvent> {
    fn emit(&self, event: AgentEvent) {
        // Observer hung up; nothing left to report to
        let _ = self.send(event);
    }
}

/// Typed front for an [`EventSink`]
pub struct EventEmitter {
    sink: Box<dyn EventSink>,
}

impl EventEmitter {
    pub fn new(sink: impl EventSink + 'static) -> Self {
        Self {
            sink: Box::new(sink),
        }
    }

    pub fn goal(&self, goal: &str) {
        self.sink.emit(AgentEvent::Goal(goal.to_string()));
    }

    pub fn thinking(&self) {
        self.sink.emit(AgentEvent::Thinking);
    }

    pub fn task(&self, task: &str) {
        self.sink.emit(AgentEvent::Task(task.to_string()));
    }

    pub fn system(&self, text: &str) {
        self.sink.emit(AgentEvent::System(text.to_string()));
    }

    /// Report the result of executing `task`
    pub fn execution(&self, task: &str, result: &str) {
        self.sink.emit(AgentEvent::Action {
            label: format!("Executing \"{}\"", task),
            detail: Some(result.to_string()),
        });
    }

    pub fn action(&self, label: &str) {
        self.sink.emit(AgentEvent::Action {
            label: label.to_string(),
            detail: None,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn test_emitter_forwards_in_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let emitter = EventEmitter::new(tx);

        emitter.goal("ship it");
        emitter.thinking();
        emitter.execution("write docs", "done");

        assert_eq!(rx.try_recv().unwrap(), AgentEvent::Goal("ship it".to_string()));
        assert_eq!(rx.try_recv().unwrap(), AgentEvent::Thinking);
        assert_eq!(
            rx.try_recv().unwrap(),
            AgentEvent::Action {
                label: "Executing \"write docs\"".to_string(),
                detail: Some("done".to_string()),
            }
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_emit_after_receiver_dropped_is_silent() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let emitter = EventEmitter::new(tx);
        emitter.system("nobody listening");
    }

    #[test]
    fn test_event_record_json() {
        let event = AgentEvent::Action {
            label: "Task marked as complete!".to_string(),
            detail: None,
        };
        let json = serde_json::to_value(EventRecord::from(&event)).unwrap();
        assert_eq!(json["type"], "action");
        assert_eq!(json["info"], "Task marked as complete!");
        assert_eq!(json["value"], "");

        let json = serde_json::to_value(EventRecord::from(&AgentEvent::Thinking)).unwrap();
        assert_eq!(json["type"], "thinking");
        assert!(json.get("info").is_none());
    }
}
