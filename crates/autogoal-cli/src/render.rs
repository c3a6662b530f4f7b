//! Rendering of agent events on the terminal

use std::io::IsTerminal;

use autogoal_core::{AgentEvent, EventRecord};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::progress::{supports_unicode, ThinkingIndicator};

// ANSI colors
const GREEN: &str = "\x1b[92m";
const BLUE: &str = "\x1b[94m";
const YELLOW: &str = "\x1b[93m";
const CYAN: &str = "\x1b[96m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Colored lines with a thinking spinner
    Pretty,
    /// One JSON object per event
    Json,
}

/// How pretty lines are decorated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub unicode: bool,
    pub color: bool,
}

impl Style {
    /// Colors only when stdout is a terminal
    pub fn detect() -> Self {
        Self {
            unicode: supports_unicode(),
            color: std::io::stdout().is_terminal(),
        }
    }

    pub const fn plain() -> Self {
        Self {
            unicode: false,
            color: false,
        }
    }

    fn icon(&self, fancy: &'static str, plain: &'static str) -> &'static str {
        if self.unicode {
            fancy
        } else {
            plain
        }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("{}{}{}", code, text, RESET)
        } else {
            text.to_string()
        }
    }
}

/// Drain the event stream until the agent drops its sender
pub async fn render(mut events: UnboundedReceiver<AgentEvent>, mode: OutputMode) {
    let style = Style::detect();
    let mut thinking = ThinkingIndicator::new(style.unicode);

    while let Some(event) = events.recv().await {
        match mode {
            OutputMode::Json => {
                if let Ok(line) = serde_json::to_string(&EventRecord::from(&event)) {
                    println!("{}", line);
                }
            }
            OutputMode::Pretty => {
                if event == AgentEvent::Thinking {
                    thinking.start();
                    continue;
                }
                thinking.stop();
                if let Some(text) = format_event(&event, style) {
                    println!("{}", text);
                }
            }
        }
    }

    thinking.stop();
}

/// Pretty form of an event; `None` for events with no visible line
pub fn format_event(event: &AgentEvent, style: Style) -> Option<String> {
    match event {
        AgentEvent::Thinking => None,
        AgentEvent::Goal(goal) => Some(format!(
            "{} {}",
            style.paint(
                BLUE,
                &format!("{} Embarking on a new goal:", style.icon("🎯", "*"))
            ),
            goal
        )),
        AgentEvent::Task(task) => Some(format!(
            "{} {}",
            style.paint(CYAN, &format!("{} Added task:", style.icon("📝", "+"))),
            task
        )),
        AgentEvent::System(text) => Some(style.paint(YELLOW, text)),
        AgentEvent::Action { label, detail } => {
            let mut line = style.paint(GREEN, &format!("{} {}", style.icon("✓", ">"), label));
            if let Some(detail) = detail.as_deref().filter(|d| !d.is_empty()) {
                for row in detail.lines() {
                    line.push_str("\n  ");
                    line.push_str(&style.paint(DIM, row));
                }
            }
            Some(line)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thinking_has_no_line() {
        assert!(format_event(&AgentEvent::Thinking, Style::detect()).is_none());
    }

    #[test]
    fn test_task_line() {
        let event = AgentEvent::Task("draft haiku".to_string());
        let line = format_event(&event, Style::plain()).unwrap();
        assert!(line.contains("+ Added task:"));
        assert!(line.ends_with("draft haiku"));
    }

    #[test]
    fn test_action_detail_indented() {
        let event = AgentEvent::Action {
            label: "Executing \"draft\"".to_string(),
            detail: Some("line one\nline two".to_string()),
        };
        let text = format_event(&event, Style::plain()).unwrap();
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows.len(), 3);
        assert!(rows[0].contains("Executing \"draft\""));
        assert!(rows[2].contains("line two"));
    }

    #[test]
    fn test_bookkeeping_action_single_line() {
        let event = AgentEvent::Action {
            label: "Task marked as complete!".to_string(),
            detail: None,
        };
        assert_eq!(format_event(&event, Style::plain()).unwrap().lines().count(), 1);
    }

    #[test]
    fn test_plain_style_has_no_escape_codes() {
        let events = [
            AgentEvent::Goal("write a haiku".to_string()),
            AgentEvent::Task("draft haiku".to_string()),
            AgentEvent::System("All tasks completed".to_string()),
            AgentEvent::Action {
                label: "Executing \"draft haiku\"".to_string(),
                detail: Some("Leaves fall".to_string()),
            },
        ];
        for event in &events {
            let line = format_event(event, Style::plain()).unwrap();
            assert!(!line.contains('\x1b'), "escape code in {:?}", line);
        }
    }

    #[test]
    fn test_colored_style_wraps_label() {
        let style = Style {
            unicode: false,
            color: true,
        };
        let line = format_event(&AgentEvent::System("done".to_string()), style).unwrap();
        assert_eq!(line, format!("{}done{}", YELLOW, RESET));
    }

    #[tokio::test]
    async fn test_render_ends_when_sender_dropped() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        tx.send(AgentEvent::Goal("g".to_string())).unwrap();
        tx.send(AgentEvent::Thinking).unwrap();
        drop(tx);
        render(rx, OutputMode::Json).await;
    }
}
