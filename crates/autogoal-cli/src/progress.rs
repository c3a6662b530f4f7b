//! "Thinking" indicator shown while the agent waits on the model

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// ASCII frames for terminals without Unicode; the last one is the finished state
const ASCII_TICKS: &str = "|/-\\ ";

/// Spinner drawn on stderr between agent events
///
/// indicatif draws nothing when stderr is not a terminal, so redirected
/// runs never see spinner frames or cursor codes.
pub struct ThinkingIndicator {
    bar: Option<ProgressBar>,
    unicode: bool,
}

impl ThinkingIndicator {
    pub fn new(unicode: bool) -> Self {
        Self { bar: None, unicode }
    }

    /// Show the spinner; no-op if it is already showing
    pub fn start(&mut self) {
        if self.bar.is_some() {
            return;
        }

        let mut style = ProgressStyle::default_spinner()
            .template("{spinner:.dim} {msg:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        if !self.unicode {
            style = style.tick_chars(ASCII_TICKS);
        }

        let bar = ProgressBar::new_spinner();
        bar.set_style(style);
        bar.set_message("Thinking...");
        bar.enable_steady_tick(Duration::from_millis(80));
        self.bar = Some(bar);
    }

    /// Remove the spinner line
    pub fn stop(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

impl Drop for ThinkingIndicator {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Check if the terminal likely supports Unicode
pub fn supports_unicode() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term.contains("xterm") || term.contains("256color") || term.contains("kitty") {
            return true;
        }
    }

    ["LC_ALL", "LC_CTYPE", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .any(|val| val.to_lowercase().contains("utf"))
}
