//! Agent configuration
//!
//! `ModelSettings` is the per-run model configuration that travels with
//! every gateway call. `AgentOptions` holds the knobs that shape the loop
//! itself (pacing, iteration caps, call timeout).

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default model used when none is configured
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Default chat-completions base URL for the direct strategy
pub const DEFAULT_PROVIDER_URL: &str = "https://api.openai.com/v1";

/// Default backend base URL for the proxied strategy
pub const DEFAULT_PROXY_URL: &str = "http://localhost:3000";

/// Model configuration, fixed for the lifetime of an agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSettings {
    /// Caller-supplied provider credential
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_credential"
    )]
    pub custom_api_key: Option<String>,
    /// Model identifier
    #[serde(rename = "customModelName", default = "default_model")]
    pub model_name: String,
    #[serde(rename = "customTemperature", default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(rename = "customMaxTokens", default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn deserialize_credential<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(normalize_credential(raw))
}

/// Blank credentials count as absent
fn normalize_credential(raw: Option<String>) -> Option<String> {
    raw.map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            custom_api_key: None,
            model_name: default_model(),
            temperature: None,
            max_tokens: None,
        }
    }
}

impl ModelSettings {
    pub fn new(model_name: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            ..Default::default()
        }
    }

    pub fn with_api_key(mut self, key: Option<String>) -> Self {
        self.custom_api_key = normalize_credential(key);
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Whether the caller supplied their own credential
    pub fn has_custom_credential(&self) -> bool {
        self.custom_api_key.is_some()
    }
}

/// Base URLs for the two gateway strategies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub provider_url: String,
    pub proxy_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            provider_url: DEFAULT_PROVIDER_URL.to_string(),
            proxy_url: DEFAULT_PROXY_URL.to_string(),
        }
    }
}

/// Delays inserted between events to pace UI feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Wait before each `task` event
    pub task_delay: Duration,
    /// Wait before dequeuing and before re-planning
    pub iteration_delay: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            task_delay: Duration::from_millis(800),
            iteration_delay: Duration::from_millis(1000),
        }
    }
}

impl Pacing {
    /// No delays, for non-interactive hosts and tests
    pub fn none() -> Self {
        Self {
            task_delay: Duration::ZERO,
            iteration_delay: Duration::ZERO,
        }
    }
}

/// Iteration caps, selected by credential presence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopLimits {
    pub demo: u32,
    pub custom: u32,
}

impl Default for LoopLimits {
    fn default() -> Self {
        Self {
            demo: 4,
            custom: 100,
        }
    }
}

impl LoopLimits {
    pub fn cap_for(&self, has_credential: bool) -> u32 {
        if has_credential {
            self.custom
        } else {
            self.demo
        }
    }
}

/// Options shaping the agent loop
#[derive(Debug, Clone, Default)]
pub struct AgentOptions {
    pub pacing: Pacing,
    pub loop_limits: LoopLimits,
    /// Upper bound on a single gateway call; `None` waits indefinitely
    pub call_timeout: Option<Duration>,
}

impl AgentOptions {
    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_loop_limits(mut self, limits: LoopLimits) -> Self {
        self.loop_limits = limits;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.call_timeout = timeout;
        self
    }
}
