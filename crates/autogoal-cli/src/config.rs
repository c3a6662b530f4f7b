//! User configuration for the autogoal CLI
//!
//! Configuration file: ~/.config/autogoal/config.toml (or platform equivalent)

use anyhow::{Context, Result};
use autogoal_core::config::{DEFAULT_MODEL, DEFAULT_PROVIDER_URL, DEFAULT_PROXY_URL};
use autogoal_core::{AgentOptions, Endpoints, LoopLimits, ModelSettings, Pacing};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// User configuration for the autogoal CLI
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserConfig {
    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub credential: CredentialConfig,

    #[serde(default)]
    pub endpoints: EndpointsConfig,

    #[serde(default)]
    pub agent: AgentConfig,
}

/// Model selection and sampling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model identifier
    #[serde(default = "default_model")]
    pub name: String,

    #[serde(default)]
    pub temperature: Option<f32>,

    #[serde(default)]
    pub max_tokens: Option<u32>,
}

/// Provider credential
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CredentialConfig {
    /// Own API key; selects in-process calls and the larger iteration cap
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsConfig {
    #[serde(default = "default_provider_url")]
    pub provider_url: String,

    #[serde(default = "default_proxy_url")]
    pub proxy_url: String,
}

/// Agent loop behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Insert delays between events
    #[serde(default = "default_true")]
    pub pacing: bool,

    /// Per-call timeout in seconds
    #[serde(default)]
    pub call_timeout_secs: Option<u64>,

    #[serde(default = "default_demo_limit")]
    pub demo_loop_limit: u32,

    #[serde(default = "default_custom_limit")]
    pub custom_loop_limit: u32,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_provider_url() -> String {
    DEFAULT_PROVIDER_URL.to_string()
}

fn default_proxy_url() -> String {
    DEFAULT_PROXY_URL.to_string()
}

fn default_true() -> bool {
    true
}

fn default_demo_limit() -> u32 {
    LoopLimits::default().demo
}

fn default_custom_limit() -> u32 {
    LoopLimits::default().custom
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: default_model(),
            temperature: None,
            max_tokens: None,
        }
    }
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            provider_url: default_provider_url(),
            proxy_url: default_proxy_url(),
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            pacing: true,
            call_timeout_secs: None,
            demo_loop_limit: default_demo_limit(),
            custom_loop_limit: default_custom_limit(),
        }
    }
}

/// Values given on the command line (or via env), taking precedence over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub temperature: Option<f32>,
    pub provider_url: Option<String>,
    pub proxy_url: Option<String>,
    pub no_pacing: bool,
}

impl UserConfig {
    /// Load user configuration from default location
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("autogoal").join("config.toml"))
    }

    /// Write a commented default configuration file
    pub fn create_default() -> Result<PathBuf> {
        let path = Self::config_path()?;
        Self::write_default(&path)?;
        Ok(path)
    }

    fn write_default(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists: {}", path.display());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let default_config = r#"# autogoal configuration
# Location: ~/.config/autogoal/config.toml

[model]
# Model identifier
name = "gpt-3.5-turbo"

# Sampling temperature (0.0-2.0)
# temperature = 0.9

# Completion length limit
# max_tokens = 400

[credential]
# Your own provider API key. With a key, model calls are made from this
# machine and the agent may run up to `custom_loop_limit` iterations.
# Without one, calls go through the proxy and the demo limit applies.
# Can also be set with OPENAI_API_KEY.
# api_key = "sk-..."

[endpoints]
provider_url = "https://api.openai.com/v1"
proxy_url = "http://localhost:3000"

[agent]
# Pause between events so progress is readable
pacing = true

# Give up on a single model call after this many seconds
# call_timeout_secs = 120

demo_loop_limit = 4
custom_loop_limit = 100
"#;

        fs::write(path, default_config)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Model settings for the agent, with overrides applied
    pub fn model_settings(&self, overrides: &Overrides) -> ModelSettings {
        let model = overrides
            .model
            .clone()
            .unwrap_or_else(|| self.model.name.clone());
        let api_key = overrides
            .api_key
            .clone()
            .or_else(|| self.credential.api_key.clone());

        ModelSettings::new(model)
            .with_api_key(api_key)
            .with_temperature(overrides.temperature.or(self.model.temperature))
            .with_max_tokens(self.model.max_tokens)
    }

    pub fn endpoints(&self, overrides: &Overrides) -> Endpoints {
        Endpoints {
            provider_url: overrides
                .provider_url
                .clone()
                .unwrap_or_else(|| self.endpoints.provider_url.clone()),
            proxy_url: overrides
                .proxy_url
                .clone()
                .unwrap_or_else(|| self.endpoints.proxy_url.clone()),
        }
    }

    pub fn agent_options(&self, overrides: &Overrides) -> AgentOptions {
        let pacing = if self.agent.pacing && !overrides.no_pacing {
            Pacing::default()
        } else {
            Pacing::none()
        };

        AgentOptions::default()
            .with_pacing(pacing)
            .with_loop_limits(LoopLimits {
                demo: self.agent.demo_loop_limit,
                custom: self.agent.custom_loop_limit,
            })
            .with_call_timeout(self.agent.call_timeout_secs.map(Duration::from_secs))
    }

    /// Copy safe to print: the credential is masked
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if let Some(key) = config.credential.api_key.as_mut() {
            *key = mask(key);
        }
        config
    }
}

fn mask(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = UserConfig::default();
        assert_eq!(config.model.name, "gpt-3.5-turbo");
        assert!(config.agent.pacing);
        assert_eq!(config.agent.demo_loop_limit, 4);
        assert_eq!(config.agent.custom_loop_limit, 100);
        assert!(config.credential.api_key.is_none());
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[model]
name = "gpt-4"
temperature = 0.2

[credential]
api_key = "sk-abcdefghijkl"

[agent]
pacing = false
call_timeout_secs = 30
"#;

        let config: UserConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.model.name, "gpt-4");
        assert_eq!(config.model.temperature, Some(0.2));
        assert_eq!(config.endpoints.proxy_url, "http://localhost:3000");
        assert_eq!(config.agent.custom_loop_limit, 100);

        let options = config.agent_options(&Overrides::default());
        assert_eq!(options.pacing, Pacing::none());
        assert_eq!(options.call_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_overrides_take_precedence() {
        let toml = r#"
[model]
name = "gpt-4"

[credential]
api_key = "sk-from-file"
"#;
        let config: UserConfig = toml::from_str(toml).unwrap();
        let overrides = Overrides {
            model: Some("gpt-4o".to_string()),
            api_key: Some("sk-from-flag".to_string()),
            proxy_url: Some("http://proxy:8080".to_string()),
            ..Default::default()
        };

        let settings = config.model_settings(&overrides);
        assert_eq!(settings.model_name, "gpt-4o");
        assert_eq!(settings.custom_api_key.as_deref(), Some("sk-from-flag"));

        let endpoints = config.endpoints(&overrides);
        assert_eq!(endpoints.proxy_url, "http://proxy:8080");
        assert_eq!(endpoints.provider_url, "https://api.openai.com/v1");
    }

    #[test]
    fn test_blank_key_in_file_means_no_credential() {
        let config: UserConfig = toml::from_str("[credential]\napi_key = \"\"\n").unwrap();
        let settings = config.model_settings(&Overrides::default());
        assert!(!settings.has_custom_credential());
    }

    #[test]
    fn test_redacted_masks_key() {
        let mut config = UserConfig::default();
        config.credential.api_key = Some("sk-abcdefghijkl".to_string());
        assert_eq!(
            config.redacted().credential.api_key.as_deref(),
            Some("****ijkl")
        );

        config.credential.api_key = Some("short".to_string());
        assert_eq!(config.redacted().credential.api_key.as_deref(), Some("****"));
    }

    #[test]
    fn test_default_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("autogoal").join("config.toml");

        UserConfig::write_default(&path).unwrap();
        let config = UserConfig::load_from(&path).unwrap();
        assert_eq!(config.model.name, "gpt-3.5-turbo");
        assert!(config.credential.api_key.is_none());
        assert!(config.agent.pacing);

        // Refuses to overwrite
        assert!(UserConfig::write_default(&path).is_err());
    }
}
