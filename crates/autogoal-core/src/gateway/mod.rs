//! Model call gateway
//!
//! The agent loop talks to the model through [`ModelGateway`]. Two
//! implementations exist: [`DirectGateway`] calls the provider from this
//! process with the caller's credential, [`ProxyGateway`] asks a backend
//! to make the call. Which one is used is decided once, from credential
//! presence, when the gateway is built.

mod direct;
pub mod prompts;
mod proxy;

pub use direct::DirectGateway;
pub use proxy::ProxyGateway;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use crate::config::{Endpoints, ModelSettings};

/// Inputs to a re-planning call
#[derive(Debug, Clone, Copy)]
pub struct PlanRequest<'a> {
    pub goal: &'a str,
    pub pending: &'a [String],
    pub last_task: &'a str,
    pub last_result: &'a str,
    pub completed: &'a [String],
}

/// The three model-backed operations the agent depends on
///
/// Any failure (bad credential, policy rejection, network, malformed
/// response) is reported as a plain `Err`.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Turn a goal into the initial task list
    async fn decompose_goal(&self, goal: &str) -> Result<Vec<String>>;

    /// Propose follow-on tasks after executing one; may be empty
    async fn plan_next_tasks(&self, request: PlanRequest<'_>) -> Result<Vec<String>>;

    /// Perform a task and return its result text
    async fn execute_task(&self, goal: &str, task: &str) -> Result<String>;
}

/// Where model calls are issued from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// In-process, with the caller's credential
    Direct,
    /// Through the backend proxy
    Proxied,
}

impl Strategy {
    pub fn for_settings(settings: &ModelSettings) -> Self {
        if settings.has_custom_credential() {
            Strategy::Direct
        } else {
            Strategy::Proxied
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Direct => write!(f, "direct"),
            Strategy::Proxied => write!(f, "proxied"),
        }
    }
}

/// Build the gateway matching the settings' strategy
///
/// `timeout` bounds each HTTP request; `None` leaves requests unbounded.
pub fn connect(
    settings: &ModelSettings,
    endpoints: &Endpoints,
    timeout: Option<Duration>,
) -> Result<Arc<dyn ModelGateway>> {
    let strategy = Strategy::for_settings(settings);
    info!(%strategy, model = %settings.model_name, "Selected model gateway");

    let settings = settings.clone();
    let gateway: Arc<dyn ModelGateway> = match strategy {
        Strategy::Direct => Arc::new(DirectGateway::new(settings, &endpoints.provider_url, timeout)?),
        Strategy::Proxied => Arc::new(ProxyGateway::new(settings, &endpoints.proxy_url, timeout)?),
    };
    Ok(gateway)
}
