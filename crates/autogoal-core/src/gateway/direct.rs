//! In-process gateway using the caller's credential

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tracing::debug;

use super::{prompts, ModelGateway, PlanRequest};
use crate::config::ModelSettings;
use crate::openai::{ChatClient, ChatMessage, ChatOptions};

pub struct DirectGateway {
    client: ChatClient,
    settings: ModelSettings,
}

impl DirectGateway {
    pub fn new(
        settings: ModelSettings,
        provider_url: &str,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let api_key = settings
            .custom_api_key
            .clone()
            .context("Direct gateway requires an API key")?;
        let client = ChatClient::new(provider_url, api_key, timeout)?;
        Ok(Self { client, settings })
    }

    async fn prompt(&self, prompt: String) -> Result<String> {
        let options = ChatOptions {
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };
        self.client
            .complete(&self.settings.model_name, &[ChatMessage::user(prompt)], options)
            .await
    }
}

#[async_trait]
impl ModelGateway for DirectGateway {
    async fn decompose_goal(&self, goal: &str) -> Result<Vec<String>> {
        let completion = self.prompt(prompts::decompose(goal)).await?;
        debug!(completion_len = completion.len(), "Decompose completion");
        prompts::parse_task_list(&completion, &[])
    }

    async fn plan_next_tasks(&self, request: PlanRequest<'_>) -> Result<Vec<String>> {
        let prompt = prompts::plan(
            request.goal,
            request.pending,
            request.last_task,
            request.last_result,
        );
        let completion = self.prompt(prompt).await?;
        debug!(completion_len = completion.len(), "Plan completion");
        prompts::parse_task_list(&completion, request.completed)
    }

    async fn execute_task(&self, goal: &str, task: &str) -> Result<String> {
        let completion = self.prompt(prompts::execute(goal, task)).await?;
        let result = completion.trim();
        if result.is_empty() {
            bail!("Model returned an empty result");
        }
        Ok(result.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_credential() {
        let settings = ModelSettings::default();
        assert!(DirectGateway::new(settings, "https://api.openai.com/v1", None).is_err());

        let settings = ModelSettings::default().with_api_key(Some("sk-test".to_string()));
        assert!(DirectGateway::new(settings, "https://api.openai.com/v1", None).is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_provider_fails() {
        let settings = ModelSettings::default().with_api_key(Some("sk-test".to_string()));
        // Port 9 (discard) on localhost is not an HTTP server
        let gateway = DirectGateway::new(settings, "http://127.0.0.1:9", None).unwrap();
        assert!(gateway.decompose_goal("anything").await.is_err());
    }
}
