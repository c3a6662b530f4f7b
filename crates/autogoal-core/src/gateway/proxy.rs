//! Gateway that delegates model calls to a backend endpoint

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{ModelGateway, PlanRequest};
use crate::config::ModelSettings;
use crate::openai::http_client;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChainRequest<'a> {
    model_settings: &'a ModelSettings,
    goal: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateRequest<'a> {
    model_settings: &'a ModelSettings,
    goal: &'a str,
    tasks: &'a [String],
    last_task: &'a str,
    result: &'a str,
    completed_tasks: &'a [String],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExecuteRequest<'a> {
    model_settings: &'a ModelSettings,
    goal: &'a str,
    task: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TasksResponse {
    new_tasks: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ExecuteResponse {
    response: String,
}

pub struct ProxyGateway {
    base_url: String,
    settings: ModelSettings,
    client: reqwest::Client,
}

impl ProxyGateway {
    pub fn new(settings: ModelSettings, proxy_url: &str, timeout: Option<Duration>) -> Result<Self> {
        Ok(Self {
            base_url: proxy_url.trim_end_matches('/').to_string(),
            settings,
            client: http_client(timeout)?,
        })
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);

        self.client
            .post(&url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", url))?
            .error_for_status()
            .with_context(|| format!("{} returned an error status", path))?
            .json()
            .await
            .with_context(|| format!("Failed to parse {} response", path))
    }
}

#[async_trait]
impl ModelGateway for ProxyGateway {
    async fn decompose_goal(&self, goal: &str) -> Result<Vec<String>> {
        let body = ChainRequest {
            model_settings: &self.settings,
            goal,
        };
        let resp: TasksResponse = self.post("/api/chain", &body).await?;
        Ok(resp.new_tasks)
    }

    async fn plan_next_tasks(&self, request: PlanRequest<'_>) -> Result<Vec<String>> {
        let body = CreateRequest {
            model_settings: &self.settings,
            goal: request.goal,
            tasks: request.pending,
            last_task: request.last_task,
            result: request.last_result,
            completed_tasks: request.completed,
        };
        let resp: TasksResponse = self.post("/api/create", &body).await?;
        Ok(resp.new_tasks)
    }

    async fn execute_task(&self, goal: &str, task: &str) -> Result<String> {
        let body = ExecuteRequest {
            model_settings: &self.settings,
            goal,
            task,
        };
        let resp: ExecuteResponse = self.post("/api/execute", &body).await?;
        Ok(resp.response)
    }
}
