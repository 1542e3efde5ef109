use chrono::{DateTime, Utc};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use chatlog_types::ConversationEntry;

use crate::error::{ClientError, Result};

pub const DEFAULT_SERVER: &str = "http://127.0.0.1:3000";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatReply {
    pub response: String,
    pub model: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UploadReceipt {
    pub success: bool,
    pub url: Option<String>,
    pub message: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerReply {
    #[serde(default)]
    pub message: Option<String>,
    pub is_running: bool,
    #[serde(default)]
    pub upload_time: Option<String>,
    #[serde(default)]
    pub last_check: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowsCommand {
    pub powershell_command: String,
    pub task_name: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TaskAction {
    Create,
    Remove,
    Status,
}

/// HTTP client for the chatlog relay service.
#[derive(Debug, Clone)]
pub struct RelayClient {
    client: Client,
    base_url: String,
}

impl RelayClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("chatlog/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn chat(&self, prompt: &str, api_key: &str, model: &str) -> Result<ChatReply> {
        self.post(
            "/api/chat",
            &json!({"prompt": prompt, "apiKey": api_key, "model": model}),
        )
        .await
    }

    pub async fn upload(
        &self,
        history: &[ConversationEntry],
        github_token: &str,
        github_repo: &str,
    ) -> Result<UploadReceipt> {
        self.post(
            "/api/github/upload",
            &json!({
                "chatHistory": history,
                "githubToken": github_token,
                "githubRepo": github_repo,
            }),
        )
        .await
    }

    pub async fn start_scheduler(
        &self,
        upload_time: &str,
        github_token: &str,
        github_repo: &str,
    ) -> Result<SchedulerReply> {
        self.post(
            "/api/scheduler",
            &json!({
                "action": "start",
                "uploadTime": upload_time,
                "config": {"githubToken": github_token, "githubRepo": github_repo},
            }),
        )
        .await
    }

    pub async fn stop_scheduler(&self) -> Result<SchedulerReply> {
        self.post("/api/scheduler", &json!({"action": "stop"})).await
    }

    pub async fn scheduler_status(&self) -> Result<SchedulerReply> {
        let response = self
            .client
            .get(format!("{}/api/scheduler", self.base_url))
            .send()
            .await?;
        decode(response).await
    }

    pub async fn windows_command(
        &self,
        action: TaskAction,
        upload_time: Option<&str>,
        script_path: Option<&str>,
    ) -> Result<WindowsCommand> {
        self.post(
            "/api/windows-scheduler",
            &json!({
                "action": action,
                "uploadTime": upload_time,
                "scriptPath": script_path,
            }),
        )
        .await
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, body: &Value) -> Result<T> {
        tracing::debug!(path, "Calling relay");
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;
        decode(response).await
    }
}

/// Decode a success body, or turn the relay's `{"error": ...}` body into
/// [`ClientError::Relay`].
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&text)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| format!("Relay request failed: {}", status));

    Err(ClientError::Relay {
        status: status.as_u16(),
        message,
    })
}
