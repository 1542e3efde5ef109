use std::path::Path;

use chrono::{DateTime, Local};
use serde_json::json;

use chatlog_persist::import::to_flat_conversation;
use chatlog_persist::{ImportOptions, ImportReport, PersistClient};
use chatlog_types::{date_key, today, AppConfig, ConversationEntry};

use crate::error::{ClientError, Result};
use crate::relay::{RelayClient, SchedulerReply, TaskAction, UploadReceipt, WindowsCommand};

pub const MORNING_PROMPT: &str =
    "Good morning! What are you planning to work on today, and what would you like help with first?";

/// A day's log rendered for saving to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub filename: String,
    pub contents: String,
}

/// One user's logging session: local logs plus calls through the relay.
///
/// The config is loaded once (merged with defaults) and written back whole
/// on every change.
pub struct Logger {
    persist: PersistClient,
    relay: RelayClient,
    config: AppConfig,
}

impl Logger {
    pub fn new(persist: PersistClient, relay: RelayClient) -> Self {
        let config = persist.config().load();
        Self {
            persist,
            relay,
            config,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn persist(&self) -> &PersistClient {
        &self.persist
    }

    pub fn relay(&self) -> &RelayClient {
        &self.relay
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Apply `edit` and persist the whole record.
    pub fn update_config(&mut self, edit: impl FnOnce(&mut AppConfig)) -> Result<&AppConfig> {
        let mut next = self.config.clone();
        edit(&mut next);
        self.persist.config().save(&next)?;
        self.config = next;
        Ok(&self.config)
    }

    pub fn history(&self, date: &str) -> Vec<ConversationEntry> {
        self.persist.history().get(date)
    }

    pub fn today_history(&self) -> Vec<ConversationEntry> {
        self.history(&today())
    }

    pub fn days(&self) -> Vec<String> {
        self.persist.history().dates()
    }

    pub fn last_upload(&self) -> Option<String> {
        self.persist.markers().last_upload()
    }

    /// Relay `prompt` and append the exchange to today's log.
    pub async fn send_prompt(&self, prompt: &str) -> Result<ConversationEntry> {
        if prompt.trim().is_empty() {
            return Err(ClientError::NotReady("Prompt is empty"));
        }
        if self.config.openai_api_key.is_empty() {
            return Err(ClientError::NotReady("OpenAI API key is not configured"));
        }

        let reply = self
            .relay
            .chat(prompt, &self.config.openai_api_key, &self.config.model)
            .await?;

        let entry = ConversationEntry::new(reply.timestamp, prompt, reply.response, reply.model);
        self.persist.history().append(&today(), entry.clone())?;

        tracing::info!(model = %entry.model, "Logged exchange");
        Ok(entry)
    }

    /// Push today's log to the configured repository.
    pub async fn upload_today(&self) -> Result<UploadReceipt> {
        self.upload_day(&today()).await
    }

    async fn upload_day(&self, date: &str) -> Result<UploadReceipt> {
        if !self.config.has_github() {
            return Err(ClientError::NotReady("GitHub configuration is missing"));
        }

        let history = self.history(date);
        if history.is_empty() {
            return Err(ClientError::NotReady("No chat history to upload"));
        }

        let receipt = self
            .relay
            .upload(&history, &self.config.github_token, &self.config.github_repo)
            .await?;

        self.persist.markers().set_last_upload(&receipt.date)?;
        tracing::info!(date = %receipt.date, entries = history.len(), "Uploaded daily log");
        Ok(receipt)
    }

    /// Upload today's log once the configured time has passed, at most once
    /// per day. Returns `None` when nothing was due.
    pub async fn auto_upload_if_due(&self, now: DateTime<Local>) -> Result<Option<UploadReceipt>> {
        if !self.config.auto_upload || !self.config.has_github() {
            return Ok(None);
        }
        if now.time() < self.config.upload_time() {
            return Ok(None);
        }

        let date = date_key(now.date_naive());
        if self.last_upload().as_deref() == Some(date.as_str()) {
            return Ok(None);
        }
        if self.history(&date).is_empty() {
            tracing::debug!(date = %date, "Upload due but nothing logged yet");
            return Ok(None);
        }

        self.upload_day(&date).await.map(Some)
    }

    /// Start or stop the relay's scheduler.
    pub async fn toggle_scheduler(&self, start: bool) -> Result<SchedulerReply> {
        if !start {
            return self.relay.stop_scheduler().await;
        }

        self.relay
            .start_scheduler(
                &self.config.upload_time,
                &self.config.github_token,
                &self.config.github_repo,
            )
            .await
    }

    pub async fn scheduler_status(&self) -> Result<SchedulerReply> {
        self.relay.scheduler_status().await
    }

    /// Task Scheduler command for the configured upload time.
    pub async fn windows_command(
        &self,
        action: TaskAction,
        script_path: Option<&str>,
    ) -> Result<WindowsCommand> {
        self.relay
            .windows_command(action, Some(&self.config.upload_time), script_path)
            .await
    }

    /// Today's log as pretty JSON, either raw or as a re-importable
    /// conversation list.
    pub fn export_today(&self, as_conversation: bool) -> Result<Export> {
        self.export_day(&today(), as_conversation)
    }

    pub fn export_day(&self, date: &str, as_conversation: bool) -> Result<Export> {
        let history = self.history(date);

        let contents = if as_conversation {
            let title = format!("Chat logs {}", date);
            serde_json::to_string_pretty(&json!([to_flat_conversation(&title, &history)]))?
        } else {
            serde_json::to_string_pretty(&history)?
        };

        Ok(Export {
            filename: format!("chat-logs-{}.json", date),
            contents,
        })
    }

    /// Read an export file whole and merge its conversations into the logs.
    pub async fn import_file(&self, path: impl AsRef<Path>) -> Result<ImportReport> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path).await?;

        tracing::info!(path = %path.display(), bytes = text.len(), "Importing export file");
        let report = self
            .persist
            .importer(ImportOptions::from_config(&self.config))
            .run(&text)
            .await?;
        Ok(report)
    }

    /// The morning greeting, once per day while enabled.
    pub fn morning_prompt(&self, now: DateTime<Local>) -> Result<Option<&'static str>> {
        if !self.config.morning_prompt_enabled {
            return Ok(None);
        }

        let date = date_key(now.date_naive());
        let markers = self.persist.markers();
        if markers.last_morning_prompt().as_deref() == Some(date.as_str()) {
            return Ok(None);
        }

        markers.set_last_morning_prompt(&date)?;
        Ok(Some(MORNING_PROMPT))
    }

    /// Wipe every stored key and fall back to the default config.
    pub fn reset(&mut self) -> Result<()> {
        self.persist.reset()?;
        self.config = AppConfig::default();
        Ok(())
    }
}
