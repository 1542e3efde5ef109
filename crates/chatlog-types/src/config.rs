use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::date::parse_hhmm;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_UPLOAD_TIME: &str = "22:00";
pub const DEFAULT_CHUNK_SIZE: i64 = 10;
pub const MIN_CHUNK_SIZE: i64 = 1;
pub const MAX_CHUNK_SIZE: i64 = 50;

/// User settings persisted by the client.
///
/// Older persisted records predate some fields, so every field decodes with a
/// named default when it is missing. The record is always rewritten whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default)]
    pub openai_api_key: String,
    #[serde(default)]
    pub github_token: String,
    #[serde(default)]
    pub github_repo: String,
    #[serde(default = "default_upload_time")]
    pub upload_time: String,
    #[serde(default = "default_true")]
    pub auto_upload: bool,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_chunk_size")]
    pub max_chunk_size: i64,
    #[serde(default = "default_true")]
    pub morning_prompt_enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            openai_api_key: String::new(),
            github_token: String::new(),
            github_repo: String::new(),
            upload_time: default_upload_time(),
            auto_upload: true,
            model: default_model(),
            max_chunk_size: DEFAULT_CHUNK_SIZE,
            morning_prompt_enabled: true,
        }
    }
}

fn default_upload_time() -> String {
    DEFAULT_UPLOAD_TIME.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_chunk_size() -> i64 {
    DEFAULT_CHUNK_SIZE
}

fn default_true() -> bool {
    true
}

impl AppConfig {
    /// True iff the completion credential and both hosting fields are set.
    pub fn is_configured(&self) -> bool {
        !self.openai_api_key.is_empty()
            && !self.github_token.is_empty()
            && !self.github_repo.is_empty()
    }

    pub fn has_github(&self) -> bool {
        !self.github_token.is_empty() && !self.github_repo.is_empty()
    }

    /// Import batch size, clamped into `[MIN_CHUNK_SIZE, MAX_CHUNK_SIZE]`.
    pub fn chunk_size(&self) -> usize {
        self.max_chunk_size.clamp(MIN_CHUNK_SIZE, MAX_CHUNK_SIZE) as usize
    }

    /// Configured daily upload time, falling back to the default on bad input.
    pub fn upload_time(&self) -> NaiveTime {
        parse_hhmm(&self.upload_time)
            .or_else(|| parse_hhmm(DEFAULT_UPLOAD_TIME))
            .unwrap_or(NaiveTime::MIN)
    }

    /// Fill empty credentials from `OPENAI_API_KEY`, `GITHUB_TOKEN` and
    /// `GITHUB_REPO`. Values already present are never overwritten.
    pub fn apply_env_defaults(&mut self) {
        self.apply_defaults_from(|name| std::env::var(name).ok());
    }

    pub fn apply_defaults_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let fields: [(&str, &mut String); 3] = [
            ("OPENAI_API_KEY", &mut self.openai_api_key),
            ("GITHUB_TOKEN", &mut self.github_token),
            ("GITHUB_REPO", &mut self.github_repo),
        ];

        for (name, field) in fields {
            if field.is_empty() {
                if let Some(value) = lookup(name).filter(|v| !v.trim().is_empty()) {
                    *field = value.trim().to_string();
                }
            }
        }
    }
}
