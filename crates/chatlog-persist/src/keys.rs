//! Storage key layout. Values under every key are JSON documents.

pub const CONFIG_KEY: &str = "chatgpt-logger-config";
pub const HISTORY_PREFIX: &str = "chat-history-";
pub const LAST_UPLOAD_KEY: &str = "last-github-upload";
pub const LAST_MORNING_PROMPT_KEY: &str = "last-morning-prompt";

/// Key holding the daily log for `date` (`YYYY-MM-DD`).
pub fn history_key(date: &str) -> String {
    format!("{}{}", HISTORY_PREFIX, date)
}

/// Inverse of [`history_key`].
pub fn history_date(key: &str) -> Option<&str> {
    key.strip_prefix(HISTORY_PREFIX).filter(|d| !d.is_empty())
}
