use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One logged prompt/response exchange.
///
/// Entries are append-only: once written to a daily log they are never edited
/// in place, only copied (export, upload) or concatenated (import merge).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub timestamp: DateTime<Utc>,
    pub prompt: String,
    pub response: String,
    pub model: String,
}

impl ConversationEntry {
    pub fn new(
        timestamp: DateTime<Utc>,
        prompt: impl Into<String>,
        response: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            prompt: prompt.into(),
            response: response.into(),
            model: model.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_entry_wire_format() {
        let entry = ConversationEntry::new(
            Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
            "hi",
            "hello",
            "gpt-3.5-turbo",
        );
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["prompt"], "hi");
        assert_eq!(json["response"], "hello");
        assert_eq!(json["model"], "gpt-3.5-turbo");
        assert!(json["timestamp"].as_str().unwrap().starts_with("2024-03-01T09:30:00"));
    }

    #[test]
    fn test_entry_reads_browser_timestamps() {
        let json = r#"{
            "timestamp": "2024-03-01T09:30:00.123Z",
            "prompt": "a",
            "response": "b",
            "model": "gpt-4"
        }"#;
        let entry: ConversationEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.timestamp.timestamp_millis() % 1000, 123);
    }
}
