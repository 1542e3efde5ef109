use std::sync::Arc;

use chatlog_types::AppConfig;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::keys::CONFIG_KEY;
use crate::store::LogStore;

#[derive(Clone)]
pub struct ConfigRepository {
    store: Arc<dyn LogStore>,
}

impl ConfigRepository {
    pub fn new(store: Arc<dyn LogStore>) -> Self {
        Self { store }
    }

    /// Load the persisted config, defaulting any field the record lacks.
    ///
    /// Fields are decoded one at a time: a field with the wrong type falls
    /// back to its default without discarding the rest of the record. A
    /// missing record, or one that is not an object, yields
    /// `AppConfig::default()`.
    pub fn load(&self) -> AppConfig {
        let mut config = AppConfig::default();
        let record = match self.store.get(CONFIG_KEY) {
            None => return config,
            Some(Value::Object(record)) => record,
            Some(_) => {
                tracing::warn!("Stored config is not an object, using defaults");
                return config;
            }
        };

        read_field(&record, "openaiApiKey", &mut config.openai_api_key);
        read_field(&record, "githubToken", &mut config.github_token);
        read_field(&record, "githubRepo", &mut config.github_repo);
        read_field(&record, "uploadTime", &mut config.upload_time);
        read_field(&record, "autoUpload", &mut config.auto_upload);
        read_field(&record, "model", &mut config.model);
        read_field(&record, "maxChunkSize", &mut config.max_chunk_size);
        read_field(&record, "morningPromptEnabled", &mut config.morning_prompt_enabled);
        config
    }

    /// Rewrite the whole record.
    pub fn save(&self, config: &AppConfig) -> Result<()> {
        self.store.set(CONFIG_KEY, &serde_json::to_value(config)?)
    }
}

/// Overwrite `slot` with `record[name]` when present and well-typed.
fn read_field<T: DeserializeOwned>(record: &Map<String, Value>, name: &str, slot: &mut T) {
    let Some(value) = record.get(name) else {
        return;
    };

    match serde_json::from_value(value.clone()) {
        Ok(decoded) => *slot = decoded,
        Err(e) => tracing::warn!(field = name, "Ignoring unreadable config field: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_load_without_record_is_default() {
        let repo = ConfigRepository::new(Arc::new(MemoryStore::new()));
        assert_eq!(repo.load(), AppConfig::default());
    }

    #[test]
    fn test_load_defaults_newer_fields() {
        let store = Arc::new(MemoryStore::new());
        store.set_raw(
            CONFIG_KEY,
            r#"{"openaiApiKey":"sk","githubToken":"ghp","githubRepo":"me/logs","uploadTime":"20:00","autoUpload":true,"model":"gpt-4"}"#,
        );

        let config = ConfigRepository::new(store).load();
        assert_eq!(config.max_chunk_size, 10);
        assert!(config.morning_prompt_enabled);
        assert_eq!(config.model, "gpt-4");
        assert!(config.is_configured());
    }

    #[test]
    fn test_malformed_record_is_default() {
        let store = Arc::new(MemoryStore::new());
        store.set_raw(CONFIG_KEY, "{\"openaiApiKey\":");

        assert_eq!(ConfigRepository::new(store).load(), AppConfig::default());
    }

    #[test]
    fn test_bad_field_keeps_the_rest() {
        let store = Arc::new(MemoryStore::new());
        store.set_raw(
            CONFIG_KEY,
            r#"{"openaiApiKey":"sk","githubToken":"ghp","githubRepo":"me/logs","maxChunkSize":"20","model":null}"#,
        );

        let config = ConfigRepository::new(store).load();
        assert_eq!(config.openai_api_key, "sk");
        assert_eq!(config.github_token, "ghp");
        assert_eq!(config.github_repo, "me/logs");
        assert_eq!(config.max_chunk_size, 10);
        assert_eq!(config.model, "gpt-3.5-turbo");
        assert!(config.is_configured());
    }

    #[test]
    fn test_non_object_record_is_default() {
        let store = Arc::new(MemoryStore::new());
        store.set_raw(CONFIG_KEY, "[1, 2]");

        assert_eq!(ConfigRepository::new(store).load(), AppConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let repo = ConfigRepository::new(Arc::new(MemoryStore::new()));
        let config = AppConfig {
            github_repo: "me/logs".into(),
            max_chunk_size: 5,
            morning_prompt_enabled: false,
            ..Default::default()
        };

        repo.save(&config).unwrap();
        assert_eq!(repo.load(), config);
    }
}
