use std::sync::Arc;

use serde_json::Value;

use crate::error::Result;
use crate::keys::{LAST_MORNING_PROMPT_KEY, LAST_UPLOAD_KEY};
use crate::store::LogStore;

/// Small date markers: last successful upload and last morning prompt.
#[derive(Clone)]
pub struct MarkerRepository {
    store: Arc<dyn LogStore>,
}

impl MarkerRepository {
    pub fn new(store: Arc<dyn LogStore>) -> Self {
        Self { store }
    }

    pub fn last_upload(&self) -> Option<String> {
        self.read(LAST_UPLOAD_KEY)
    }

    pub fn set_last_upload(&self, date: &str) -> Result<()> {
        self.store.set(LAST_UPLOAD_KEY, &Value::from(date))
    }

    pub fn last_morning_prompt(&self) -> Option<String> {
        self.read(LAST_MORNING_PROMPT_KEY)
    }

    pub fn set_last_morning_prompt(&self, date: &str) -> Result<()> {
        self.store.set(LAST_MORNING_PROMPT_KEY, &Value::from(date))
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key)? {
            Value::String(s) => Some(s),
            other => {
                tracing::warn!(key, "Expected a date string, found {}", other);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_markers_are_independent() {
        let repo = MarkerRepository::new(Arc::new(MemoryStore::new()));
        assert!(repo.last_upload().is_none());

        repo.set_last_upload("2024-03-01").unwrap();
        assert_eq!(repo.last_upload().as_deref(), Some("2024-03-01"));
        assert!(repo.last_morning_prompt().is_none());

        repo.set_last_morning_prompt("2024-03-02").unwrap();
        assert_eq!(repo.last_morning_prompt().as_deref(), Some("2024-03-02"));
    }

    #[test]
    fn test_non_string_marker_is_absent() {
        let store = Arc::new(MemoryStore::new());
        store.set_raw(LAST_UPLOAD_KEY, "42");
        assert!(MarkerRepository::new(store).last_upload().is_none());
    }
}
