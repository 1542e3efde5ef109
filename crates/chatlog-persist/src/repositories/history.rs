use std::sync::{Arc, Mutex};

use chatlog_types::ConversationEntry;
use serde_json::Value;

use crate::error::{PersistError, Result};
use crate::keys::{history_date, history_key};
use crate::store::LogStore;

/// Per-day, append-only conversation logs.
///
/// Appends and merges are read-modify-write sequences over the store; they
/// are serialized through one writer lock shared by all clones. Writes work
/// on the stored JSON values, so an entry this version cannot decode is kept
/// as-is rather than dropped.
#[derive(Clone)]
pub struct HistoryRepository {
    store: Arc<dyn LogStore>,
    writer: Arc<Mutex<()>>,
}

impl HistoryRepository {
    pub fn new(store: Arc<dyn LogStore>) -> Self {
        Self {
            store,
            writer: Arc::new(Mutex::new(())),
        }
    }

    /// Entries logged for `date`, in insertion order. A missing log is
    /// empty; entries that do not decode are skipped.
    pub fn get(&self, date: &str) -> Vec<ConversationEntry> {
        match self.raw(date) {
            Ok(values) => decode(date, &values),
            Err(e) => {
                tracing::warn!(date, "{}", e);
                Vec::new()
            }
        }
    }

    /// Append one entry and return the readable entries of the updated log.
    pub fn append(&self, date: &str, entry: ConversationEntry) -> Result<Vec<ConversationEntry>> {
        let _guard = self.writer.lock().unwrap_or_else(|e| e.into_inner());

        let mut values = self.raw(date)?;
        values.push(serde_json::to_value(entry)?);
        self.write(date, values.clone())?;
        Ok(decode(date, &values))
    }

    /// Concatenate `incoming` onto the existing log for `date`.
    ///
    /// Returns the new length of the log, unreadable entries included.
    pub fn merge(&self, date: &str, incoming: Vec<ConversationEntry>) -> Result<usize> {
        let _guard = self.writer.lock().unwrap_or_else(|e| e.into_inner());

        let mut values = self.raw(date)?;
        for entry in incoming {
            values.push(serde_json::to_value(entry)?);
        }
        let len = values.len();
        self.write(date, values)?;
        Ok(len)
    }

    /// Every date with a stored log, oldest first.
    pub fn dates(&self) -> Vec<String> {
        let mut dates: Vec<String> = self
            .store
            .keys()
            .iter()
            .filter_map(|key| history_date(key).map(str::to_string))
            .collect();
        dates.sort();
        dates
    }

    /// Stored values for `date`. A value that is not a list is never
    /// overwritten.
    fn raw(&self, date: &str) -> Result<Vec<Value>> {
        match self.store.get(&history_key(date)) {
            None => Ok(Vec::new()),
            Some(Value::Array(values)) => Ok(values),
            Some(_) => Err(PersistError::Internal(format!(
                "Stored log for {} is not a list",
                date
            ))),
        }
    }

    fn write(&self, date: &str, values: Vec<Value>) -> Result<()> {
        self.store.set(&history_key(date), &Value::Array(values))
    }
}

fn decode(date: &str, values: &[Value]) -> Vec<ConversationEntry> {
    values
        .iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value.clone()) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(date, index, "Skipping unreadable log entry: {}", e);
                None
            }
        })
        .collect()
}
