use std::collections::BTreeSet;
use std::time::Duration;

use chrono::Utc;
use serde_json::Value;

use chatlog_types::{AppConfig, MAX_CHUNK_SIZE, MIN_CHUNK_SIZE};

use super::conversation::{parse_export, ConversationError, ImportedConversation};
use super::error::ImportError;
use crate::error::PersistError;
use crate::repositories::HistoryRepository;

/// Pause between batches so the caller's event loop gets a turn.
pub const DEFAULT_BATCH_PAUSE: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    chunk_size: usize,
    pause: Duration,
}

impl ImportOptions {
    /// Options with the batch size clamped into `[1, 50]`.
    pub fn new(chunk_size: i64) -> Self {
        Self {
            chunk_size: chunk_size.clamp(MIN_CHUNK_SIZE, MAX_CHUNK_SIZE) as usize,
            pause: DEFAULT_BATCH_PAUSE,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.max_chunk_size)
    }

    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn pause(&self) -> Duration {
        self.pause
    }
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self::new(chatlog_types::DEFAULT_CHUNK_SIZE)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Conversations attempted, including failed ones
    pub conversations_processed: usize,
    /// Conversations that produced at least one entry
    pub conversations_with_entries: usize,
    pub conversations_failed: usize,
    pub entries_imported: usize,
    /// Dates whose logs received entries
    pub days: BTreeSet<String>,
}

#[derive(Debug, thiserror::Error)]
enum ConversationFailure {
    #[error(transparent)]
    Decode(#[from] ConversationError),
    #[error(transparent)]
    Store(#[from] PersistError),
}

/// Merges an export file into the daily logs, batch by batch.
pub struct Importer<'a> {
    history: &'a HistoryRepository,
    options: ImportOptions,
}

impl<'a> Importer<'a> {
    pub fn new(history: &'a HistoryRepository, options: ImportOptions) -> Self {
        Self { history, options }
    }

    /// Import the full text of an export file.
    ///
    /// Only an unreadable or empty file fails the import; a conversation that
    /// cannot be decoded or stored is logged, counted and skipped.
    pub async fn run(&self, text: &str) -> Result<ImportReport, ImportError> {
        let conversations = parse_export(text)?;
        let batches: Vec<&[Value]> = conversations.chunks(self.options.chunk_size).collect();
        let mut report = ImportReport::default();

        tracing::info!(
            conversations = conversations.len(),
            batches = batches.len(),
            chunk_size = self.options.chunk_size,
            "Starting import"
        );

        for (index, batch) in batches.iter().enumerate() {
            for value in batch.iter() {
                report.conversations_processed += 1;

                match self.import_conversation(value) {
                    Ok(Some((date, count))) => {
                        report.conversations_with_entries += 1;
                        report.entries_imported += count;
                        report.days.insert(date);
                    }
                    Ok(None) => {}
                    Err(e) => {
                        report.conversations_failed += 1;
                        tracing::warn!(
                            conversation = report.conversations_processed,
                            "Skipping conversation: {}",
                            e
                        );
                    }
                }
            }

            tracing::debug!(
                batch = index + 1,
                processed = report.conversations_processed,
                "Import batch complete"
            );

            let is_last = index + 1 == batches.len();
            if !is_last && !self.options.pause.is_zero() {
                tokio::time::sleep(self.options.pause).await;
            }
        }

        tracing::info!(
            processed = report.conversations_processed,
            with_entries = report.conversations_with_entries,
            entries = report.entries_imported,
            failed = report.conversations_failed,
            "Import finished"
        );

        Ok(report)
    }

    /// Returns the date and entry count when the conversation yielded entries.
    fn import_conversation(
        &self,
        value: &Value,
    ) -> Result<Option<(String, usize)>, ConversationFailure> {
        let now = Utc::now();
        let conversation = ImportedConversation::from_value(value)?;
        let entries = conversation.entries(now);

        if entries.is_empty() {
            return Ok(None);
        }

        let date = conversation.bucket(now);
        let count = entries.len();
        self.history.merge(&date, entries)?;
        Ok(Some((date, count)))
    }
}
