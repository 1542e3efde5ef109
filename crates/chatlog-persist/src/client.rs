use std::sync::Arc;

use crate::error::Result;
use crate::import::{ImportOptions, Importer};
use crate::repositories::{ConfigRepository, HistoryRepository, MarkerRepository};
use crate::store::LogStore;

/// Entry point to everything the client keeps on the local machine.
pub struct PersistClient {
    store: Arc<dyn LogStore>,
    config_repo: ConfigRepository,
    history_repo: HistoryRepository,
    marker_repo: MarkerRepository,
}

impl PersistClient {
    pub fn new(store: Arc<dyn LogStore>) -> Self {
        Self {
            config_repo: ConfigRepository::new(store.clone()),
            history_repo: HistoryRepository::new(store.clone()),
            marker_repo: MarkerRepository::new(store.clone()),
            store,
        }
    }

    pub fn config(&self) -> &ConfigRepository {
        &self.config_repo
    }

    pub fn history(&self) -> &HistoryRepository {
        &self.history_repo
    }

    pub fn markers(&self) -> &MarkerRepository {
        &self.marker_repo
    }

    pub fn store(&self) -> &Arc<dyn LogStore> {
        &self.store
    }

    pub fn importer(&self, options: ImportOptions) -> Importer<'_> {
        Importer::new(&self.history_repo, options)
    }

    /// Erase every stored key: settings, logs and markers alike.
    pub fn reset(&self) -> Result<()> {
        tracing::warn!("Clearing all local data");
        self.store.clear()
    }
}
