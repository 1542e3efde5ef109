use std::path::PathBuf;
use std::sync::Arc;

use crate::client::PersistClient;
use crate::error::{PersistError, Result};
use crate::store::{FileStore, LogStore, MemoryStore};

pub struct PersistClientBuilder {
    data_dir: Option<PathBuf>,
    store: Option<Arc<dyn LogStore>>,
}

impl PersistClientBuilder {
    pub fn new() -> Self {
        Self {
            data_dir: None,
            store: None,
        }
    }

    /// Persist under `dir`, one JSON document per key.
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    pub fn store(mut self, store: Arc<dyn LogStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Keep everything in process memory.
    pub fn in_memory(self) -> Self {
        self.store(Arc::new(MemoryStore::new()))
    }

    pub fn build(self) -> Result<PersistClient> {
        let store: Arc<dyn LogStore> = match (self.store, self.data_dir) {
            (Some(store), _) => store,
            (None, Some(dir)) => Arc::new(FileStore::open(dir)?),
            (None, None) => {
                return Err(PersistError::Internal(
                    "either data_dir or store is required".to_string(),
                ))
            }
        };

        Ok(PersistClient::new(store))
    }
}

impl Default for PersistClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_requires_backend() {
        assert!(PersistClientBuilder::new().build().is_err());
        assert!(PersistClientBuilder::new().in_memory().build().is_ok());
    }
}
