pub mod builder;
pub mod client;
pub mod error;
pub mod import;
pub mod keys;
pub mod repositories;
pub mod store;

pub use builder::PersistClientBuilder;
pub use client::PersistClient;
pub use error::{PersistError, Result};
pub use import::{ImportError, ImportOptions, ImportReport, ImportedConversation, Importer};
pub use repositories::{ConfigRepository, HistoryRepository, MarkerRepository};
pub use store::{FileStore, LogStore, MemoryStore};
