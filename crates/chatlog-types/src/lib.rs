pub mod config;
pub mod date;
pub mod entry;

pub use config::{
    AppConfig, DEFAULT_CHUNK_SIZE, DEFAULT_MODEL, DEFAULT_UPLOAD_TIME, MAX_CHUNK_SIZE,
    MIN_CHUNK_SIZE,
};
pub use date::{date_key, parse_hhmm, today};
pub use entry::ConversationEntry;
