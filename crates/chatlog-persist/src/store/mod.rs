mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde_json::Value;

use crate::error::Result;

/// Durable string-keyed store of JSON documents.
///
/// Reads never fail: a missing key, an unreadable entry, or malformed JSON
/// all come back as `None` (the latter two are logged). Writes replace the
/// whole value under a key.
pub trait LogStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;

    fn set(&self, key: &str, value: &Value) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;

    /// Every key currently stored, in no particular order.
    fn keys(&self) -> Vec<String>;

    /// Remove every key.
    fn clear(&self) -> Result<()>;
}
