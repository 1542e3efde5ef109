//! Conversation export import.
//!
//! Two historical export shapes are understood: the node tree written by the
//! ChatGPT data export (`mapping` of node id to node) and a flat, role-tagged
//! message list. Both normalize into [`ConversationEntry`] values that are
//! merged into the daily logs keyed by each conversation's creation date.
//!
//! [`ConversationEntry`]: chatlog_types::ConversationEntry

mod conversation;
mod error;
mod importer;

pub use conversation::{
    bucket_date, parse_export, to_flat_conversation, ConversationError, FlatConversation,
    ImportedConversation, TreeConversation, FLAT_MODEL, UNKNOWN_MODEL,
};
pub use error::ImportError;
pub use importer::{ImportOptions, ImportReport, Importer, DEFAULT_BATCH_PAUSE};
