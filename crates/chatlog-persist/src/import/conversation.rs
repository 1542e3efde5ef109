use chrono::{DateTime, Local, TimeZone, Utc};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use thiserror::Error;

use chatlog_types::{date_key, ConversationEntry};

use super::error::ImportError;

/// Model recorded for entries from the flat variant, which carries none.
pub const FLAT_MODEL: &str = "imported";
/// Model recorded when a tree-variant reply has no `model_slug`.
pub const UNKNOWN_MODEL: &str = "unknown";

#[derive(Error, Debug)]
pub enum ConversationError {
    #[error("conversation is neither a node tree nor a message list")]
    UnknownShape,

    #[error("malformed conversation: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Split an export file into its conversations.
///
/// Accepted top-level shapes: a list of conversations, an object with a
/// `conversations` list, or one tree-variant conversation on its own.
pub fn parse_export(text: &str) -> Result<Vec<Value>, ImportError> {
    let value: Value = serde_json::from_str(text)?;

    let conversations = match value {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("conversations") {
            Some(Value::Array(items)) => items,
            Some(_) => return Err(ImportError::UnrecognizedFormat),
            None if obj.get("mapping").is_some_and(Value::is_object) => {
                vec![Value::Object(obj)]
            }
            None => return Err(ImportError::UnrecognizedFormat),
        },
        _ => return Err(ImportError::UnrecognizedFormat),
    };

    if conversations.is_empty() {
        return Err(ImportError::Empty);
    }
    Ok(conversations)
}

/// Calendar date (local machine) a conversation's entries are filed under.
pub fn bucket_date(instant: DateTime<Utc>) -> String {
    date_key(instant.with_timezone(&Local).date_naive())
}

/// Express a daily log in the flat variant so it can be re-imported.
pub fn to_flat_conversation(title: &str, entries: &[ConversationEntry]) -> Value {
    let messages: Vec<Value> = entries
        .iter()
        .flat_map(|entry| {
            [
                json!({"role": "user", "content": entry.prompt}),
                json!({"role": "assistant", "content": entry.response}),
            ]
        })
        .collect();

    let mut conversation = json!({
        "title": title,
        "messages": messages,
    });
    if let (Some(first), Some(obj)) = (entries.first(), conversation.as_object_mut()) {
        let seconds = first.timestamp.timestamp_millis() as f64 / 1000.0;
        obj.insert("create_time".to_string(), json!(seconds));
    }
    conversation
}

/// One conversation from an export, decoded into its structural variant.
#[derive(Debug, Clone)]
pub enum ImportedConversation {
    Tree(TreeConversation),
    Flat(FlatConversation),
}

impl ImportedConversation {
    /// Decode, trying the tree shape before the flat shape.
    pub fn from_value(value: &Value) -> Result<Self, ConversationError> {
        if value.get("mapping").is_some_and(Value::is_object) {
            return Ok(Self::Tree(TreeConversation::from_value(value)?));
        }
        if value.get("messages").is_some_and(Value::is_array) {
            return Ok(Self::Flat(FlatConversation::from_value(value)?));
        }
        Err(ConversationError::UnknownShape)
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Tree(tree) => tree.created_at,
            Self::Flat(flat) => flat.created_at,
        }
    }

    /// Date key the entries belong to; `now` stands in for a missing
    /// creation instant.
    pub fn bucket(&self, now: DateTime<Utc>) -> String {
        bucket_date(self.created_at().unwrap_or(now))
    }

    pub fn entries(&self, now: DateTime<Utc>) -> Vec<ConversationEntry> {
        match self {
            Self::Tree(tree) => tree.entries(now),
            Self::Flat(flat) => flat.entries(now),
        }
    }
}

// ============================================================================
// TREE VARIANT
// ============================================================================

#[derive(Debug, Clone)]
pub struct TreeConversation {
    pub created_at: Option<DateTime<Utc>>,
    /// `(node id, node)` in export order
    pub nodes: Vec<(String, TreeNode)>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TreeNode {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub message: Option<TreeMessage>,
    #[serde(default)]
    pub parent: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TreeMessage {
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub content: Option<TreeContent>,
    #[serde(default)]
    pub metadata: Option<MessageMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TreeContent {
    #[serde(default)]
    pub parts: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageMetadata {
    #[serde(default)]
    pub model_slug: Option<String>,
}

impl TreeNode {
    fn role(&self) -> Option<&str> {
        self.message.as_ref()?.author.as_ref()?.role.as_deref()
    }

    fn parts(&self) -> &[Value] {
        self.message
            .as_ref()
            .and_then(|m| m.content.as_ref())
            .and_then(|c| c.parts.as_deref())
            .unwrap_or(&[])
    }

    fn model(&self) -> Option<&str> {
        self.message.as_ref()?.metadata.as_ref()?.model_slug.as_deref()
    }

    /// A message by `role` with at least one content fragment.
    fn is_turn(&self, role: &str) -> bool {
        self.role() == Some(role) && !self.parts().is_empty()
    }
}

impl TreeConversation {
    fn from_value(value: &Value) -> Result<Self, ConversationError> {
        #[derive(Deserialize)]
        struct Raw {
            #[serde(default)]
            create_time: Option<Value>,
            mapping: Map<String, Value>,
        }

        let raw = Raw::deserialize(value)?;
        let nodes = raw
            .mapping
            .into_iter()
            .map(|(key, node)| {
                let node: TreeNode = serde_json::from_value(node)?;
                Ok((node.id.clone().unwrap_or(key), node))
            })
            .collect::<Result<Vec<_>, serde_json::Error>>()?;

        Ok(Self {
            created_at: raw.create_time.as_ref().and_then(parse_instant),
            nodes,
        })
    }

    /// Pair every user turn with the first assistant turn whose `parent` is
    /// that user node. User turns without such a child produce nothing; the
    /// pairing follows tree edges, not chronology, so a branched tree may pair
    /// differently than the visible thread did.
    pub fn entries(&self, now: DateTime<Utc>) -> Vec<ConversationEntry> {
        let timestamp = self.created_at.unwrap_or(now);

        self.nodes
            .iter()
            .filter(|(_, node)| node.is_turn("user"))
            .filter_map(|(id, user)| {
                let (_, reply) = self.nodes.iter().find(|(_, node)| {
                    node.parent.as_deref() == Some(id.as_str()) && node.is_turn("assistant")
                })?;

                Some(ConversationEntry::new(
                    timestamp,
                    join_fragments(user.parts()),
                    join_fragments(reply.parts()),
                    reply.model().unwrap_or(UNKNOWN_MODEL),
                ))
            })
            .collect()
    }
}

// ============================================================================
// FLAT VARIANT
// ============================================================================

#[derive(Debug, Clone)]
pub struct FlatConversation {
    pub created_at: Option<DateTime<Utc>>,
    pub messages: Vec<FlatMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlatMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Value,
}

impl FlatMessage {
    fn is(&self, role: &str) -> bool {
        self.role.as_deref() == Some(role)
    }
}

impl FlatConversation {
    fn from_value(value: &Value) -> Result<Self, ConversationError> {
        #[derive(Deserialize)]
        struct Raw {
            #[serde(default)]
            create_time: Option<Value>,
            #[serde(default)]
            created_at: Option<Value>,
            messages: Vec<FlatMessage>,
        }

        let raw = Raw::deserialize(value)?;
        let created_at = raw
            .create_time
            .as_ref()
            .or(raw.created_at.as_ref())
            .and_then(parse_instant);

        Ok(Self {
            created_at,
            messages: raw.messages,
        })
    }

    /// Walk the list two messages at a time. Only an exact (user, assistant)
    /// pair yields an entry; misaligned pairs and a trailing odd message are
    /// dropped without resynchronizing.
    pub fn entries(&self, now: DateTime<Utc>) -> Vec<ConversationEntry> {
        let timestamp = self.created_at.unwrap_or(now);

        self.messages
            .chunks(2)
            .filter_map(|pair| match pair {
                [user, assistant] if user.is("user") && assistant.is("assistant") => {
                    Some(ConversationEntry::new(
                        timestamp,
                        content_text(&user.content),
                        content_text(&assistant.content),
                        FLAT_MODEL,
                    ))
                }
                _ => None,
            })
            .collect()
    }
}

// ============================================================================
// HELPERS
// ============================================================================

/// Unix seconds (integer or fractional) or an RFC 3339 string.
fn parse_instant(value: &Value) -> Option<DateTime<Utc>> {
    let from_seconds = |seconds: f64| {
        if !seconds.is_finite() {
            return None;
        }
        Utc.timestamp_millis_opt((seconds * 1000.0).round() as i64).single()
    };

    match value {
        Value::Number(n) => from_seconds(n.as_f64()?),
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|d| d.with_timezone(&Utc))
            .ok()
            .or_else(|| s.trim().parse::<f64>().ok().and_then(from_seconds)),
        _ => None,
    }
}

fn fragment_text(fragment: &Value) -> Option<&str> {
    match fragment {
        Value::String(s) => Some(s.as_str()),
        Value::Object(obj) => obj.get("text").and_then(Value::as_str),
        _ => None,
    }
}

fn join_fragments(fragments: &[Value]) -> String {
    fragments
        .iter()
        .filter_map(fragment_text)
        .collect::<Vec<_>>()
        .join("\n")
}

fn content_text(content: &Value) -> String {
    match content {
        Value::String(s) => s.clone(),
        Value::Array(fragments) => join_fragments(fragments),
        Value::Object(obj) => match obj.get("parts") {
            Some(Value::Array(parts)) => join_fragments(parts),
            _ => obj
                .get("text")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        },
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
