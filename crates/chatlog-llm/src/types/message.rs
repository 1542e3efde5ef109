use serde::Serialize;

/// Chat message in wire form. The relay forwards the user's prompt only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    role: &'static str,
    content: String,
}

impl Message {
    /// User/Human message
    pub fn human(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }

    pub fn role(&self) -> &str {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}
