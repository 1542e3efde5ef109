pub mod error;
pub mod openai;
pub mod traits;
pub mod types;

pub use error::{LlmError, Result};
pub use openai::OpenAIClient;
pub use traits::{ChatClient, ChatOptions, ChatRequest, ChatResponse};
pub use types::Message;

/// Sampling parameters the relay always sends.
pub const RELAY_MAX_TOKENS: u32 = 1000;
pub const RELAY_TEMPERATURE: f64 = 0.7;
