//! # chatlog
//!
//! Log every prompt you send to a chat-completion model, keep the exchanges
//! as one JSON log per day, and push each day's log to a GitHub repository.
//!
//! ## Architecture
//!
//! - **chatlog-types**: shared data model (`ConversationEntry`, `AppConfig`)
//! - **chatlog-llm**: chat-completion API client
//! - **chatlog-github**: GitHub contents API client
//! - **chatlog-persist**: local log store and conversation-export import
//! - **chatlog-api**: the relay service the client talks to
//! - this crate: the client session ([`Logger`]) and the `chatlog` CLI
//!
//! ## Example
//!
//! ```rust,no_run
//! use chatlog::prelude::*;
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let persist = PersistClientBuilder::new().data_dir("/tmp/chatlog").build()?;
//! let relay = RelayClient::new("http://127.0.0.1:3000")?;
//! let logger = Logger::new(persist, relay);
//!
//! let entry = logger.send_prompt("What is a lifetime in Rust?").await?;
//! println!("{}", entry.response);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod error;
pub mod logger;
pub mod relay;

pub use error::{ClientError, Result};
pub use logger::{Export, Logger, MORNING_PROMPT};
pub use relay::{
    ChatReply, RelayClient, SchedulerReply, TaskAction, UploadReceipt, WindowsCommand,
    DEFAULT_SERVER,
};

pub use chatlog_github as github;
pub use chatlog_llm as llm;
pub use chatlog_persist as persist;
pub use chatlog_types as types;

pub use chatlog_persist::{ImportOptions, ImportReport, PersistClient, PersistClientBuilder};
pub use chatlog_types::{AppConfig, ConversationEntry};

/// Commonly used types
pub mod prelude {
    pub use crate::{
        AppConfig, ClientError, ConversationEntry, ImportReport, Logger, PersistClient,
        PersistClientBuilder, RelayClient,
    };
}
