//! Command-line interface definition for chatlog

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::relay::{TaskAction, DEFAULT_SERVER};

/// chatlog - log your chat-completion conversations and push them to GitHub
#[derive(Parser, Debug, Clone)]
#[command(name = "chatlog")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the local logs and settings
    #[arg(long, env = "CHATLOG_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Base URL of the relay service
    #[arg(long, env = "CHATLOG_SERVER", default_value = DEFAULT_SERVER, global = true)]
    pub server: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Show or change settings
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Send a prompt and log the exchange
    Send {
        /// Prompt text
        prompt: String,
    },

    /// Print a day's log
    History {
        /// Date as YYYY-MM-DD (default: today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// List every day that has a log
    Days,

    /// Upload today's log to GitHub
    Upload,

    /// Upload today's log if the configured time has passed
    AutoUpload {
        /// Keep running and check once a minute
        #[arg(long)]
        watch: bool,
    },

    /// Control the relay's upload scheduler
    Scheduler {
        #[command(subcommand)]
        command: SchedulerCommand,
    },

    /// Print a PowerShell command for the Windows Task Scheduler
    WindowsTask {
        #[arg(value_enum)]
        action: TaskAction,

        /// Upload script the task should run (required for `create`)
        #[arg(long)]
        script_path: Option<String>,
    },

    /// Write a day's log to chat-logs-<date>.json
    Export {
        /// Date as YYYY-MM-DD (default: today)
        #[arg(short, long)]
        date: Option<String>,

        /// Write a re-importable conversation list instead of raw entries
        #[arg(long)]
        as_conversation: bool,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Import a ChatGPT data export (conversations.json)
    Import {
        /// Export file
        file: PathBuf,
    },

    /// Show the morning prompt if it has not been shown today
    Morning,

    /// Erase all local data and settings
    Reset {
        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Print the current settings (credentials masked)
    Show,

    /// Change one or more settings
    Set(ConfigSetArgs),

    /// Seed empty credentials from OPENAI_API_KEY, GITHUB_TOKEN and GITHUB_REPO
    Init,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ConfigSetArgs {
    #[arg(long)]
    pub openai_api_key: Option<String>,

    #[arg(long)]
    pub github_token: Option<String>,

    /// Repository as owner/name
    #[arg(long)]
    pub github_repo: Option<String>,

    /// Daily upload time as HH:MM
    #[arg(long)]
    pub upload_time: Option<String>,

    #[arg(long)]
    pub auto_upload: Option<bool>,

    #[arg(long)]
    pub model: Option<String>,

    /// Import batch size (clamped to 1..=50)
    #[arg(long)]
    pub max_chunk_size: Option<i64>,

    #[arg(long)]
    pub morning_prompt: Option<bool>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum SchedulerCommand {
    Start,
    Stop,
    Status,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
