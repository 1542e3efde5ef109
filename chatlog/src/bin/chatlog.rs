use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::Local;
use directories::ProjectDirs;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chatlog::cli::{Cli, Commands, ConfigCommand, ConfigSetArgs, SchedulerCommand};
use chatlog::types::{parse_hhmm, today, AppConfig};
use chatlog::{Logger, PersistClientBuilder, RelayClient};

const WATCH_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    init_tracing(cli.verbose);

    let data_dir = match cli.data_dir.clone() {
        Some(dir) => dir,
        None => default_data_dir()?,
    };
    tracing::debug!(data_dir = %data_dir.display(), server = %cli.server, "Starting");

    let persist = PersistClientBuilder::new()
        .data_dir(&data_dir)
        .build()
        .with_context(|| format!("Failed to open data directory {}", data_dir.display()))?;
    let relay = RelayClient::new(&cli.server)?;
    let mut logger = Logger::new(persist, relay);

    match cli.command {
        Commands::Config { command } => run_config(&mut logger, command)?,
        Commands::Send { prompt } => {
            let entry = logger.send_prompt(&prompt).await?;
            println!("{}", entry.response);
            eprintln!("[{} | {}] logged to {}", entry.model, entry.timestamp, today());
        }
        Commands::History { date } => {
            let date = date.unwrap_or_else(today);
            let history = logger.history(&date);
            if history.is_empty() {
                println!("No entries for {}", date);
            }
            for entry in history {
                println!("[{}] ({})", entry.timestamp, entry.model);
                println!("> {}", entry.prompt);
                println!("{}\n", entry.response);
            }
        }
        Commands::Days => {
            for day in logger.days() {
                let count = logger.history(&day).len();
                println!("{}  {} entries", day, count);
            }
        }
        Commands::Upload => {
            let receipt = logger.upload_today().await?;
            println!("{}", receipt.message);
            if let Some(url) = receipt.url {
                println!("{}", url);
            }
        }
        Commands::AutoUpload { watch } => run_auto_upload(&logger, watch).await?,
        Commands::Scheduler { command } => {
            let reply = match command {
                SchedulerCommand::Start => logger.toggle_scheduler(true).await?,
                SchedulerCommand::Stop => logger.toggle_scheduler(false).await?,
                SchedulerCommand::Status => logger.scheduler_status().await?,
            };
            if let Some(message) = &reply.message {
                println!("{}", message);
            }
            println!(
                "running: {}  upload time: {}  last check: {}",
                reply.is_running,
                reply.upload_time.as_deref().unwrap_or("-"),
                reply
                    .last_check
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| "never".to_string()),
            );
        }
        Commands::WindowsTask {
            action,
            script_path,
        } => {
            let command = logger
                .windows_command(action, script_path.as_deref())
                .await?;
            eprintln!("{} ({})", command.message, command.task_name);
            println!("{}", command.powershell_command);
        }
        Commands::Export {
            date,
            as_conversation,
            output,
        } => {
            let date = date.unwrap_or_else(today);
            let export = logger.export_day(&date, as_conversation)?;
            let path = output.join(&export.filename);
            tokio::fs::write(&path, export.contents)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Exported {}", path.display());
        }
        Commands::Import { file } => {
            let report = logger.import_file(&file).await?;
            println!(
                "Processed {} conversations, {} with entries ({} entries imported)",
                report.conversations_processed,
                report.conversations_with_entries,
                report.entries_imported
            );
            if report.conversations_failed > 0 {
                println!("Skipped {} unreadable conversations", report.conversations_failed);
            }
            if !report.days.is_empty() {
                let days: Vec<&str> = report.days.iter().map(String::as_str).collect();
                println!("Days updated: {}", days.join(", "));
            }
        }
        Commands::Morning => match logger.morning_prompt(Local::now())? {
            Some(prompt) => println!("{}", prompt),
            None => eprintln!("Nothing to show"),
        },
        Commands::Reset { yes } => {
            if !yes && !confirm("Erase all local logs and settings?")? {
                println!("Aborted");
                return Ok(());
            }
            logger.reset()?;
            println!("Configuration reset successfully");
        }
    }

    Ok(())
}

fn run_config(logger: &mut Logger, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => print_config(logger.config())?,
        ConfigCommand::Set(args) => {
            validate(&args)?;
            let config = logger.update_config(|config| apply(config, args))?;
            print_config(config)?;
        }
        ConfigCommand::Init => {
            let config = logger.update_config(AppConfig::apply_env_defaults)?;
            print_config(config)?;
            if !config.is_configured() {
                eprintln!("Still missing credentials; set them with `chatlog config set`");
            }
        }
    }
    Ok(())
}

fn validate(args: &ConfigSetArgs) -> Result<()> {
    if let Some(time) = &args.upload_time {
        if parse_hhmm(time).is_none() {
            bail!("Invalid upload time '{}', expected HH:MM", time);
        }
    }
    if let Some(repo) = &args.github_repo {
        if repo.split('/').filter(|part| !part.is_empty()).count() != 2 {
            bail!("Invalid repository '{}', expected owner/name", repo);
        }
    }
    Ok(())
}

fn apply(config: &mut AppConfig, args: ConfigSetArgs) {
    if let Some(v) = args.openai_api_key {
        config.openai_api_key = v;
    }
    if let Some(v) = args.github_token {
        config.github_token = v;
    }
    if let Some(v) = args.github_repo {
        config.github_repo = v;
    }
    if let Some(v) = args.upload_time {
        config.upload_time = v.trim().to_string();
    }
    if let Some(v) = args.auto_upload {
        config.auto_upload = v;
    }
    if let Some(v) = args.model {
        config.model = v;
    }
    if let Some(v) = args.max_chunk_size {
        config.max_chunk_size = v;
    }
    if let Some(v) = args.morning_prompt {
        config.morning_prompt_enabled = v;
    }
}

fn print_config(config: &AppConfig) -> Result<()> {
    let mut masked = config.clone();
    masked.openai_api_key = mask(&config.openai_api_key);
    masked.github_token = mask(&config.github_token);

    println!("{}", serde_json::to_string_pretty(&masked)?);
    println!("configured: {}", config.is_configured());
    Ok(())
}

fn mask(secret: &str) -> String {
    if secret.is_empty() {
        return String::new();
    }
    let visible = secret.chars().count().saturating_sub(4);
    let tail: String = secret.chars().skip(visible).collect();
    format!("****{}", tail)
}

async fn run_auto_upload(logger: &Logger, watch: bool) -> Result<()> {
    if !watch {
        match logger.auto_upload_if_due(Local::now()).await? {
            Some(receipt) => println!("{}", receipt.message),
            None => println!("No upload due"),
        }
        return Ok(());
    }

    tracing::info!("Watching for the daily upload time (Ctrl-C to stop)");
    let mut ticker = tokio::time::interval(WATCH_INTERVAL);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match logger.auto_upload_if_due(Local::now()).await {
                    Ok(Some(receipt)) => tracing::info!("{}", receipt.message),
                    Ok(None) => tracing::debug!("No upload due"),
                    Err(e) => tracing::error!("Automatic upload failed: {}", e),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Stopping");
                return Ok(());
            }
        }
    }
}

fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn default_data_dir() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("com", "chatlog", "chatlog")
        .context("Could not determine data directory; pass --data-dir")?;
    Ok(dirs.data_dir().to_path_buf())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .init();
}
