use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use utoipa::ToSchema;

use chatlog_types::DEFAULT_UPLOAD_TIME;

/// Hosting credentials held while the scheduler is running.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadCredentials {
    pub github_token: String,
    pub github_repo: String,
}

impl std::fmt::Debug for UploadCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadCredentials")
            .field("github_token", &"<redacted>")
            .field("github_repo", &self.github_repo)
            .finish()
    }
}

#[derive(Debug, Clone)]
struct SchedulerState {
    is_running: bool,
    upload_time: String,
    last_check: Option<DateTime<Utc>>,
    credentials: Option<UploadCredentials>,
}

impl Default for SchedulerState {
    fn default() -> Self {
        Self {
            is_running: false,
            upload_time: DEFAULT_UPLOAD_TIME.to_string(),
            last_check: None,
            credentials: None,
        }
    }
}

/// Public view of the scheduler. Credentials never leave the process.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerStatus {
    pub is_running: bool,
    pub upload_time: String,
    pub last_check: Option<DateTime<Utc>>,
}

/// Outcome of comparing the wall clock against the configured upload time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DueCheck {
    /// Stopped, or running without credentials
    Inactive,
    NotYet,
    Due {
        credentials: UploadCredentials,
        checked_at: DateTime<Utc>,
    },
}

/// Advisory on/off bookkeeping for the daily upload.
///
/// Nothing drives this on a timer; state lives for the process lifetime and
/// resets on restart.
#[derive(Debug, Default)]
pub struct Scheduler {
    state: RwLock<SchedulerState>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move to running. A blank `upload_time` keeps the previous one.
    pub async fn start(
        &self,
        credentials: UploadCredentials,
        upload_time: Option<String>,
    ) -> SchedulerStatus {
        let mut state = self.state.write().await;

        state.is_running = true;
        state.credentials = Some(credentials);
        if let Some(time) = upload_time.filter(|t| !t.trim().is_empty()) {
            state.upload_time = time;
        }

        tracing::info!(upload_time = %state.upload_time, "Scheduler started");
        status_of(&state)
    }

    /// Move to stopped and forget the credentials. Always succeeds.
    pub async fn stop(&self) -> SchedulerStatus {
        let mut state = self.state.write().await;

        state.is_running = false;
        state.credentials = None;

        tracing::info!("Scheduler stopped");
        status_of(&state)
    }

    pub async fn status(&self) -> SchedulerStatus {
        status_of(&*self.state.read().await)
    }

    /// Whether an upload is due at `now` (minute resolution). A hit stamps
    /// `lastCheck`.
    pub async fn check_due(&self, now: DateTime<Local>) -> DueCheck {
        let mut state = self.state.write().await;

        let credentials = match (&state.credentials, state.is_running) {
            (Some(credentials), true) => credentials.clone(),
            _ => return DueCheck::Inactive,
        };

        if now.format("%H:%M").to_string() != state.upload_time {
            return DueCheck::NotYet;
        }

        let checked_at = now.with_timezone(&Utc);
        state.last_check = Some(checked_at);
        tracing::info!(at = %checked_at, "Scheduled upload due");

        DueCheck::Due {
            credentials,
            checked_at,
        }
    }
}

fn status_of(state: &SchedulerState) -> SchedulerStatus {
    SchedulerStatus {
        is_running: state.is_running,
        upload_time: state.upload_time.clone(),
        last_check: state.last_check,
    }
}
