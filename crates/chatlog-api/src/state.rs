use std::sync::Arc;

use crate::config::Config;
use crate::scheduler::Scheduler;

/// Shared application state passed to all handlers
///
/// Outbound clients are built per request because every relay call carries
/// the caller's own credential.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub scheduler: Arc<Scheduler>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            scheduler: Arc::new(Scheduler::new()),
        }
    }
}
