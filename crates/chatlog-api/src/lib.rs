//! HTTP relay service for the chatlog client.
//!
//! Three thin relays (completion, log upload, Task Scheduler command) plus an
//! in-memory scheduler toggle. See [`app::build_router`] for the route table.

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod scheduler;
pub mod state;
pub mod windows;

pub use app::build_router;
pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use scheduler::{DueCheck, Scheduler, SchedulerStatus, UploadCredentials};
pub use state::AppState;
