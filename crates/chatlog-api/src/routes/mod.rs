pub mod chat;
pub mod health;
pub mod scheduler;
pub mod upload;
pub mod windows_scheduler;
