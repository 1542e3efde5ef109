pub mod config;
pub mod history;
pub mod markers;

pub use config::ConfigRepository;
pub use history::HistoryRepository;
pub use markers::MarkerRepository;
