pub mod adapters;
pub mod api;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::memory::InMemoryStore;
pub use adapters::repository::{PollItems, ReportItems, UserItems};
pub use api::{ApiResponse, PollController, ReportController, UserController, VoteController};
pub use config::AppConfig;
pub use crate::core::{PollService, QuestionSpec, ReportService, UserService, VoteService};
pub use utils::error::{Result, ServiceError};
