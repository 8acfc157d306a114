pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::AppConfig;

pub use adapters::http::{build_router, ApiClient, AppState};
pub use adapters::mail::SmtpRelay;
pub use adapters::storage::{MemoryStore, MongoStore};
pub use crate::core::{intake::ContactIntake, portfolio::PortfolioProvider};
pub use utils::error::{PortfolioError, Result};
