pub mod client;
pub mod config;
pub mod domains;
pub mod error;
pub mod interfaces;
pub mod services;
pub mod validation;

pub use crate::client::CheckConsole;
pub use crate::config::Config;
pub use crate::error::{NodeCheckerError, Result};
pub use crate::services::orchestrator::{CheckEvent, CheckOrchestrator, CheckResult, CheckState};
pub use crate::services::view::ConsoleView;
