pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::http::UsptoClient;
pub use crate::adapters::web::{build_router, serve, WebState};
pub use crate::config::{AppConfig, CliArgs};
pub use crate::core::service::PatentService;
pub use crate::utils::error::{PatentError, Result};
