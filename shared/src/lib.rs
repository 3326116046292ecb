//! Shared utilities and common types for the Surveyor server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types and the environment-driven loader
//! - Error codes and the error envelope
//! - Success response envelope and common type definitions

pub mod config;
pub mod errors;
pub mod types;

// Re-export commonly used items at crate root
pub use self::config::{
    AppConfig, AppInfo, ConfigError, DatabaseConfig, Environment, LogFormat, LoggingConfig,
    ServerConfig,
};
pub use errors::{error_codes, ErrorResponse};
pub use types::{ApiResponse, ResponseMeta, SortOrder};
