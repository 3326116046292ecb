//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the Surveyor backend.
//! It provides the PostgreSQL implementation of the store and session traits
//! declared in `sv_core`, together with connection pooling and migrations.
//!
//! ## Architecture
//!
//! - **Database**: connection pool, schema migrations, and the `PgStore` /
//!   `PgSession` unit of work built on SQLx transactions

use sv_core::errors::DomainError;

/// Database module - PostgreSQL implementations using SQLx
pub mod database;

pub use database::{DatabasePool, PgSession, PgStore, PoolStatistics};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failure
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Client-facing message for driver failures
pub const DATABASE_FAILURE_MESSAGE: &str = "Database operation failed";

/// Log the driver error and hide its text behind [`DATABASE_FAILURE_MESSAGE`]
pub(crate) fn database_failure(err: &dyn std::fmt::Display, operation: Option<&str>) -> DomainError {
    tracing::error!(error = %err, operation = ?operation, "Database operation failed");
    DomainError::database(DATABASE_FAILURE_MESSAGE, operation)
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        match err {
            InfrastructureError::Config(message) => {
                DomainError::configuration(message, Some("DATABASE_URL"))
            }
            InfrastructureError::Migration(e) => database_failure(&e, Some("migrate")),
            InfrastructureError::Database(e) => database_failure(&e, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_maps_to_configuration_kind() {
        let err: DomainError = InfrastructureError::Config("Invalid database URL".into()).into();
        assert_eq!(err.code(), "CONFIGURATION_ERROR");
        assert_eq!(err.details()["config_key"], "DATABASE_URL");
    }

    #[test]
    fn test_database_error_maps_to_database_kind() {
        let err: DomainError = InfrastructureError::Database(sqlx::Error::PoolTimedOut).into();
        assert_eq!(err.code(), "DATABASE_ERROR");
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.to_string(), DATABASE_FAILURE_MESSAGE);
    }
}
