//! Error types shared by the services
//!
//! Repositories return `anyhow::Result`; the pool and migration helpers in
//! this crate use [`DatabaseError`].

use sqlx::Error as SqlxError;
use sqlx::migrate::MigrateError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(#[from] MigrateError),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Whether an error chain bottoms out in a PostgreSQL unique violation
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<SqlxError>()
            .and_then(|e| e.as_database_error())
            .is_some_and(|db| db.is_unique_violation())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_errors_are_not_unique_violations() {
        let err = anyhow::anyhow!("connection reset");
        assert!(!is_unique_violation(&err));

        let err = anyhow::Error::from(SqlxError::RowNotFound);
        assert!(!is_unique_violation(&err));
    }

    #[test]
    fn configuration_error_message() {
        let err = DatabaseError::Configuration("DATABASE_URL environment variable not set".into());
        assert_eq!(
            err.to_string(),
            "Database configuration error: DATABASE_URL environment variable not set"
        );
    }
}
