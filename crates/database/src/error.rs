//! Database error types.

use sqlx::error::ErrorKind;
use thiserror::Error;

use crate::validation::ValidationError;

/// Errors that can occur during database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// SQLx error (query, decode, etc.)
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Migration error
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Input rejected before reaching the store
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// The store rejected a write because of a constraint
    #[error("{entity} rejected by constraint: {message}")]
    Constraint {
        entity: &'static str,
        message: String,
    },

    /// The store could not be reached or timed out
    #[error("database unreachable: {0}")]
    Connectivity(String),

    /// Record not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
}

impl DatabaseError {
    /// Classify a raw SQLx error raised while writing `entity`.
    pub(crate) fn from_write(entity: &'static str, err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if matches!(
                db_err.kind(),
                ErrorKind::UniqueViolation
                    | ErrorKind::ForeignKeyViolation
                    | ErrorKind::NotNullViolation
                    | ErrorKind::CheckViolation
            ) {
                return DatabaseError::Constraint {
                    entity,
                    message: db_err.message().to_string(),
                };
            }
        }

        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => DatabaseError::Connectivity(err.to_string()),
            other => DatabaseError::Sqlx(other),
        }
    }

    /// Whether this error means the store itself is unavailable.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, DatabaseError::Connectivity(_))
    }
}

/// Result type for database operations.
pub type Result<T> = std::result::Result<T, DatabaseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_errors_are_connectivity() {
        let err = DatabaseError::from_write("Contact", sqlx::Error::PoolTimedOut);
        assert!(err.is_connectivity());

        let err = DatabaseError::from_write("Contact", sqlx::Error::PoolClosed);
        assert!(err.is_connectivity());
    }

    #[test]
    fn test_row_not_found_is_not_connectivity() {
        let err = DatabaseError::from_write("Contact", sqlx::Error::RowNotFound);
        assert!(!err.is_connectivity());
        assert!(matches!(err, DatabaseError::Sqlx(_)));
    }
}
