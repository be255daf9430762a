//! Error types for ingest operations.

use database::{DatabaseError, ValidationError};
use thiserror::Error;

/// Errors that can occur while ingesting a single row.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The row is missing or carries an invalid unique key.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The input record itself could not be decoded.
    #[error("unparseable row: {0}")]
    Parse(String),

    /// The store is unreachable or timed out.
    #[error("store unreachable: {0}")]
    Connectivity(String),

    /// The store rejected the write.
    #[error("store rejected row: {0}")]
    Constraint(String),

    /// Any other store failure.
    #[error("store error: {0}")]
    Store(String),
}

impl IngestError {
    /// Whether this error means the store itself is unavailable.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, IngestError::Connectivity(_))
    }
}

impl From<DatabaseError> for IngestError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::Validation(e) => IngestError::Validation(e),
            DatabaseError::Connectivity(msg) => IngestError::Connectivity(msg),
            DatabaseError::Constraint { .. } => IngestError::Constraint(err.to_string()),
            other => IngestError::Store(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_errors_map_to_taxonomy() {
        let err: IngestError = DatabaseError::Connectivity("refused".to_string()).into();
        assert!(err.is_connectivity());

        let err: IngestError =
            DatabaseError::Validation(ValidationError::Empty("phone".to_string())).into();
        assert!(matches!(err, IngestError::Validation(_)));

        let err: IngestError = DatabaseError::Constraint {
            entity: "Contact",
            message: "CHECK constraint failed".to_string(),
        }
        .into();
        assert!(matches!(err, IngestError::Constraint(_)));

        let err: IngestError = DatabaseError::NotFound {
            entity: "Contact",
            id: "1".to_string(),
        }
        .into();
        assert!(matches!(err, IngestError::Store(_)));
    }
}
