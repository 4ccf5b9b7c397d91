//! Error types for the distributed SQL wire layer

use query_core::QueryError;
use thiserror::Error;

/// Errors raised while converting to or from wire specifications.
///
/// `Internal` and `BadErrorDetail` are invariant violations: the caller handed
/// this layer a state it treats as impossible. They must abort the enclosing
/// operation and are never classified as retryable.
#[derive(Error, Debug)]
pub enum DistributedError {
    /// A planner or caller precondition did not hold
    #[error("internal error: {0}")]
    Internal(String),

    /// An error envelope carried a detail kind outside the known set
    #[error("bad error detail: {0}")]
    BadErrorDetail(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Configuration could not be read
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Query engine error
    #[error("Query engine error: {0}")]
    QueryError(QueryError),
}

impl DistributedError {
    /// True for errors that indicate a violated invariant rather than a
    /// failure of the query itself.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            DistributedError::Internal(_) | DistributedError::BadErrorDetail(_)
        )
    }
}

impl From<QueryError> for DistributedError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::Internal(msg) => DistributedError::Internal(msg),
            other => DistributedError::QueryError(other),
        }
    }
}

impl From<serde_json::Error> for DistributedError {
    fn from(err: serde_json::Error) -> Self {
        DistributedError::SerializationError(err.to_string())
    }
}

/// Result type for distributed operations
pub type Result<T> = std::result::Result<T, DistributedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_query_errors_stay_internal() {
        let err = DistributedError::from(QueryError::Internal("bad plan".into()));
        assert!(err.is_internal());
        assert_eq!(err.to_string(), "internal error: bad plan");

        let err = DistributedError::from(QueryError::ExecutionError("boom".into()));
        assert!(!err.is_internal());
    }
}
