use crate::pgerror::PgError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Planning error: {0}")]
    PlanningError(String),

    #[error("Execution error: {0}")]
    ExecutionError(String),

    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("Column index out of range: {index} (row has {width} columns)")]
    ColumnOutOfRange { index: usize, width: usize },

    #[error("No value provided for placeholder ${0}")]
    NoPlaceholderValue(usize),

    /// A precondition the caller was required to uphold did not hold.
    #[error("internal error: {0}")]
    Internal(String),

    /// A database error raised with an explicit SQLSTATE.
    #[error("{0}")]
    Database(#[source] PgError),
}

impl From<PgError> for QueryError {
    fn from(err: PgError) -> Self {
        QueryError::Database(err)
    }
}

pub type Result<T> = std::result::Result<T, QueryError>;
