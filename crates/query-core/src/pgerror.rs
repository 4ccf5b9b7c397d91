//! PostgreSQL-style errors
//!
//! A `PgError` carries a SQLSTATE code alongside its message. It is the only
//! error shape a client ever sees; everything else is folded into one of these
//! before it reaches the wire.

use pgwire::error::{ErrorInfo, PgWireError};
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use thiserror::Error;

/// SQLSTATE codes used by the engine.
pub mod codes {
    pub const INTERNAL_ERROR: &str = "XX000";
    pub const SERIALIZATION_FAILURE: &str = "40001";
    pub const SYNTAX_ERROR_OR_ACCESS_RULE_VIOLATION: &str = "42000";
    pub const SYNTAX_ERROR: &str = "42601";
    pub const UNDEFINED_COLUMN: &str = "42703";
    pub const UNDEFINED_TABLE: &str = "42P01";
    pub const DIVISION_BY_ZERO: &str = "22012";
    pub const QUERY_CANCELED: &str = "57014";
}

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct PgError {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl PgError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            detail: None,
            hint: None,
        }
    }

    /// Error with code `XX000`, used for anything that has no better code.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(codes::INTERNAL_ERROR, message)
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn into_pg_wire_error(self) -> PgWireError {
        PgWireError::UserError(Box::new(ErrorInfo::from(&self)))
    }
}

impl From<&PgError> for ErrorInfo {
    fn from(err: &PgError) -> Self {
        ErrorInfo::new("ERROR".to_string(), err.code.clone(), err.message.clone())
    }
}

/// Returns the first `PgError` found in the error or its chain of sources.
pub fn get_pg_cause<'e>(err: &'e (dyn StdError + 'static)) -> Option<&'e PgError> {
    let mut current: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(e) = current {
        if let Some(pg) = e.downcast_ref::<PgError>() {
            return Some(pg);
        }
        current = e.source();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;

    #[derive(Error, Debug)]
    #[error("while running flow: {source}")]
    struct FlowFailed {
        #[source]
        source: QueryError,
    }

    #[test]
    fn test_get_pg_cause_direct() {
        let err = PgError::new(codes::DIVISION_BY_ZERO, "division by zero");
        let cause = get_pg_cause(&err).unwrap();
        assert_eq!(cause.code(), "22012");
    }

    #[test]
    fn test_get_pg_cause_through_chain() {
        let err = FlowFailed {
            source: QueryError::from(PgError::new(
                codes::UNDEFINED_COLUMN,
                "column \"x\" does not exist",
            )),
        };
        let cause = get_pg_cause(&err).unwrap();
        assert_eq!(cause.code, codes::UNDEFINED_COLUMN);
        assert_eq!(cause.message, "column \"x\" does not exist");
    }

    #[test]
    fn test_get_pg_cause_missing() {
        let err = QueryError::ExecutionError("boom".into());
        assert!(get_pg_cause(&err).is_none());
    }

    #[test]
    fn test_builders_and_serde() {
        let err = PgError::internal("oops").with_detail("d").with_hint("h");
        assert_eq!(err.code(), codes::INTERNAL_ERROR);
        assert_eq!(err.to_string(), "oops");

        let json = serde_json::to_string(&PgError::internal("x")).unwrap();
        assert!(!json.contains("hint"));
        let back: PgError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, PgError::internal("x"));
    }

    #[test]
    fn test_into_pg_wire_error() {
        let wire = PgError::new(codes::SYNTAX_ERROR, "syntax error").into_pg_wire_error();
        assert!(matches!(wire, PgWireError::UserError(_)));
    }
}
