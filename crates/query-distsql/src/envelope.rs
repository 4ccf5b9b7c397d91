//! Error envelope
//!
//! A remote flow that fails reports a [`RemoteError`] to the gateway. The
//! envelope carries exactly one [`ErrorDetail`]: either a `PgError` (the
//! only thing a client ever sees) or an `UnhandledRetryableError` that the
//! gateway may resolve by retrying the transaction. Any other failure is
//! folded into a `PgError` with code `XX000`.
//!
//! Deciding whether to retry is left to the caller.

use crate::error::{DistributedError, Result};
use query_core::pgerror::get_pg_cause;
use query_core::{PgError, UnhandledRetryableError};
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Tags a receiver accepts for [`ErrorDetail`]
const KNOWN_DETAIL_TAGS: &[&str] = &["PgError", "RetryableTxnError"];

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorDetail {
    #[error(transparent)]
    PgError(PgError),
    #[error(transparent)]
    RetryableTxnError(UnhandledRetryableError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteError {
    #[serde(default)]
    pub detail: Option<ErrorDetail>,
}

impl RemoteError {
    /// An envelope with no error in it
    pub fn none() -> Self {
        Self::default()
    }

    /// Classifies `err` for the wire.
    ///
    /// A `PgError` anywhere in the source chain wins. Otherwise an
    /// `UnhandledRetryableError` in the chain is carried as retryable.
    /// Anything else becomes an internal `PgError` with the error's message.
    pub fn new(err: &(dyn StdError + 'static)) -> Self {
        let detail = if let Some(pg_err) = get_pg_cause(err) {
            ErrorDetail::PgError(pg_err.clone())
        } else if let Some(retry_err) = get_retryable_cause(err) {
            ErrorDetail::RetryableTxnError(retry_err.clone())
        } else {
            ErrorDetail::PgError(PgError::internal(err.to_string()))
        };
        tracing::debug!("Classified remote error: {:?}", detail);
        Self {
            detail: Some(detail),
        }
    }

    /// The error carried by the envelope, `None` for an empty envelope.
    pub fn error_detail(&self) -> Option<&ErrorDetail> {
        self.detail.as_ref()
    }

    /// Takes the error out of the envelope.
    pub fn into_error_detail(self) -> Option<ErrorDetail> {
        self.detail
    }

    /// True if the gateway may retry the transaction.
    pub fn is_retryable(&self) -> bool {
        matches!(self.detail, Some(ErrorDetail::RetryableTxnError(_)))
    }

    /// Encodes the envelope for the wire. An empty envelope is never sent;
    /// leave the error out instead.
    pub fn encode(&self) -> Result<Vec<u8>> {
        if self.detail.is_none() {
            return Err(DistributedError::BadErrorDetail("missing detail".to_string()));
        }
        Ok(serde_json::to_vec(self)?)
    }

    /// Decodes an envelope, rejecting detail kinds this node does not know
    /// and envelopes that carry no detail at all.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_slice(bytes)?;
        Self::from_json_value(value)
    }

    pub(crate) fn from_json_value(value: serde_json::Value) -> Result<Self> {
        if let Some(detail) = value.get("detail").and_then(|d| d.as_object()) {
            if let Some(tag) = detail
                .keys()
                .find(|k| !KNOWN_DETAIL_TAGS.contains(&k.as_str()))
            {
                tracing::warn!("Rejecting error envelope with unknown detail {}", tag);
                return Err(DistributedError::BadErrorDetail(tag.clone()));
            }
        }
        let remote: Self = serde_json::from_value(value)
            .map_err(|e| DistributedError::BadErrorDetail(e.to_string()))?;
        if remote.detail.is_none() {
            tracing::warn!("Rejecting error envelope without detail");
            return Err(DistributedError::BadErrorDetail("missing detail".to_string()));
        }
        Ok(remote)
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{}", detail),
            None => write!(f, "<nil>"),
        }
    }
}

impl From<PgError> for RemoteError {
    fn from(err: PgError) -> Self {
        Self {
            detail: Some(ErrorDetail::PgError(err)),
        }
    }
}

impl From<UnhandledRetryableError> for RemoteError {
    fn from(err: UnhandledRetryableError) -> Self {
        Self {
            detail: Some(ErrorDetail::RetryableTxnError(err)),
        }
    }
}

fn get_retryable_cause<'e>(
    err: &'e (dyn StdError + 'static),
) -> Option<&'e UnhandledRetryableError> {
    let mut current: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(e) = current {
        if let Some(retry_err) = e.downcast_ref::<UnhandledRetryableError>() {
            return Some(retry_err);
        }
        current = e.source();
    }
    None
}
