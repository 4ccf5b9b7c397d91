//! Transaction conflicts that a higher layer may resolve by retrying

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Why the transaction has to be retried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RetryReason {
    /// A newer committed write exists on a key this transaction wrote.
    WriteTooOld,
    /// The commit timestamp was pushed past the read timestamp.
    SerializableConflict,
    /// Another transaction aborted this one while resolving a conflict.
    AbortedByPusher,
    /// Reads could not be refreshed at the new timestamp.
    ReadWithinUncertaintyInterval,
}

impl fmt::Display for RetryReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryReason::WriteTooOld => write!(f, "WRITE_TOO_OLD"),
            RetryReason::SerializableConflict => write!(f, "RETRY_SERIALIZABLE"),
            RetryReason::AbortedByPusher => write!(f, "ABORT_REASON_PUSHER_ABORTED"),
            RetryReason::ReadWithinUncertaintyInterval => {
                write!(f, "ReadWithinUncertaintyInterval")
            }
        }
    }
}

/// A retryable transaction error that escaped the transaction's own retry
/// loop. The transaction id and epoch identify the attempt that failed.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("restart transaction: {reason}: {message}")]
pub struct UnhandledRetryableError {
    pub txn_id: Uuid,
    pub epoch: u32,
    pub reason: RetryReason,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflicting_key: Option<Vec<u8>>,
    pub message: String,
}

impl UnhandledRetryableError {
    pub fn new(txn_id: Uuid, epoch: u32, reason: RetryReason, message: impl Into<String>) -> Self {
        Self {
            txn_id,
            epoch,
            reason,
            conflicting_key: None,
            message: message.into(),
        }
    }

    pub fn with_conflicting_key(mut self, key: impl Into<Vec<u8>>) -> Self {
        self.conflicting_key = Some(key.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = UnhandledRetryableError::new(
            Uuid::new_v4(),
            2,
            RetryReason::WriteTooOld,
            "write at timestamp 10 too old",
        );
        assert_eq!(
            err.to_string(),
            "restart transaction: WRITE_TOO_OLD: write at timestamp 10 too old"
        );
    }

    #[test]
    fn test_serde_keeps_identity() {
        let err = UnhandledRetryableError::new(
            Uuid::new_v4(),
            5,
            RetryReason::SerializableConflict,
            "pushed",
        )
        .with_conflicting_key(b"/Table/52/1/7".to_vec());

        let json = serde_json::to_string(&err).unwrap();
        let back: UnhandledRetryableError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
        assert_eq!(back.conflicting_key.as_deref(), Some(&b"/Table/52/1/7"[..]));
    }
}
