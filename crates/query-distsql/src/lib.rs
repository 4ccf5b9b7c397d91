//! Distributed SQL wire specifications
//!
//! This crate defines the data exchanged between the gateway that plans a
//! query and the nodes that run fragments of it. It only shapes messages; it
//! neither moves them nor decides what to do when a fragment fails.
//!
//! # Modules
//!
//! - [`ordering`]: Sort orderings, with column renumbering onto streams
//! - [`expression`]: Expressions as SQL text or in-process trees
//! - [`envelope`]: Classified errors reported by remote fragments
//! - [`network`]: Stream, sync and metadata specs
//! - [`config`]: Planning options
//!
//! # Example
//!
//! ```
//! use query_core::{ColumnOrderInfo, ColumnOrdering, PgError};
//! use query_distsql::{convert_to_mapped_spec_ordering, RemoteError};
//!
//! let ordering = ColumnOrdering::new(vec![ColumnOrderInfo::desc(2)]);
//! let spec = convert_to_mapped_spec_ordering(&ordering, Some(&[0, -1, 1][..])).unwrap();
//! assert_eq!(spec.columns[0].col_idx, 1);
//!
//! let remote = RemoteError::new(&PgError::internal("boom"));
//! assert_eq!(remote.to_string(), "boom");
//! ```

pub mod config;
pub mod envelope;
pub mod error;
pub mod expression;
pub mod network;
pub mod ordering;

// Re-exports
pub use config::DistSqlConfig;
pub use envelope::{ErrorDetail, RemoteError};
pub use error::{DistributedError, Result};
pub use expression::{expr_fmt_ctx_base, Expression, ExpressionBuilder, LocalExpr, WireExpression};
pub use network::{
    FlowId, InputSyncSpec, ProducerMetadata, StreamEndpointSpec, StreamEndpointType, SyncType,
};
pub use ordering::{
    convert_to_column_ordering, convert_to_mapped_spec_ordering, convert_to_spec_ordering,
    OrderingColumn, OrderingDirection, OrderingSpec,
};
