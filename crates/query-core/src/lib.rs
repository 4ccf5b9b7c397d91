pub mod error;
pub mod eval;
pub mod expr;
pub mod fmt;
pub mod ordering;
pub mod pgerror;
pub mod txn;
pub mod types;

pub use error::{QueryError, Result};
pub use eval::EvalContext;
pub use expr::{BinaryOperator, Expr, Placeholder, UnaryOperator};
pub use fmt::{FmtCtx, FmtFlags};
pub use ordering::{ColumnOrderInfo, ColumnOrdering, Direction};
pub use pgerror::{get_pg_cause, PgError};
pub use txn::{RetryReason, UnhandledRetryableError};
pub use types::*;
