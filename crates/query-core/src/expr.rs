//! Scalar expression tree
//!
//! Input columns are referenced by ordinal (`IndexedVar`, rendered `@1`,
//! `@2`, ...) and statement parameters by placeholder (`$1`, `$2`, ...).

use crate::error::{QueryError, Result};
use crate::eval::EvalContext;
use crate::types::{DataType, Datum};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Reference to an input column, 0-based
    IndexedVar(usize),
    Placeholder(Placeholder),
    Literal(Datum),
    BinaryExpr {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },
    UnaryExpr {
        op: UnaryOperator,
        expr: Box<Expr>,
    },
    Cast {
        expr: Box<Expr>,
        data_type: DataType,
    },
    IsNull {
        expr: Box<Expr>,
        negated: bool,
    },
}

impl Expr {
    pub fn col(idx: usize) -> Self {
        Expr::IndexedVar(idx)
    }

    pub fn placeholder(idx: usize) -> Self {
        Expr::Placeholder(Placeholder::new(idx))
    }

    pub fn lit(value: impl Into<Datum>) -> Self {
        Expr::Literal(value.into())
    }

    pub fn binary(left: Expr, op: BinaryOperator, right: Expr) -> Self {
        Expr::BinaryExpr {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn unary(op: UnaryOperator, expr: Expr) -> Self {
        Expr::UnaryExpr {
            op,
            expr: Box::new(expr),
        }
    }

    pub fn cast(expr: Expr, data_type: DataType) -> Self {
        Expr::Cast {
            expr: Box::new(expr),
            data_type,
        }
    }

    pub fn is_null(expr: Expr, negated: bool) -> Self {
        Expr::IsNull {
            expr: Box::new(expr),
            negated,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperator {
    Plus,
    Minus,
    Multiply,
    Divide,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
}

impl BinaryOperator {
    /// Operators whose operands can be swapped without changing the result.
    pub fn is_commutative(self) -> bool {
        matches!(
            self,
            BinaryOperator::Plus
                | BinaryOperator::Multiply
                | BinaryOperator::Eq
                | BinaryOperator::NotEq
                | BinaryOperator::And
                | BinaryOperator::Or
        )
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinaryOperator::Plus => "+",
            BinaryOperator::Minus => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Eq => "=",
            BinaryOperator::NotEq => "!=",
            BinaryOperator::Lt => "<",
            BinaryOperator::LtEq => "<=",
            BinaryOperator::Gt => ">",
            BinaryOperator::GtEq => ">=",
            BinaryOperator::And => "AND",
            BinaryOperator::Or => "OR",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOperator {
    Not,
    Minus,
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOperator::Not => f.write_str("NOT "),
            UnaryOperator::Minus => f.write_str("-"),
        }
    }
}

/// A statement parameter, 0-based (`$1` is index 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placeholder {
    pub idx: usize,
}

impl Placeholder {
    pub fn new(idx: usize) -> Self {
        Self { idx }
    }

    /// Looks up the value bound to this placeholder.
    pub fn eval(&self, ctx: &EvalContext) -> Result<Datum> {
        ctx.placeholder(self.idx)
            .cloned()
            .ok_or(QueryError::NoPlaceholderValue(self.idx + 1))
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.idx + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_eval() {
        let ctx = EvalContext::new().with_placeholders(vec![Datum::from(10i64)]);
        assert_eq!(Placeholder::new(0).eval(&ctx).unwrap(), Datum::Int64(10));

        let err = Placeholder::new(1).eval(&ctx).unwrap_err();
        assert!(matches!(err, QueryError::NoPlaceholderValue(2)));
        assert_eq!(err.to_string(), "No value provided for placeholder $2");
    }

    #[test]
    fn test_commutative_operators() {
        assert!(BinaryOperator::Plus.is_commutative());
        assert!(BinaryOperator::And.is_commutative());
        assert!(!BinaryOperator::Minus.is_commutative());
        assert!(!BinaryOperator::Lt.is_commutative());
    }
}
