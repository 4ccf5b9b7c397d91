//! Expression envelope
//!
//! An [`Expression`] holds a scalar expression in up to two forms: SQL text
//! with ordinal references (`@1`, `@2`, ...) that can be sent anywhere, and an
//! in-process expression tree that is only valid on the node that built it.
//! Flows that stay on the gateway use the tree and skip the round trip
//! through text.
//!
//! Only [`WireExpression`] is serializable, so the in-process form cannot be
//! sent to another node by accident. [`Expression::to_wire`] refuses an
//! expression whose text was never rendered.

use crate::config::DistSqlConfig;
use crate::error::{DistributedError, Result};
use query_core::{EvalContext, Expr, FmtCtx, FmtFlags, QueryError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Handle to an expression tree owned by this process
#[derive(Debug, Clone, PartialEq)]
pub struct LocalExpr(Arc<Expr>);

impl LocalExpr {
    /// Wraps a tree built by this process.
    pub fn new(expr: Expr) -> Self {
        Self(Arc::new(expr))
    }

    pub fn expr(&self) -> &Expr {
        &self.0
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expression {
    /// Unused by receivers
    pub version: String,
    /// SQL text, empty when unset
    pub expr: String,
    /// Never serialized
    pub local_expr: Option<LocalExpr>,
}

impl Expression {
    /// Text-only expression, as received from another node
    pub fn from_sql(expr: impl Into<String>) -> Self {
        Self {
            expr: expr.into(),
            ..Default::default()
        }
    }

    /// Local-only expression. It has no text until one is rendered.
    pub fn from_local(expr: Expr) -> Self {
        Self {
            local_expr: Some(LocalExpr::new(expr)),
            ..Default::default()
        }
    }

    /// True if neither the text nor the local form is set.
    pub fn is_empty(&self) -> bool {
        self.expr.is_empty() && self.local_expr.is_none()
    }

    /// Strips the local form, keeping the text that is sent to other nodes.
    pub fn to_wire(&self) -> Result<WireExpression> {
        if self.expr.is_empty() && self.local_expr.is_some() {
            tracing::error!("Attempted to send a local-only expression: {}", self);
            return Err(DistributedError::Internal(
                "expression has no serializable form".to_string(),
            ));
        }
        Ok(WireExpression {
            version: self.version.clone(),
            expr: self.expr.clone(),
        })
    }
}

/// Renders the local form canonically if present, else the text, else
/// `none`. Meant for comparing plans, not for display to users.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(local) = &self.local_expr {
            let mut ctx = FmtCtx::new(FmtFlags::CheckEquivalence);
            ctx.format_node(local.expr()).map_err(|_| fmt::Error)?;
            return f.write_str(&ctx.close_and_get_string());
        }
        if !self.expr.is_empty() {
            return f.write_str(&self.expr);
        }
        f.write_str("none")
    }
}

/// The form of an [`Expression`] that crosses node boundaries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireExpression {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub expr: String,
}

impl From<WireExpression> for Expression {
    fn from(wire: WireExpression) -> Self {
        Self {
            version: wire.version,
            expr: wire.expr,
            local_expr: None,
        }
    }
}

/// Formatting context for serializing expressions. Placeholders are
/// replaced by their values from `eval_ctx`; callers may add an indexed var
/// hook on top.
///
/// A placeholder without a value is an internal error: expressions are only
/// serialized once every placeholder is known to be bound.
pub fn expr_fmt_ctx_base(eval_ctx: &EvalContext) -> FmtCtx<'_> {
    FmtCtx::new(FmtFlags::CheckEquivalence).with_placeholder_format(move |ctx, p| {
        let datum = p.eval(eval_ctx).map_err(|e| {
            QueryError::Internal(format!("failed to serialize placeholder: {}", e))
        })?;
        ctx.format_datum(&datum);
        Ok(())
    })
}

/// Builds [`Expression`]s for flow specs.
#[derive(Debug)]
pub struct ExpressionBuilder<'a> {
    config: &'a DistSqlConfig,
    eval_ctx: &'a EvalContext,
}

impl<'a> ExpressionBuilder<'a> {
    pub fn new(config: &'a DistSqlConfig, eval_ctx: &'a EvalContext) -> Self {
        Self { config, eval_ctx }
    }

    /// Builds the expression, renumbering indexed vars through
    /// `indexed_var_map` (plan column to stream column, `-1` = not in the
    /// stream) when one is given.
    ///
    /// Local flows keep the tree; everything else gets text only.
    pub fn make_expression(
        &self,
        expr: &Expr,
        indexed_var_map: Option<&[i32]>,
    ) -> Result<Expression> {
        if self.config.local_flows {
            let expr = match indexed_var_map {
                Some(map) => remap_indexed_vars(expr, map)?,
                None => expr.clone(),
            };
            return Ok(Expression {
                version: self.config.expr_version.clone(),
                expr: String::new(),
                local_expr: Some(LocalExpr::new(expr)),
            });
        }

        let mut ctx = expr_fmt_ctx_base(self.eval_ctx);
        if let Some(map) = indexed_var_map {
            ctx = ctx.with_indexed_var_format(move |ctx, idx| {
                let stream_idx = map_indexed_var(map, idx)?;
                ctx.write_str(&format!("@{}", stream_idx + 1));
                Ok(())
            });
        }
        ctx.format_node(expr)?;
        let text = ctx.close_and_get_string();
        tracing::debug!("Serialized expression: {}", text);

        Ok(Expression {
            version: self.config.expr_version.clone(),
            expr: text,
            local_expr: None,
        })
    }
}

fn map_indexed_var(map: &[i32], idx: usize) -> query_core::Result<usize> {
    match map.get(idx) {
        Some(&stream_idx) if stream_idx >= 0 => Ok(stream_idx as usize),
        _ => Err(QueryError::Internal(format!(
            "indexed var @{} not available in stream",
            idx + 1
        ))),
    }
}

fn remap_indexed_vars(expr: &Expr, map: &[i32]) -> Result<Expr> {
    let remapped = match expr {
        Expr::IndexedVar(idx) => Expr::IndexedVar(map_indexed_var(map, *idx)?),
        Expr::Placeholder(_) | Expr::Literal(_) => expr.clone(),
        Expr::BinaryExpr { left, op, right } => Expr::binary(
            remap_indexed_vars(left, map)?,
            *op,
            remap_indexed_vars(right, map)?,
        ),
        Expr::UnaryExpr { op, expr } => Expr::unary(*op, remap_indexed_vars(expr, map)?),
        Expr::Cast { expr, data_type } => Expr::cast(remap_indexed_vars(expr, map)?, *data_type),
        Expr::IsNull { expr, negated } => Expr::is_null(remap_indexed_vars(expr, map)?, *negated),
    };
    Ok(remapped)
}
