//! Expression formatting
//!
//! `FmtCtx` renders an [`Expr`] into SQL text. Callers may install hooks that
//! replace how placeholders and indexed vars are printed, e.g. to substitute
//! bound values or to renumber columns. Hook failures abort formatting and are
//! returned from [`FmtCtx::format_node`].

use crate::error::Result;
use crate::expr::{Expr, Placeholder};
use crate::types::Datum;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FmtFlags {
    /// No annotations. Binary expressions are parenthesized only as
    /// operands.
    Simple,
    /// Canonical form: equivalent expressions render to the same string.
    /// Binary expressions are fully parenthesized, literals carry a type
    /// annotation and operands of commutative operators are sorted.
    CheckEquivalence,
}

pub type PlaceholderFormatter<'a> = Box<dyn Fn(&mut FmtCtx<'a>, &Placeholder) -> Result<()> + 'a>;

pub type IndexedVarFormatter<'a> = Box<dyn Fn(&mut FmtCtx<'a>, usize) -> Result<()> + 'a>;

pub struct FmtCtx<'a> {
    buf: String,
    flags: FmtFlags,
    placeholder_format: Option<PlaceholderFormatter<'a>>,
    indexed_var_format: Option<IndexedVarFormatter<'a>>,
}

impl<'a> FmtCtx<'a> {
    pub fn new(flags: FmtFlags) -> Self {
        Self {
            buf: String::new(),
            flags,
            placeholder_format: None,
            indexed_var_format: None,
        }
    }

    pub fn with_placeholder_format<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut FmtCtx<'a>, &Placeholder) -> Result<()> + 'a,
    {
        self.placeholder_format = Some(Box::new(f));
        self
    }

    pub fn with_indexed_var_format<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut FmtCtx<'a>, usize) -> Result<()> + 'a,
    {
        self.indexed_var_format = Some(Box::new(f));
        self
    }

    pub fn flags(&self) -> FmtFlags {
        self.flags
    }

    pub fn write_str(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    /// Writes a datum as a literal, annotated with its type in canonical mode.
    pub fn format_datum(&mut self, datum: &Datum) {
        let _ = write!(self.buf, "{}", datum);
        if self.flags == FmtFlags::CheckEquivalence && !datum.is_null() {
            let _ = write!(self.buf, ":::{}", datum.data_type());
        }
    }

    pub fn format_node(&mut self, expr: &Expr) -> Result<()> {
        match expr {
            Expr::IndexedVar(idx) => match self.indexed_var_format.take() {
                Some(f) => {
                    let res = f(self, *idx);
                    self.indexed_var_format = Some(f);
                    res
                }
                None => {
                    let _ = write!(self.buf, "@{}", idx + 1);
                    Ok(())
                }
            },
            Expr::Placeholder(p) => match self.placeholder_format.take() {
                Some(f) => {
                    let res = f(self, p);
                    self.placeholder_format = Some(f);
                    res
                }
                None => {
                    let _ = write!(self.buf, "{}", p);
                    Ok(())
                }
            },
            Expr::Literal(datum) => {
                self.format_datum(datum);
                Ok(())
            }
            Expr::BinaryExpr { left, op, right } => {
                let canonical = self.flags == FmtFlags::CheckEquivalence;
                let mut lhs = self.render_operand(left)?;
                let mut rhs = self.render_operand(right)?;
                if canonical && op.is_commutative() && rhs < lhs {
                    std::mem::swap(&mut lhs, &mut rhs);
                }
                if canonical {
                    let _ = write!(self.buf, "({} {} {})", lhs, op, rhs);
                } else {
                    let _ = write!(self.buf, "{} {} {}", lhs, op, rhs);
                }
                Ok(())
            }
            Expr::UnaryExpr { op, expr } => {
                let operand = self.render_operand(expr)?;
                let _ = write!(self.buf, "{}{}", op, operand);
                Ok(())
            }
            Expr::Cast { expr, data_type } => {
                let operand = self.render_operand(expr)?;
                let _ = write!(self.buf, "{}::{}", operand, data_type);
                Ok(())
            }
            Expr::IsNull { expr, negated } => {
                let operand = self.render_operand(expr)?;
                let not = if *negated { "NOT " } else { "" };
                let _ = write!(self.buf, "{} IS {}NULL", operand, not);
                Ok(())
            }
        }
    }

    /// Renders a sub-expression into its own string using the same hooks.
    /// Every non-leaf operand is parenthesized so the text parses back into
    /// the same tree. Canonical binary expressions bring their own.
    fn render_operand(&mut self, expr: &Expr) -> Result<String> {
        let saved = std::mem::take(&mut self.buf);
        let needs_parens = match expr {
            Expr::IndexedVar(_) | Expr::Placeholder(_) | Expr::Literal(_) => false,
            Expr::BinaryExpr { .. } => self.flags == FmtFlags::Simple,
            Expr::UnaryExpr { .. } | Expr::Cast { .. } | Expr::IsNull { .. } => true,
        };
        if needs_parens {
            self.buf.push('(');
        }
        let res = self.format_node(expr);
        if needs_parens {
            self.buf.push(')');
        }
        let rendered = std::mem::replace(&mut self.buf, saved);
        res.map(|_| rendered)
    }

    pub fn close_and_get_string(self) -> String {
        self.buf
    }
}

impl std::fmt::Debug for FmtCtx<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FmtCtx")
            .field("flags", &self.flags)
            .field("has_placeholder_format", &self.placeholder_format.is_some())
            .field("has_indexed_var_format", &self.indexed_var_format.is_some())
            .finish()
    }
}
