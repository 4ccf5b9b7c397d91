//! Planner-side column orderings
//!
//! A `ColumnOrdering` addresses columns by their index in the row schema the
//! planner has in scope. The first entry is the primary sort key.

use crate::error::{QueryError, Result};
use serde::{Deserialize, Serialize};

/// Sort direction of a single key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    pub fn reverse(self) -> Self {
        match self {
            Direction::Ascending => Direction::Descending,
            Direction::Descending => Direction::Ascending,
        }
    }
}

/// One sort key: a column index and the direction it is sorted in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnOrderInfo {
    /// At most `u32::MAX` for orderings sent to other nodes
    pub col_idx: usize,
    pub direction: Direction,
}

impl ColumnOrderInfo {
    pub fn new(col_idx: usize, direction: Direction) -> Self {
        Self { col_idx, direction }
    }

    pub fn asc(col_idx: usize) -> Self {
        Self::new(col_idx, Direction::Ascending)
    }

    pub fn desc(col_idx: usize) -> Self {
        Self::new(col_idx, Direction::Descending)
    }
}

/// Ordered list of sort keys
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnOrdering(Vec<ColumnOrderInfo>);

impl ColumnOrdering {
    pub fn new(columns: Vec<ColumnOrderInfo>) -> Self {
        Self(columns)
    }

    pub fn columns(&self) -> &[ColumnOrderInfo] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColumnOrderInfo> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, column: ColumnOrderInfo) {
        self.0.push(column);
    }

    /// Checks that every key addresses a column of a row with `width` columns.
    pub fn check_width(&self, width: usize) -> Result<()> {
        match self.0.iter().find(|c| c.col_idx >= width) {
            Some(c) => Err(QueryError::ColumnOutOfRange {
                index: c.col_idx,
                width,
            }),
            None => Ok(()),
        }
    }
}

impl From<Vec<ColumnOrderInfo>> for ColumnOrdering {
    fn from(columns: Vec<ColumnOrderInfo>) -> Self {
        Self(columns)
    }
}

impl FromIterator<ColumnOrderInfo> for ColumnOrdering {
    fn from_iter<I: IntoIterator<Item = ColumnOrderInfo>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ColumnOrdering {
    type Item = &'a ColumnOrderInfo;
    type IntoIter = std::slice::Iter<'a, ColumnOrderInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
