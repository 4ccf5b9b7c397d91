//! Ordering codec
//!
//! Converts between the planner's [`ColumnOrdering`] and the [`OrderingSpec`]
//! sent to remote flows. Column indices can be renumbered on the way out
//! through a plan-to-stream column map, in which `-1` marks a plan column that
//! the stream does not carry.

use crate::error::{DistributedError, Result};
use query_core::{ColumnOrderInfo, ColumnOrdering, Direction};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Sort direction as it appears on the wire (`ASC = 0`, `DESC = 1`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderingDirection {
    Asc,
    Desc,
}

impl OrderingDirection {
    /// Decodes a wire tag. Anything other than `ASC` is `DESC`.
    pub fn from_wire(tag: u32) -> Self {
        if tag == 0 {
            OrderingDirection::Asc
        } else {
            OrderingDirection::Desc
        }
    }

    /// Wire tag for this direction
    pub fn as_wire(self) -> u32 {
        match self {
            OrderingDirection::Asc => 0,
            OrderingDirection::Desc => 1,
        }
    }
}

impl Serialize for OrderingDirection {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.as_wire())
    }
}

impl<'de> Deserialize<'de> for OrderingDirection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        u32::deserialize(deserializer).map(Self::from_wire)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderingColumn {
    pub col_idx: u32,
    pub direction: OrderingDirection,
}

/// Sort order of a stream, primary key first
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderingSpec {
    #[serde(default)]
    pub columns: Vec<OrderingColumn>,
}

impl OrderingSpec {
    /// True for an unordered stream.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Converts a wire ordering into the planner representation.
pub fn convert_to_column_ordering(spec: &OrderingSpec) -> ColumnOrdering {
    spec.columns
        .iter()
        .map(|c| {
            let direction = match c.direction {
                OrderingDirection::Asc => Direction::Ascending,
                OrderingDirection::Desc => Direction::Descending,
            };
            ColumnOrderInfo::new(c.col_idx as usize, direction)
        })
        .collect()
}

/// Converts a planner ordering into its wire form, keeping column indices.
///
/// Wire indices are `u32`; planner indices must fit. Use
/// [`convert_to_mapped_spec_ordering`] when that is not already known.
pub fn convert_to_spec_ordering(ordering: &ColumnOrdering) -> OrderingSpec {
    OrderingSpec {
        columns: ordering
            .iter()
            .map(|c| spec_column(c.col_idx as u32, c.direction))
            .collect(),
    }
}

/// Converts a planner ordering into its wire form, renumbering each column
/// through `plan_to_stream_col_map` when one is given.
///
/// A sort column that the stream does not carry means the planner chose an
/// ordering it cannot deliver; this is reported as an internal error.
pub fn convert_to_mapped_spec_ordering(
    ordering: &ColumnOrdering,
    plan_to_stream_col_map: Option<&[i32]>,
) -> Result<OrderingSpec> {
    let Some(col_map) = plan_to_stream_col_map else {
        let columns = ordering
            .iter()
            .map(|c| Ok(spec_column(wire_col_idx(c.col_idx)?, c.direction)))
            .collect::<Result<Vec<_>>>()?;
        return Ok(OrderingSpec { columns });
    };

    let mut columns = Vec::with_capacity(ordering.len());
    for c in ordering {
        let stream_idx = match col_map.get(c.col_idx) {
            Some(&idx) if idx >= 0 => wire_col_idx(idx as usize)?,
            _ => {
                tracing::error!(
                    "Sort column {} not available in stream (map: {:?})",
                    c.col_idx,
                    col_map
                );
                return Err(DistributedError::Internal(format!(
                    "column {} in sort ordering not available",
                    c.col_idx
                )));
            }
        };
        columns.push(spec_column(stream_idx, c.direction));
    }

    tracing::debug!("Mapped {} sort columns onto stream", columns.len());
    Ok(OrderingSpec { columns })
}

fn wire_col_idx(col_idx: usize) -> Result<u32> {
    u32::try_from(col_idx).map_err(|_| {
        DistributedError::Internal(format!("column {} does not fit a wire ordering", col_idx))
    })
}

fn spec_column(col_idx: u32, direction: Direction) -> OrderingColumn {
    let direction = match direction {
        Direction::Ascending => OrderingDirection::Asc,
        Direction::Descending => OrderingDirection::Desc,
    };
    OrderingColumn { col_idx, direction }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_ordering() -> impl Strategy<Value = ColumnOrdering> {
        proptest::collection::vec((0usize..64, any::<bool>()), 0..8).prop_map(|cols| {
            cols.into_iter()
                .map(|(idx, asc)| {
                    if asc {
                        ColumnOrderInfo::asc(idx)
                    } else {
                        ColumnOrderInfo::desc(idx)
                    }
                })
                .collect::<ColumnOrdering>()
        })
    }

    #[test]
    fn test_to_spec_descending() {
        let ordering = ColumnOrdering::new(vec![ColumnOrderInfo::desc(2)]);
        let spec = convert_to_spec_ordering(&ordering);
        assert_eq!(
            spec.columns,
            vec![OrderingColumn {
                col_idx: 2,
                direction: OrderingDirection::Desc
            }]
        );
    }

    #[test]
    fn test_to_column_ordering_ascending() {
        let spec = OrderingSpec {
            columns: vec![OrderingColumn {
                col_idx: 0,
                direction: OrderingDirection::Asc,
            }],
        };
        let ordering = convert_to_column_ordering(&spec);
        assert_eq!(ordering.columns(), &[ColumnOrderInfo::asc(0)]);
    }

    #[test]
    fn test_unknown_direction_tag_decodes_as_desc() {
        let json = r#"{"columns":[{"col_idx":3,"direction":7},{"col_idx":1,"direction":0}]}"#;
        let spec: OrderingSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.columns[0].direction, OrderingDirection::Desc);
        assert_eq!(spec.columns[1].direction, OrderingDirection::Asc);

        let ordering = convert_to_column_ordering(&spec);
        assert_eq!(ordering.columns()[0].direction, Direction::Descending);
    }

    #[test]
    fn test_direction_wire_tags() {
        let spec = convert_to_spec_ordering(&ColumnOrdering::new(vec![
            ColumnOrderInfo::asc(4),
            ColumnOrderInfo::desc(5),
        ]));
        let json = serde_json::to_string(&spec).unwrap();
        assert_eq!(
            json,
            r#"{"columns":[{"col_idx":4,"direction":0},{"col_idx":5,"direction":1}]}"#
        );
    }

    #[test]
    fn test_mapped_without_map_matches_unmapped() {
        let ordering = ColumnOrdering::new(vec![ColumnOrderInfo::asc(1), ColumnOrderInfo::desc(0)]);
        let mapped = convert_to_mapped_spec_ordering(&ordering, None).unwrap();
        assert_eq!(mapped, convert_to_spec_ordering(&ordering));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_oversized_column_is_internal() {
        let ordering = ColumnOrdering::new(vec![ColumnOrderInfo::asc(u32::MAX as usize + 1)]);
        let err = convert_to_mapped_spec_ordering(&ordering, None).unwrap_err();
        assert!(err.is_internal());
    }

    #[test]
    fn test_mapped_renumbers_columns() {
        let ordering = ColumnOrdering::new(vec![ColumnOrderInfo::desc(2), ColumnOrderInfo::asc(0)]);
        let col_map = [1, -1, 0];
        let spec = convert_to_mapped_spec_ordering(&ordering, Some(col_map.as_slice())).unwrap();

        let back = convert_to_column_ordering(&spec);
        assert_eq!(
            back.columns(),
            &[ColumnOrderInfo::desc(0), ColumnOrderInfo::asc(1)]
        );
    }

    #[test]
    fn test_mapped_missing_column_is_internal() {
        let ordering = ColumnOrdering::new(vec![ColumnOrderInfo::asc(0), ColumnOrderInfo::asc(1)]);
        let col_map = [0, -1];

        let err = convert_to_mapped_spec_ordering(&ordering, Some(col_map.as_slice())).unwrap_err();
        assert!(err.is_internal());
        assert!(matches!(err, DistributedError::Internal(_)));
        assert_eq!(
            err.to_string(),
            "internal error: column 1 in sort ordering not available"
        );
    }

    #[test]
    fn test_mapped_out_of_range_is_internal() {
        let ordering = ColumnOrdering::new(vec![ColumnOrderInfo::asc(5)]);
        let err = convert_to_mapped_spec_ordering(&ordering, Some(&[0, 1][..])).unwrap_err();
        assert!(err.is_internal());
    }

    proptest! {
        #[test]
        fn test_round_trip(ordering in arb_ordering()) {
            let spec = convert_to_spec_ordering(&ordering);
            prop_assert_eq!(convert_to_column_ordering(&spec), ordering);
        }

        #[test]
        fn test_round_trip_through_json(ordering in arb_ordering()) {
            let json = serde_json::to_vec(&convert_to_spec_ordering(&ordering)).unwrap();
            let spec: OrderingSpec = serde_json::from_slice(&json).unwrap();
            prop_assert_eq!(convert_to_column_ordering(&spec), ordering);
        }

        #[test]
        fn test_remap_applies_map(
            ordering in arb_ordering(),
            shift in 0i32..100
        ) {
            let col_map: Vec<i32> = (0..64).map(|i| i + shift).collect();
            let spec =
                convert_to_mapped_spec_ordering(&ordering, Some(col_map.as_slice())).unwrap();
            let back = convert_to_column_ordering(&spec);

            prop_assert_eq!(back.len(), ordering.len());
            for (got, want) in back.iter().zip(ordering.iter()) {
                prop_assert_eq!(got.col_idx, col_map[want.col_idx] as usize);
                prop_assert_eq!(got.direction, want.direction);
            }
        }

        #[test]
        fn test_remap_miss_is_fatal(
            ordering in arb_ordering().prop_filter("non-empty", |o| !o.is_empty())
        ) {
            let missing = ordering.columns()[0].col_idx;
            let col_map: Vec<i32> = (0..64)
                .map(|i| if i == missing { -1 } else { i as i32 })
                .collect();
            let err =
                convert_to_mapped_spec_ordering(&ordering, Some(col_map.as_slice())).unwrap_err();
            prop_assert!(err.is_internal());
        }
    }
}
