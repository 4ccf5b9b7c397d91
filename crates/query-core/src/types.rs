use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Boolean,
    Int64,
    Float64,
    Utf8,
    Binary,
    Null,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Boolean => write!(f, "BOOL"),
            DataType::Int64 => write!(f, "INT8"),
            DataType::Float64 => write!(f, "FLOAT8"),
            DataType::Utf8 => write!(f, "STRING"),
            DataType::Binary => write!(f, "BYTES"),
            DataType::Null => write!(f, "UNKNOWN"),
        }
    }
}

/// A single SQL value, as produced by evaluating a placeholder or literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Datum {
    Null,
    Boolean(bool),
    Int64(i64),
    Float64(f64),
    Utf8(String),
    Binary(Vec<u8>),
}

impl Datum {
    pub fn data_type(&self) -> DataType {
        match self {
            Datum::Null => DataType::Null,
            Datum::Boolean(_) => DataType::Boolean,
            Datum::Int64(_) => DataType::Int64,
            Datum::Float64(_) => DataType::Float64,
            Datum::Utf8(_) => DataType::Utf8,
            Datum::Binary(_) => DataType::Binary,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Datum::Null)
    }
}

/// Renders the datum as a SQL literal that parses back to the same value.
impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Datum::Null => write!(f, "NULL"),
            Datum::Boolean(b) => write!(f, "{}", b),
            Datum::Int64(v) => write!(f, "{}", v),
            Datum::Float64(v) if v.is_nan() => write!(f, "'NaN'"),
            Datum::Float64(v) if v.is_infinite() => {
                if v.is_sign_positive() {
                    write!(f, "'+Inf'")
                } else {
                    write!(f, "'-Inf'")
                }
            }
            // Debug keeps the decimal point on integral floats (1.0, not 1)
            Datum::Float64(v) => write!(f, "{:?}", v),
            Datum::Utf8(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Datum::Binary(bytes) => {
                write!(f, "'\\x")?;
                for b in bytes {
                    write!(f, "{:02x}", b)?;
                }
                write!(f, "'")
            }
        }
    }
}

impl From<bool> for Datum {
    fn from(v: bool) -> Self {
        Datum::Boolean(v)
    }
}

impl From<i64> for Datum {
    fn from(v: i64) -> Self {
        Datum::Int64(v)
    }
}

impl From<f64> for Datum {
    fn from(v: f64) -> Self {
        Datum::Float64(v)
    }
}

impl From<&str> for Datum {
    fn from(v: &str) -> Self {
        Datum::Utf8(v.to_string())
    }
}

impl From<String> for Datum {
    fn from(v: String) -> Self {
        Datum::Utf8(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datum_literals() {
        assert_eq!(Datum::Null.to_string(), "NULL");
        assert_eq!(Datum::from(true).to_string(), "true");
        assert_eq!(Datum::from(-7i64).to_string(), "-7");
        assert_eq!(Datum::from(1.0f64).to_string(), "1.0");
        assert_eq!(Datum::from(f64::NEG_INFINITY).to_string(), "'-Inf'");
        assert_eq!(Datum::from("it's").to_string(), "'it''s'");
        assert_eq!(Datum::Binary(vec![0x0a, 0xff]).to_string(), "'\\x0aff'");
    }

    #[test]
    fn test_datum_type() {
        assert_eq!(Datum::from("a").data_type(), DataType::Utf8);
        assert_eq!(Datum::Null.data_type(), DataType::Null);
        assert_eq!(DataType::Int64.to_string(), "INT8");
    }
}
