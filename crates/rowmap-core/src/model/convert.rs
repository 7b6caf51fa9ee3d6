//! Conversions between property types and stored values
//!
//! Every property type usable in a column mapping implements [`ColumnValue`]:
//! it declares its [`DeclaredType`] (used for DDL), renders itself as a
//! [`Value`] for the write path, and coerces a stored [`Value`] back on the
//! read path.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use thiserror::Error;

use super::value::Value;

/// Largest magnitude below which every whole `f64` is an exact integer
const MAX_EXACT_REAL: f64 = 9_007_199_254_740_992.0;

/// The Rust-side type of a mapped property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredType {
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    Bool,
    Text,
    Char,
    DateTime,
    Bytes,
    /// Any type outside the built-in set, named for diagnostics
    Other(&'static str),
}

impl DeclaredType {
    pub fn name(&self) -> &'static str {
        match self {
            DeclaredType::I8 => "i8",
            DeclaredType::I16 => "i16",
            DeclaredType::I32 => "i32",
            DeclaredType::I64 => "i64",
            DeclaredType::Isize => "isize",
            DeclaredType::U8 => "u8",
            DeclaredType::U16 => "u16",
            DeclaredType::U32 => "u32",
            DeclaredType::U64 => "u64",
            DeclaredType::Usize => "usize",
            DeclaredType::F32 => "f32",
            DeclaredType::F64 => "f64",
            DeclaredType::Bool => "bool",
            DeclaredType::Text => "String",
            DeclaredType::Char => "char",
            DeclaredType::DateTime => "DateTime<Utc>",
            DeclaredType::Bytes => "Vec<u8>",
            DeclaredType::Other(name) => name,
        }
    }

    /// Store column type for this property type, if one exists
    pub fn store_type(&self) -> Option<StoreType> {
        match self {
            DeclaredType::I8
            | DeclaredType::I16
            | DeclaredType::I32
            | DeclaredType::I64
            | DeclaredType::Isize
            | DeclaredType::U8
            | DeclaredType::U16
            | DeclaredType::U32
            | DeclaredType::U64
            | DeclaredType::Usize => Some(StoreType::Integer),
            DeclaredType::F64 => Some(StoreType::Double),
            DeclaredType::F32 => Some(StoreType::Float),
            DeclaredType::Text => Some(StoreType::Text),
            DeclaredType::Char => Some(StoreType::Char),
            DeclaredType::DateTime => Some(StoreType::DateTime),
            DeclaredType::Bool => Some(StoreType::Bool),
            DeclaredType::Bytes | DeclaredType::Other(_) => None,
        }
    }
}

/// Column type emitted in CREATE TABLE statements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreType {
    Integer,
    Double,
    Float,
    Text,
    Char,
    DateTime,
    Bool,
}

impl StoreType {
    pub fn as_sql(&self) -> &'static str {
        match self {
            StoreType::Integer => "INTEGER",
            StoreType::Double => "DOUBLE",
            StoreType::Float => "FLOAT",
            StoreType::Text => "TEXT",
            StoreType::Char => "CHAR",
            StoreType::DateTime => "DATETIME",
            StoreType::Bool => "BOOL",
        }
    }
}

/// A stored value that could not be converted to the property type
#[derive(Error, Debug, Clone, PartialEq)]
#[error("cannot convert {found} value to {expected}: {detail}")]
pub struct CoercionError {
    pub expected: &'static str,
    pub found: &'static str,
    pub detail: String,
}

impl CoercionError {
    pub fn new(expected: &'static str, found: &Value, detail: impl Into<String>) -> Self {
        Self {
            expected,
            found: found.kind_name(),
            detail: detail.into(),
        }
    }

    fn unsupported(expected: &'static str, found: &Value) -> Self {
        Self::new(expected, found, "no conversion from this storage class")
    }
}

/// A property type that can be stored in a single column
pub trait ColumnValue: Sized {
    const DECLARED: DeclaredType;

    /// Render for the write path
    fn to_value(&self) -> Value;

    /// Coerce a stored value for the read path
    fn from_value(value: &Value) -> Result<Self, CoercionError>;
}

macro_rules! integer_column {
    ($($ty:ty => $declared:ident),* $(,)?) => {$(
        impl ColumnValue for $ty {
            const DECLARED: DeclaredType = DeclaredType::$declared;

            fn to_value(&self) -> Value {
                // u64 values above i64::MAX travel as text. A TEXT column keeps
                // them exact; an INTEGER column turns them into REAL, which the
                // read path rejects as inexact.
                i64::try_from(*self)
                    .map(Value::Integer)
                    .unwrap_or_else(|_| Value::Text(self.to_string()))
            }

            fn from_value(value: &Value) -> Result<Self, CoercionError> {
                let expected = stringify!($ty);
                match value {
                    Value::Integer(i) => <$ty>::try_from(*i)
                        .map_err(|e| CoercionError::new(expected, value, e.to_string())),
                    Value::Real(r) => {
                        if r.is_finite()
                            && r.fract() == 0.0
                            && r.abs() <= MAX_EXACT_REAL
                            && *r >= <$ty>::MIN as f64
                            && *r <= <$ty>::MAX as f64
                        {
                            Ok(*r as $ty)
                        } else {
                            Err(CoercionError::new(expected, value, format!("{} is not an exact whole number in range", r)))
                        }
                    }
                    Value::Text(s) => s
                        .trim()
                        .parse::<$ty>()
                        .map_err(|e| CoercionError::new(expected, value, e.to_string())),
                    _ => Err(CoercionError::unsupported(expected, value)),
                }
            }
        }
    )*};
}

integer_column!(
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
);

impl ColumnValue for f64 {
    const DECLARED: DeclaredType = DeclaredType::F64;

    fn to_value(&self) -> Value {
        Value::Real(*self)
    }

    fn from_value(value: &Value) -> Result<Self, CoercionError> {
        match value {
            Value::Real(r) => Ok(*r),
            Value::Integer(i) => Ok(*i as f64),
            Value::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|e| CoercionError::new("f64", value, e.to_string())),
            _ => Err(CoercionError::unsupported("f64", value)),
        }
    }
}

impl ColumnValue for f32 {
    const DECLARED: DeclaredType = DeclaredType::F32;

    fn to_value(&self) -> Value {
        Value::Real(f64::from(*self))
    }

    fn from_value(value: &Value) -> Result<Self, CoercionError> {
        match value {
            Value::Real(r) => Ok(*r as f32),
            Value::Integer(i) => Ok(*i as f32),
            Value::Text(s) => s
                .trim()
                .parse::<f32>()
                .map_err(|e| CoercionError::new("f32", value, e.to_string())),
            _ => Err(CoercionError::unsupported("f32", value)),
        }
    }
}

impl ColumnValue for bool {
    const DECLARED: DeclaredType = DeclaredType::Bool;

    fn to_value(&self) -> Value {
        Value::Integer(i64::from(*self))
    }

    fn from_value(value: &Value) -> Result<Self, CoercionError> {
        match value {
            Value::Integer(i) => Ok(*i != 0),
            Value::Real(r) => Ok(*r != 0.0),
            Value::Text(s) => {
                let s = s.trim();
                if s.eq_ignore_ascii_case("true") {
                    Ok(true)
                } else if s.eq_ignore_ascii_case("false") {
                    Ok(false)
                } else {
                    Err(CoercionError::new("bool", value, format!("'{}' is not a boolean", s)))
                }
            }
            _ => Err(CoercionError::unsupported("bool", value)),
        }
    }
}

impl ColumnValue for String {
    const DECLARED: DeclaredType = DeclaredType::Text;

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: &Value) -> Result<Self, CoercionError> {
        match value {
            Value::Text(s) => Ok(s.clone()),
            Value::Integer(i) => Ok(i.to_string()),
            Value::Real(r) => Ok(r.to_string()),
            _ => Err(CoercionError::unsupported("String", value)),
        }
    }
}

impl ColumnValue for char {
    const DECLARED: DeclaredType = DeclaredType::Char;

    fn to_value(&self) -> Value {
        Value::Text(self.to_string())
    }

    fn from_value(value: &Value) -> Result<Self, CoercionError> {
        match value {
            Value::Text(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(c),
                    _ => Err(CoercionError::new(
                        "char",
                        value,
                        format!("expected exactly one character, got {}", s.chars().count()),
                    )),
                }
            }
            Value::Integer(i) => u32::try_from(*i)
                .ok()
                .and_then(char::from_u32)
                .ok_or_else(|| CoercionError::new("char", value, format!("{} is not a code point", i))),
            _ => Err(CoercionError::unsupported("char", value)),
        }
    }
}

impl ColumnValue for DateTime<Utc> {
    const DECLARED: DeclaredType = DeclaredType::DateTime;

    fn to_value(&self) -> Value {
        Value::Text(self.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    fn from_value(value: &Value) -> Result<Self, CoercionError> {
        match value {
            Value::Text(s) => {
                let s = s.trim();
                if let Ok(parsed) = DateTime::parse_from_rfc3339(s) {
                    return Ok(parsed.with_timezone(&Utc));
                }
                NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
                    .map(|naive| Utc.from_utc_datetime(&naive))
                    .map_err(|e| CoercionError::new("DateTime<Utc>", value, e.to_string()))
            }
            Value::Integer(secs) => DateTime::from_timestamp(*secs, 0).ok_or_else(|| {
                CoercionError::new("DateTime<Utc>", value, format!("{} is out of range", secs))
            }),
            _ => Err(CoercionError::unsupported("DateTime<Utc>", value)),
        }
    }
}

impl ColumnValue for Vec<u8> {
    const DECLARED: DeclaredType = DeclaredType::Bytes;

    fn to_value(&self) -> Value {
        Value::Blob(self.clone())
    }

    fn from_value(value: &Value) -> Result<Self, CoercionError> {
        match value {
            Value::Blob(b) => Ok(b.clone()),
            Value::Text(s) => Ok(s.as_bytes().to_vec()),
            _ => Err(CoercionError::unsupported("Vec<u8>", value)),
        }
    }
}

impl<T: ColumnValue> ColumnValue for Option<T> {
    const DECLARED: DeclaredType = T::DECLARED;

    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, ColumnValue::to_value)
    }

    fn from_value(value: &Value) -> Result<Self, CoercionError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}
