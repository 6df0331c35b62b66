//! Value representations for the query type system.
//!
//! This module defines the closed set of value kinds the engine may hand to
//! a [`Type`](crate::types::Type), and the driver-facing shape produced by
//! [`Type::native`](crate::types::Type::native).

use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;

/// A value as produced by the surrounding engine.
///
/// `Value` covers every input kind the type system understands. Each
/// built-in type has exactly one canonical variant (see
/// [`Type::internal_type`](crate::types::Type::internal_type)); every other
/// variant is only an accepted conversion source.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absence of a value (SQL NULL)
    Null,

    /// Boolean value
    Bool(bool),

    /// 8-bit signed integer
    Int8(i8),

    /// 16-bit signed integer
    Int16(i16),

    /// 32-bit signed integer
    Int32(i32),

    /// 64-bit signed integer
    Int64(i64),

    /// 8-bit unsigned integer
    UInt8(u8),

    /// 16-bit unsigned integer
    UInt16(u16),

    /// 32-bit unsigned integer
    UInt32(u32),

    /// 64-bit unsigned integer
    UInt64(u64),

    /// 32-bit IEEE 754 floating point
    Float32(f32),

    /// 64-bit IEEE 754 floating point
    Float64(f64),

    /// UTF-8 text
    String(String),

    /// Raw byte sequence
    Bytes(Vec<u8>),

    /// UUID value
    Uuid(Uuid),

    /// Date/time with timezone
    DateTime(DateTime<Utc>),
}

/// Payload-free tag of a [`Value`] variant.
///
/// The declaration order doubles as the fallback ordering used when a
/// comparison is handed operands of different kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    String,
    Bytes,
    Uuid,
    DateTime,
}

impl ValueKind {
    /// Short lowercase name used in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int8 => "i8",
            Self::Int16 => "i16",
            Self::Int32 => "i32",
            Self::Int64 => "i64",
            Self::UInt8 => "u8",
            Self::UInt16 => "u16",
            Self::UInt32 => "u32",
            Self::UInt64 => "u64",
            Self::Float32 => "f32",
            Self::Float64 => "f64",
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::Uuid => "uuid",
            Self::DateTime => "datetime",
        }
    }

    /// Check if this kind is a signed or unsigned integer.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Self::Int8
                | Self::Int16
                | Self::Int32
                | Self::Int64
                | Self::UInt8
                | Self::UInt16
                | Self::UInt32
                | Self::UInt64
        )
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Value {
    /// Get the kind tag of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int8(_) => ValueKind::Int8,
            Self::Int16(_) => ValueKind::Int16,
            Self::Int32(_) => ValueKind::Int32,
            Self::Int64(_) => ValueKind::Int64,
            Self::UInt8(_) => ValueKind::UInt8,
            Self::UInt16(_) => ValueKind::UInt16,
            Self::UInt32(_) => ValueKind::UInt32,
            Self::UInt64(_) => ValueKind::UInt64,
            Self::Float32(_) => ValueKind::Float32,
            Self::Float64(_) => ValueKind::Float64,
            Self::String(_) => ValueKind::String,
            Self::Bytes(_) => ValueKind::Bytes,
            Self::Uuid(_) => ValueKind::Uuid,
            Self::DateTime(_) => ValueKind::DateTime,
        }
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Widen any integer variant to `i128`, which holds every width losslessly.
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Self::Int8(i) => Some(i128::from(*i)),
            Self::Int16(i) => Some(i128::from(*i)),
            Self::Int32(i) => Some(i128::from(*i)),
            Self::Int64(i) => Some(i128::from(*i)),
            Self::UInt8(u) => Some(i128::from(*u)),
            Self::UInt16(u) => Some(i128::from(*u)),
            Self::UInt32(u) => Some(i128::from(*u)),
            Self::UInt64(u) => Some(i128::from(*u)),
            _ => None,
        }
    }

    /// Textual representation of values that expose one.
    ///
    /// Only `Uuid` and `DateTime` qualify; numbers and booleans do not
    /// silently become text.
    pub fn display_text(&self) -> Option<String> {
        match self {
            Self::Uuid(u) => Some(u.to_string()),
            Self::DateTime(dt) => Some(dt.to_string()),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as a byte slice.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int32(i)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int64(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float64(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::DateTime(dt)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}

/// Value in the generic shape consumed by result-set materialization.
#[derive(Debug, Clone, PartialEq)]
pub enum DriverValue {
    Null,
    Int64(i64),
    Float64(f64),
    Bool(bool),
    Bytes(Vec<u8>),
    String(String),
    Timestamp(DateTime<Utc>),
}

impl DriverValue {
    /// Check if this driver value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}
