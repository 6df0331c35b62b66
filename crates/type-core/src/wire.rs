//! Wire-protocol tags and encoded values.
//!
//! The transport itself lives outside this crate; these types only carry
//! the encoding contract it consumes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Protocol-level type tag of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireType {
    Null,
    Int32,
    Int64,
    Float64,
    Timestamp,
    Text,
    Blob,
    Bit,
}

impl WireType {
    /// Numeric code of this tag in the MySQL-compatible query protocol.
    pub fn code(&self) -> u16 {
        match self {
            Self::Null => 0,
            Self::Int32 => 263,
            Self::Int64 => 265,
            Self::Float64 => 1036,
            Self::Timestamp => 2061,
            Self::Text => 6163,
            Self::Blob => 10260,
            Self::Bit => 2073,
        }
    }

    /// Look up a tag by its protocol code.
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            0 => Some(Self::Null),
            263 => Some(Self::Int32),
            265 => Some(Self::Int64),
            1036 => Some(Self::Float64),
            2061 => Some(Self::Timestamp),
            6163 => Some(Self::Text),
            10260 => Some(Self::Blob),
            2073 => Some(Self::Bit),
            _ => None,
        }
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Null => "NULL_TYPE",
            Self::Int32 => "INT32",
            Self::Int64 => "INT64",
            Self::Float64 => "FLOAT64",
            Self::Timestamp => "TIMESTAMP",
            Self::Text => "TEXT",
            Self::Blob => "BLOB",
            Self::Bit => "BIT",
        };
        f.write_str(name)
    }
}

/// Encoded value ready for the transport layer.
///
/// `bytes` is `None` only for the protocol NULL sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireValue {
    wire_type: WireType,
    bytes: Option<Vec<u8>>,
}

impl WireValue {
    /// The protocol NULL sentinel.
    pub const NULL: WireValue = WireValue {
        wire_type: WireType::Null,
        bytes: None,
    };

    /// Wrap bytes that are already encoded for `wire_type`.
    pub fn trusted(wire_type: WireType, bytes: Vec<u8>) -> Self {
        Self {
            wire_type,
            bytes: Some(bytes),
        }
    }

    pub fn int32(v: i32) -> Self {
        Self::trusted(WireType::Int32, v.to_string().into_bytes())
    }

    pub fn int64(v: i64) -> Self {
        Self::trusted(WireType::Int64, v.to_string().into_bytes())
    }

    pub fn float64(v: f64) -> Self {
        Self::trusted(WireType::Float64, v.to_string().into_bytes())
    }

    pub fn wire_type(&self) -> WireType {
        self.wire_type
    }

    pub fn is_null(&self) -> bool {
        self.bytes.is_none()
    }

    /// Encoded bytes, or `None` for NULL.
    pub fn raw(&self) -> Option<&[u8]> {
        self.bytes.as_deref()
    }

    pub fn into_bytes(self) -> Option<Vec<u8>> {
        self.bytes
    }
}
