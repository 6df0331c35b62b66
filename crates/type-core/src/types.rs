//! Built-in column types.
//!
//! This module defines the [`Type`] trait and the fixed catalog of eight
//! descriptors implementing it. Descriptors are zero-sized and stateless;
//! each is exposed as a `static` and through the [`all`] / [`by_name`]
//! registry.
//!
//! # Canonical forms
//!
//! | Type | Canonical [`Value`] | Wire tag |
//! |---|---|---|
//! | [`NULL`] | `Null` | `NULL_TYPE` |
//! | [`INTEGER`] | `Int32` | `INT32` |
//! | [`BIG_INTEGER`] | `Int64` | `INT64` |
//! | [`FLOAT`] | `Float64` | `FLOAT64` |
//! | [`STRING`] | `String` | `TEXT` |
//! | [`BOOLEAN`] | `Bool` | `BIT` |
//! | [`BLOB`] | `Bytes` | `BLOB` |
//! | [`TIMESTAMP_WITH_TIMEZONE`] | `DateTime` | `TIMESTAMP` |

use crate::convert::{self, ConversionError, TIMESTAMP_WIRE_LAYOUT};
use crate::values::{DriverValue, Value, ValueKind};
use crate::wire::{WireType, WireValue};
use chrono::DateTime;
use std::cmp::Ordering;
use std::fmt;

/// Capability set shared by every built-in type.
///
/// Consumers hold `&'static dyn Type` and never depend on a concrete
/// descriptor.
pub trait Type: Send + Sync + fmt::Debug {
    /// Stable human-readable identifier.
    fn name(&self) -> &'static str;

    /// Kind of the canonical representation.
    fn internal_type(&self) -> ValueKind;

    /// True iff `value` is already in canonical form. Never converts.
    fn check(&self, value: &Value) -> bool {
        value.kind() == self.internal_type()
    }

    /// Normalize `value` into canonical form.
    ///
    /// Idempotent: a value accepted by [`check`](Type::check) is returned
    /// unchanged.
    fn convert(&self, value: &Value) -> Result<Value, ConversionError>;

    /// Order two canonical values of this type.
    ///
    /// Non-canonical operands get a deterministic but meaningless order;
    /// convert first.
    fn compare(&self, a: &Value, b: &Value) -> Ordering {
        convert::compare_values(a, b)
    }

    /// Map a value to the generic driver shape. `Null` maps to
    /// [`DriverValue::Null`] for every type.
    fn native(&self, value: &Value) -> Result<DriverValue, ConversionError>;

    /// Zero value of this type.
    fn default_value(&self) -> Value;

    /// Protocol-level type tag.
    fn wire_type(&self) -> WireType;

    /// Encode a value for the wire.
    ///
    /// The value must have been validated upstream; an unconvertible value
    /// panics through [`must_convert`].
    fn sql(&self, value: &Value) -> WireValue;
}

impl fmt::Display for dyn Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl PartialEq for dyn Type {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

/// Convert `value`, panicking on failure.
///
/// Only for call sites where the value was already validated with
/// [`Type::check`] or a schema row check; reaching the panic means an
/// invalid value slipped past validation.
pub fn must_convert(ty: &dyn Type, value: &Value) -> Value {
    match ty.convert(value) {
        Ok(v) => v,
        Err(e) => {
            tracing::error!(
                sql_type = ty.name(),
                kind = %value.kind(),
                "Unvalidated value reached serialization: {e}"
            );
            panic!("internal invariant violated: {e}");
        }
    }
}

// ============================================================================
// Null
// ============================================================================

/// The type of the NULL literal.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullType;

pub static NULL: NullType = NullType;

impl Type for NullType {
    fn name(&self) -> &'static str {
        "null"
    }

    fn internal_type(&self) -> ValueKind {
        ValueKind::Null
    }

    fn convert(&self, value: &Value) -> Result<Value, ConversionError> {
        match value {
            Value::Null => Ok(Value::Null),
            other => Err(ConversionError::invalid(self.name(), other)),
        }
    }

    /// Always `Equal`. This gives NULL a sort position only; in SQL
    /// predicates NULL is never equal to NULL, so this must not answer
    /// equality.
    fn compare(&self, _a: &Value, _b: &Value) -> Ordering {
        Ordering::Equal
    }

    fn native(&self, _value: &Value) -> Result<DriverValue, ConversionError> {
        Ok(DriverValue::Null)
    }

    fn default_value(&self) -> Value {
        Value::Null
    }

    fn wire_type(&self) -> WireType {
        WireType::Null
    }

    fn sql(&self, _value: &Value) -> WireValue {
        WireValue::NULL
    }
}

// ============================================================================
// Integer types
// ============================================================================

/// 32-bit signed integer.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerType;

pub static INTEGER: IntegerType = IntegerType;

impl Type for IntegerType {
    fn name(&self) -> &'static str {
        "integer"
    }

    fn internal_type(&self) -> ValueKind {
        ValueKind::Int32
    }

    fn convert(&self, value: &Value) -> Result<Value, ConversionError> {
        convert::convert_to_i32(value, self.name()).map(Value::Int32)
    }

    fn native(&self, value: &Value) -> Result<DriverValue, ConversionError> {
        if value.is_null() {
            return Ok(DriverValue::Null);
        }
        let i = convert::convert_to_i32(value, self.name())?;
        Ok(DriverValue::Int64(i64::from(i)))
    }

    fn default_value(&self) -> Value {
        Value::Int32(0)
    }

    fn wire_type(&self) -> WireType {
        WireType::Int32
    }

    fn sql(&self, value: &Value) -> WireValue {
        match must_convert(self, value) {
            Value::Int32(i) => WireValue::int32(i),
            other => unreachable!("integer conversion produced {:?}", other.kind()),
        }
    }
}

/// 64-bit signed integer.
#[derive(Debug, Clone, Copy, Default)]
pub struct BigIntegerType;

pub static BIG_INTEGER: BigIntegerType = BigIntegerType;

impl Type for BigIntegerType {
    fn name(&self) -> &'static str {
        "biginteger"
    }

    fn internal_type(&self) -> ValueKind {
        ValueKind::Int64
    }

    fn convert(&self, value: &Value) -> Result<Value, ConversionError> {
        convert::convert_to_i64(value, self.name()).map(Value::Int64)
    }

    fn native(&self, value: &Value) -> Result<DriverValue, ConversionError> {
        if value.is_null() {
            return Ok(DriverValue::Null);
        }
        convert::convert_to_i64(value, self.name()).map(DriverValue::Int64)
    }

    fn default_value(&self) -> Value {
        Value::Int64(0)
    }

    fn wire_type(&self) -> WireType {
        WireType::Int64
    }

    fn sql(&self, value: &Value) -> WireValue {
        match must_convert(self, value) {
            Value::Int64(i) => WireValue::int64(i),
            other => unreachable!("biginteger conversion produced {:?}", other.kind()),
        }
    }
}

// ============================================================================
// Float
// ============================================================================

/// 64-bit floating point.
///
/// The canonical form is `f64`; `check` rejects `Float32`, while `convert`
/// widens it.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatType;

pub static FLOAT: FloatType = FloatType;

impl Type for FloatType {
    fn name(&self) -> &'static str {
        "float"
    }

    fn internal_type(&self) -> ValueKind {
        ValueKind::Float64
    }

    fn convert(&self, value: &Value) -> Result<Value, ConversionError> {
        convert::convert_to_f64(value, self.name()).map(Value::Float64)
    }

    fn native(&self, value: &Value) -> Result<DriverValue, ConversionError> {
        if value.is_null() {
            return Ok(DriverValue::Null);
        }
        convert::convert_to_f64(value, self.name()).map(DriverValue::Float64)
    }

    fn default_value(&self) -> Value {
        Value::Float64(0.0)
    }

    fn wire_type(&self) -> WireType {
        WireType::Float64
    }

    fn sql(&self, value: &Value) -> WireValue {
        match must_convert(self, value) {
            Value::Float64(f) => WireValue::float64(f),
            other => unreachable!("float conversion produced {:?}", other.kind()),
        }
    }
}

// ============================================================================
// String and binary types
// ============================================================================

/// UTF-8 text.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringType;

pub static STRING: StringType = StringType;

impl Type for StringType {
    fn name(&self) -> &'static str {
        "string"
    }

    fn internal_type(&self) -> ValueKind {
        ValueKind::String
    }

    fn convert(&self, value: &Value) -> Result<Value, ConversionError> {
        convert::convert_to_string(value, self.name()).map(Value::String)
    }

    fn native(&self, value: &Value) -> Result<DriverValue, ConversionError> {
        if value.is_null() {
            return Ok(DriverValue::Null);
        }
        convert::convert_to_string(value, self.name()).map(DriverValue::String)
    }

    fn default_value(&self) -> Value {
        Value::String(String::new())
    }

    fn wire_type(&self) -> WireType {
        WireType::Text
    }

    fn sql(&self, value: &Value) -> WireValue {
        match must_convert(self, value) {
            Value::String(s) => WireValue::trusted(WireType::Text, s.into_bytes()),
            other => unreachable!("string conversion produced {:?}", other.kind()),
        }
    }
}

/// Raw byte sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlobType;

pub static BLOB: BlobType = BlobType;

impl Type for BlobType {
    fn name(&self) -> &'static str {
        "blob"
    }

    fn internal_type(&self) -> ValueKind {
        ValueKind::Bytes
    }

    fn convert(&self, value: &Value) -> Result<Value, ConversionError> {
        convert::convert_to_bytes(value, self.name()).map(Value::Bytes)
    }

    fn native(&self, value: &Value) -> Result<DriverValue, ConversionError> {
        if value.is_null() {
            return Ok(DriverValue::Null);
        }
        convert::convert_to_bytes(value, self.name()).map(DriverValue::Bytes)
    }

    fn default_value(&self) -> Value {
        Value::Bytes(Vec::new())
    }

    fn wire_type(&self) -> WireType {
        WireType::Blob
    }

    fn sql(&self, value: &Value) -> WireValue {
        match must_convert(self, value) {
            Value::Bytes(b) => WireValue::trusted(WireType::Blob, b),
            other => unreachable!("blob conversion produced {:?}", other.kind()),
        }
    }
}

// ============================================================================
// Boolean
// ============================================================================

/// Boolean, ordered `false < true`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanType;

pub static BOOLEAN: BooleanType = BooleanType;

impl Type for BooleanType {
    fn name(&self) -> &'static str {
        "boolean"
    }

    fn internal_type(&self) -> ValueKind {
        ValueKind::Bool
    }

    fn convert(&self, value: &Value) -> Result<Value, ConversionError> {
        convert::convert_to_bool(value, self.name()).map(Value::Bool)
    }

    fn native(&self, value: &Value) -> Result<DriverValue, ConversionError> {
        if value.is_null() {
            return Ok(DriverValue::Null);
        }
        convert::convert_to_bool(value, self.name()).map(DriverValue::Bool)
    }

    fn default_value(&self) -> Value {
        Value::Bool(false)
    }

    fn wire_type(&self) -> WireType {
        WireType::Bit
    }

    fn sql(&self, value: &Value) -> WireValue {
        let bit = match must_convert(self, value) {
            Value::Bool(true) => b'1',
            Value::Bool(false) => b'0',
            other => unreachable!("boolean conversion produced {:?}", other.kind()),
        };
        WireValue::trusted(WireType::Bit, vec![bit])
    }
}

// ============================================================================
// Timestamp
// ============================================================================

/// Timestamp with timezone, stored as UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampWithTimezoneType;

pub static TIMESTAMP_WITH_TIMEZONE: TimestampWithTimezoneType = TimestampWithTimezoneType;

impl Type for TimestampWithTimezoneType {
    fn name(&self) -> &'static str {
        "timestamp with timezone"
    }

    fn internal_type(&self) -> ValueKind {
        ValueKind::DateTime
    }

    fn convert(&self, value: &Value) -> Result<Value, ConversionError> {
        convert::convert_to_timestamp(value, self.name()).map(Value::DateTime)
    }

    fn native(&self, value: &Value) -> Result<DriverValue, ConversionError> {
        if value.is_null() {
            return Ok(DriverValue::Null);
        }
        convert::convert_to_timestamp(value, self.name()).map(DriverValue::Timestamp)
    }

    fn default_value(&self) -> Value {
        Value::DateTime(DateTime::UNIX_EPOCH)
    }

    fn wire_type(&self) -> WireType {
        WireType::Timestamp
    }

    /// Seconds precision, no fraction and no zone suffix.
    fn sql(&self, value: &Value) -> WireValue {
        match must_convert(self, value) {
            Value::DateTime(dt) => WireValue::trusted(
                WireType::Timestamp,
                dt.format(TIMESTAMP_WIRE_LAYOUT).to_string().into_bytes(),
            ),
            other => unreachable!("timestamp conversion produced {:?}", other.kind()),
        }
    }
}

// ============================================================================
// Registry
// ============================================================================

static REGISTRY: [&dyn Type; 8] = [
    &NULL,
    &INTEGER,
    &BIG_INTEGER,
    &FLOAT,
    &STRING,
    &BOOLEAN,
    &BLOB,
    &TIMESTAMP_WITH_TIMEZONE,
];

/// Every built-in type, in declaration order.
pub fn all() -> &'static [&'static dyn Type] {
    &REGISTRY
}

/// Look up a built-in type by its [`Type::name`].
pub fn by_name(name: &str) -> Option<&'static dyn Type> {
    REGISTRY.iter().copied().find(|t| t.name() == name)
}

/// Resolve a type name as written in schema files.
///
/// Accepts the canonical names plus common SQL spellings, case-insensitive.
pub fn resolve(name: &str) -> Option<&'static dyn Type> {
    let lower = name.trim().to_ascii_lowercase();
    match lower.as_str() {
        "int" | "int32" => Some(&INTEGER),
        "bigint" | "big_int" | "int64" => Some(&BIG_INTEGER),
        "double" | "float64" => Some(&FLOAT),
        "text" | "varchar" => Some(&STRING),
        "bool" => Some(&BOOLEAN),
        "bytes" => Some(&BLOB),
        "timestamp" | "timestamptz" | "timestamp_tz" => Some(&TIMESTAMP_WITH_TIMEZONE),
        other => by_name(other),
    }
}
