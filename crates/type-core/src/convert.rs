//! Conversion and comparison primitives shared by the built-in types.
//!
//! The numeric, text and time rules live here so that each descriptor in
//! [`types`](crate::types) stays a thin mapping onto them.

use crate::values::{Value, ValueKind};
use chrono::{DateTime, NaiveDateTime, Timelike, Utc};
use std::cmp::Ordering;
use std::num::IntErrorKind;

/// Layout accepted when converting text into a timestamp.
pub const TIMESTAMP_LAYOUT: &str = "%Y-%m-%d %H:%M:%S.%6f";

/// Layout used when encoding a timestamp for the wire.
pub const TIMESTAMP_WIRE_LAYOUT: &str = "%Y-%m-%d %H:%M:%S";

/// Error returned when a value cannot be normalized into a type's
/// canonical form.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    /// The value's kind is not an accepted source for the target type
    #[error("invalid type: {kind} can't be converted to {target}")]
    InvalidType {
        target: &'static str,
        kind: ValueKind,
    },

    /// The value is convertible in kind but out of range for the target width
    #[error("value {value} overflows {target} ({bits}-bit)")]
    Overflow {
        value: i128,
        bits: u32,
        target: &'static str,
    },

    /// Text that cannot be parsed into the target's canonical form
    #[error("value {text:?} can't be converted to {target}")]
    Parse { text: String, target: &'static str },
}

impl ConversionError {
    pub(crate) fn invalid(target: &'static str, value: &Value) -> Self {
        Self::InvalidType {
            target,
            kind: value.kind(),
        }
    }
}

/// Integer value extracted from an integer variant or decimal text.
///
/// Text too long for `i128` is an overflow of the target width, reported
/// with the saturated value.
fn integer_source(
    value: &Value,
    bits: u32,
    target: &'static str,
) -> Result<i128, ConversionError> {
    if let Some(i) = value.as_i128() {
        return Ok(i);
    }

    match value {
        Value::String(s) => s.parse::<i128>().map_err(|e| match e.kind() {
            IntErrorKind::PosOverflow => ConversionError::Overflow {
                value: i128::MAX,
                bits,
                target,
            },
            IntErrorKind::NegOverflow => ConversionError::Overflow {
                value: i128::MIN,
                bits,
                target,
            },
            _ => ConversionError::Parse {
                text: s.clone(),
                target,
            },
        }),
        other => Err(ConversionError::invalid(target, other)),
    }
}

pub fn convert_to_i32(value: &Value, target: &'static str) -> Result<i32, ConversionError> {
    if let Value::Int32(i) = value {
        return Ok(*i);
    }

    let wide = integer_source(value, 32, target)?;
    i32::try_from(wide).map_err(|_| ConversionError::Overflow {
        value: wide,
        bits: 32,
        target,
    })
}

pub fn convert_to_i64(value: &Value, target: &'static str) -> Result<i64, ConversionError> {
    if let Value::Int64(i) = value {
        return Ok(*i);
    }

    let wide = integer_source(value, 64, target)?;
    i64::try_from(wide).map_err(|_| ConversionError::Overflow {
        value: wide,
        bits: 64,
        target,
    })
}

/// Float conversion. `f32` widens to `f64` without loss; integers and text
/// are not accepted.
pub fn convert_to_f64(value: &Value, target: &'static str) -> Result<f64, ConversionError> {
    match value {
        Value::Float64(f) => Ok(*f),
        Value::Float32(f) => Ok(f64::from(*f)),
        other => Err(ConversionError::invalid(target, other)),
    }
}

pub fn convert_to_string(value: &Value, target: &'static str) -> Result<String, ConversionError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => other
            .display_text()
            .ok_or_else(|| ConversionError::invalid(target, other)),
    }
}

pub fn convert_to_bytes(value: &Value, target: &'static str) -> Result<Vec<u8>, ConversionError> {
    match value {
        Value::Bytes(b) => Ok(b.clone()),
        Value::String(s) => Ok(s.as_bytes().to_vec()),
        other => other
            .display_text()
            .map(String::into_bytes)
            .ok_or_else(|| ConversionError::invalid(target, other)),
    }
}

pub fn convert_to_bool(value: &Value, target: &'static str) -> Result<bool, ConversionError> {
    match value {
        Value::Bool(b) => Ok(*b),
        other => Err(ConversionError::invalid(target, other)),
    }
}

/// Parse text in [`TIMESTAMP_LAYOUT`] as a UTC timestamp.
///
/// The year must be exactly four unsigned digits and the seconds field
/// must be below 60.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let bytes = text.as_bytes();
    if bytes.len() < 5 || !bytes[..4].iter().all(u8::is_ascii_digit) || bytes[4] != b'-' {
        return None;
    }

    let naive = NaiveDateTime::parse_from_str(text, TIMESTAMP_LAYOUT).ok()?;
    // chrono keeps a leap second as a nanosecond count past one second.
    if naive.nanosecond() >= 1_000_000_000 {
        return None;
    }
    Some(naive.and_utc())
}

/// Timestamp conversion.
///
/// Integers are read as Unix epoch seconds after going through the 64-bit
/// integer rules; a value those rules reject is an invalid type rather than
/// an overflow.
pub fn convert_to_timestamp(
    value: &Value,
    target: &'static str,
) -> Result<DateTime<Utc>, ConversionError> {
    match value {
        Value::DateTime(dt) => Ok(*dt),
        Value::String(s) => parse_timestamp(s).ok_or_else(|| ConversionError::Parse {
            text: s.clone(),
            target,
        }),
        other if other.kind().is_integer() => {
            let secs = convert_to_i64(other, target)
                .map_err(|_| ConversionError::invalid(target, other))?;
            DateTime::from_timestamp(secs, 0).ok_or(ConversionError::Overflow {
                value: i128::from(secs),
                bits: 64,
                target,
            })
        }
        other => Err(ConversionError::invalid(target, other)),
    }
}

/// Compare two values of the same canonical kind.
///
/// Operands of differing kinds are ordered by [`ValueKind`] so the result
/// stays deterministic; callers are expected to convert first.
///
/// Floats use the IEEE 754 total order: `-0.0` sorts before `0.0` and NaN
/// sorts after every number.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Int32(a), Value::Int32(b)) => a.cmp(b),
        (Value::Int64(a), Value::Int64(b)) => a.cmp(b),
        (Value::Float64(a), Value::Float64(b)) => a.total_cmp(b),
        (Value::String(a), Value::String(b)) => a.as_bytes().cmp(b.as_bytes()),
        (Value::Bytes(a), Value::Bytes(b)) => a.cmp(b),
        (Value::DateTime(a), Value::DateTime(b)) => a.cmp(b),
        (Value::Float32(a), Value::Float32(b)) => a.total_cmp(b),
        (Value::Uuid(a), Value::Uuid(b)) => a.cmp(b),
        (a, b) => match (a.as_i128(), b.as_i128()) {
            (Some(x), Some(y)) if a.kind() == b.kind() => x.cmp(&y),
            _ => a.kind().cmp(&b.kind()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_i32_from_every_width() {
        let sources = [
            Value::Int8(42),
            Value::Int16(42),
            Value::Int32(42),
            Value::Int64(42),
            Value::UInt8(42),
            Value::UInt16(42),
            Value::UInt32(42),
            Value::UInt64(42),
            Value::from("42"),
        ];
        for v in sources {
            assert_eq!(convert_to_i32(&v, "integer"), Ok(42), "source {v:?}");
        }
    }

    #[test]
    fn test_i32_bounds() {
        assert_eq!(
            convert_to_i32(&Value::Int64(i64::from(i32::MAX)), "integer"),
            Ok(i32::MAX)
        );
        assert_eq!(
            convert_to_i32(&Value::Int64(i64::from(i32::MIN)), "integer"),
            Ok(i32::MIN)
        );
        assert_eq!(
            convert_to_i32(&Value::Int64(2_147_483_648), "integer"),
            Err(ConversionError::Overflow {
                value: 2_147_483_648,
                bits: 32,
                target: "integer"
            })
        );
        assert!(matches!(
            convert_to_i32(&Value::Int64(-2_147_483_649), "integer"),
            Err(ConversionError::Overflow { .. })
        ));
        assert!(matches!(
            convert_to_i32(&Value::UInt32(1 << 31), "integer"),
            Err(ConversionError::Overflow { .. })
        ));
        // Text is range checked as well instead of wrapping.
        assert!(matches!(
            convert_to_i32(&Value::from("4294967296"), "integer"),
            Err(ConversionError::Overflow { .. })
        ));
    }

    #[test]
    fn test_i64_bounds() {
        assert_eq!(
            convert_to_i64(&Value::UInt64(i64::MAX as u64), "biginteger"),
            Ok(i64::MAX)
        );
        assert_eq!(
            convert_to_i64(&Value::UInt64(9_223_372_036_854_775_808), "biginteger"),
            Err(ConversionError::Overflow {
                value: 9_223_372_036_854_775_808,
                bits: 64,
                target: "biginteger"
            })
        );
        assert_eq!(convert_to_i64(&Value::from("-17"), "biginteger"), Ok(-17));
        assert_eq!(convert_to_i64(&Value::from("+17"), "biginteger"), Ok(17));
    }

    #[test]
    fn test_integer_text_beyond_i128() {
        assert_eq!(
            convert_to_i64(
                &Value::from("170141183460469231731687303715884105728"),
                "biginteger"
            ),
            Err(ConversionError::Overflow {
                value: i128::MAX,
                bits: 64,
                target: "biginteger"
            })
        );
        assert_eq!(
            convert_to_i32(
                &Value::from("-170141183460469231731687303715884105729"),
                "integer"
            ),
            Err(ConversionError::Overflow {
                value: i128::MIN,
                bits: 32,
                target: "integer"
            })
        );
    }

    #[test]
    fn test_integer_text_parse_errors() {
        for text in ["", "abc", "1.5", " 1", "1e3"] {
            assert_eq!(
                convert_to_i64(&Value::from(text), "biginteger"),
                Err(ConversionError::Parse {
                    text: text.to_string(),
                    target: "biginteger"
                })
            );
        }
        assert!(matches!(
            convert_to_i32(&Value::Float64(1.0), "integer"),
            Err(ConversionError::InvalidType {
                kind: ValueKind::Float64,
                ..
            })
        ));
    }

    #[test]
    fn test_text_and_bytes_sources() {
        let id = uuid::Uuid::nil();
        assert_eq!(
            convert_to_string(&Value::Uuid(id), "string"),
            Ok(id.to_string())
        );
        assert!(convert_to_string(&Value::Int32(1), "string").is_err());
        assert!(convert_to_string(&Value::Bytes(b"x".to_vec()), "string").is_err());

        assert_eq!(
            convert_to_bytes(&Value::from("abc"), "blob"),
            Ok(b"abc".to_vec())
        );
        assert_eq!(
            convert_to_bytes(&Value::Uuid(id), "blob"),
            Ok(id.to_string().into_bytes())
        );
        assert!(convert_to_bytes(&Value::Bool(true), "blob").is_err());
    }

    #[test]
    fn test_timestamp_sources() {
        let expected = Utc.with_ymd_and_hms(2023, 1, 2, 15, 4, 5).unwrap();
        assert_eq!(
            convert_to_timestamp(&Value::from("2023-01-02 15:04:05.000000"), "timestamp"),
            Ok(expected)
        );
        assert_eq!(
            convert_to_timestamp(&Value::Int64(expected.timestamp()), "timestamp"),
            Ok(expected)
        );
        assert_eq!(
            convert_to_timestamp(&Value::UInt32(0), "timestamp"),
            Ok(DateTime::UNIX_EPOCH)
        );

        let with_micros = parse_timestamp("2023-01-02 15:04:05.123456").unwrap();
        assert_eq!(with_micros.timestamp_subsec_micros(), 123_456);
    }

    #[test]
    fn test_timestamp_rejects() {
        for text in [
            "2023-01-02 15:04:05",
            "2023-01-02T15:04:05.000000",
            "2023-13-02 15:04:05.000000",
            "2023-01-02 15:04:05.000",
            "2023-01-02 15:04:60.000000",
            "2023-06-30 23:59:60.000000",
            "+12023-01-02 15:04:05.000000",
            "12023-01-02 15:04:05.000000",
            "-2023-01-02 15:04:05.000000",
            "923-01-02 15:04:05.000000",
            "not a date",
        ] {
            assert!(
                matches!(
                    convert_to_timestamp(&Value::from(text), "timestamp"),
                    Err(ConversionError::Parse { .. })
                ),
                "{text} should not parse"
            );
        }
        assert!(matches!(
            convert_to_timestamp(&Value::UInt64(u64::MAX), "timestamp"),
            Err(ConversionError::InvalidType { .. })
        ));
        assert!(matches!(
            convert_to_timestamp(&Value::Int64(i64::MAX), "timestamp"),
            Err(ConversionError::Overflow { .. })
        ));
        assert!(matches!(
            convert_to_timestamp(&Value::Float64(0.0), "timestamp"),
            Err(ConversionError::InvalidType { .. })
        ));
    }

    #[test]
    fn test_compare_values() {
        assert_eq!(
            compare_values(&Value::Null, &Value::Null),
            Ordering::Equal
        );
        assert_eq!(
            compare_values(&Value::from("a"), &Value::from("b")),
            Ordering::Less
        );
        assert_eq!(
            compare_values(&Value::Bytes(vec![2]), &Value::Bytes(vec![1, 9])),
            Ordering::Greater
        );
        assert_eq!(
            compare_values(&Value::Float64(f64::NAN), &Value::Float64(f64::NAN)),
            Ordering::Equal
        );
        assert_eq!(
            compare_values(&Value::Float64(-0.0), &Value::Float64(0.0)),
            Ordering::Less
        );
        assert_eq!(
            compare_values(&Value::Float64(f64::NAN), &Value::Float64(f64::INFINITY)),
            Ordering::Greater
        );
        // Mixed kinds fall back to kind order.
        assert_eq!(
            compare_values(&Value::Int32(100), &Value::Int64(1)),
            Ordering::Less
        );
    }
}
