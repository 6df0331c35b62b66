//! Core column types for the query engine.
//!
//! This crate provides the closed type system every other engine layer
//! depends on:
//!
//! - [`Type`] - capability set shared by the eight built-in types
//! - [`Value`] - every value kind the engine may hand to a type
//! - [`Column`] / [`Schema`] - row shapes and row validation
//! - [`WireValue`] / [`DriverValue`] - wire and driver encodings
//! - [`SchemaDefinition`] - schema files loaded from YAML
//!
//! # Example
//!
//! ```rust
//! use type_core::types::{BIG_INTEGER, STRING};
//! use type_core::{Column, Schema, Type, Value};
//!
//! let schema = Schema::new(vec![
//!     Column::new("id", &BIG_INTEGER),
//!     Column::nullable("name", &STRING),
//! ]);
//!
//! // Incoming values are converted to canonical form first...
//! let row = schema
//!     .convert_row(vec![Value::UInt32(7), Value::from("alice")])
//!     .unwrap();
//! assert!(schema.check_row(&row).is_ok());
//!
//! // ...then encoded for the wire.
//! assert_eq!(BIG_INTEGER.sql(&row[0]).raw(), Some(&b"7"[..]));
//! ```

pub mod convert;
pub mod schema;
pub mod types;
pub mod values;
pub mod wire;

// Re-exports for convenience
pub use convert::ConversionError;
pub use schema::{Column, ColumnDefinition, RowError, Schema, SchemaDefinition, SchemaError};
pub use types::{must_convert, Type};
pub use values::{DriverValue, Value, ValueKind};
pub use wire::{WireType, WireValue};

/// A row of values, positionally aligned with a [`Schema`].
pub type Row = Vec<Value>;
