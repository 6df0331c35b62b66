//! Query Types Library
//!
//! The column type system of the query engine: validation, conversion,
//! ordering and wire encoding of column values.
//!
//! # Features
//!
//! - Closed catalog: null, integer, biginteger, float, string, boolean,
//!   blob and timestamp with timezone
//! - Row validation: positional schemas with nullability and defaults
//! - Overflow-checked numeric conversion
//! - Wire and driver encodings for the transport and result layers
//! - Schema definitions loaded from YAML

pub use type_core::*;
