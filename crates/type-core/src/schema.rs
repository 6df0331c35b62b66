//! Columns, schemas and row validation.
//!
//! ## Type Hierarchy
//!
//! **Runtime types** (resolved, used by the engine):
//! - `Column` - named slot with a [`Type`], nullability and default
//! - `Schema` - ordered columns defining a positional row layout
//!
//! **Definition types** (YAML, type names unresolved):
//! - `ColumnDefinition` - column as written in a schema file
//! - `SchemaDefinition` - full schema file, resolved with `to_schema`

use crate::convert::ConversionError;
use crate::types::{self, Type};
use crate::values::{DriverValue, Value, ValueKind};
use crate::wire::WireValue;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

// ============================================================================
// Error Types
// ============================================================================

/// Error returned when a row does not fit a schema.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RowError {
    /// Row has a different number of values than the schema has columns
    #[error("expected {expected} values, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Value is not in the canonical form of its column's type
    #[error("value at {index} has unexpected type: {kind}")]
    UnexpectedType {
        index: usize,
        column: String,
        kind: ValueKind,
    },

    /// NULL given for a column that is not nullable
    #[error("value at {index} is null but column '{column}' is not nullable")]
    NullNotAllowed { index: usize, column: String },

    /// Value could not be converted to its column's type
    #[error("value at {index} (column '{column}'): {source}")]
    Conversion {
        index: usize,
        column: String,
        source: ConversionError,
    },
}

/// Error type for schema definition operations.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Error reading schema file
    #[error("Failed to read schema file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Type name not in the built-in catalog
    #[error("Unknown type '{type_name}' for column '{column}'")]
    UnknownType { column: String, type_name: String },

    /// Two columns share a name
    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    /// Default is not a YAML scalar
    #[error("Unsupported default for column '{column}': expected a scalar")]
    UnsupportedDefault { column: String },

    /// Default does not convert to the column type
    #[error("Invalid default for column '{column}': {source}")]
    InvalidDefault {
        column: String,
        source: ConversionError,
    },
}

// ============================================================================
// Column
// ============================================================================

/// Definition of a table column: a name, a data type, a default and a
/// nullability characteristic.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name
    pub name: String,

    /// Column type
    pub sql_type: &'static dyn Type,

    /// Canonical default value, or `None` if the default is NULL
    default: Option<Value>,

    /// Whether this column accepts NULL
    pub nullable: bool,
}

impl Column {
    /// Create a new non-nullable column without default.
    pub fn new(name: impl Into<String>, sql_type: &'static dyn Type) -> Self {
        Self {
            name: name.into(),
            sql_type,
            default: None,
            nullable: false,
        }
    }

    /// Create a new nullable column without default.
    pub fn nullable(name: impl Into<String>, sql_type: &'static dyn Type) -> Self {
        Self {
            name: name.into(),
            sql_type,
            default: None,
            nullable: true,
        }
    }

    /// Create a column with a default value.
    ///
    /// The default is converted through `sql_type` so the stored value is
    /// always canonical. A `Null` default means "no default".
    pub fn with_default(
        name: impl Into<String>,
        sql_type: &'static dyn Type,
        nullable: bool,
        default: Value,
    ) -> Result<Self, ConversionError> {
        let default = match default {
            Value::Null => None,
            v => Some(sql_type.convert(&v)?),
        };
        Ok(Self {
            name: name.into(),
            sql_type,
            default,
            nullable,
        })
    }

    /// The canonical default, if any.
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Value to use when a row omits this column: the declared default,
    /// NULL for nullable columns, otherwise the type's zero value.
    pub fn default_or_zero(&self) -> Value {
        match &self.default {
            Some(v) => v.clone(),
            None if self.nullable => Value::Null,
            None => self.sql_type.default_value(),
        }
    }

    /// Check a value against this column without converting it.
    pub fn check(&self, value: &Value) -> bool {
        if value.is_null() {
            return self.nullable;
        }
        self.sql_type.check(value)
    }
}

// ============================================================================
// Schema
// ============================================================================

/// Ordered column list. Position `i` of a row belongs to column `i`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Get a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Get the position of a column by name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Get all column names, in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    fn check_len(&self, row: &[Value]) -> Result<(), RowError> {
        if row.len() != self.columns.len() {
            return Err(RowError::LengthMismatch {
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        Ok(())
    }

    /// Validate a row without converting it.
    ///
    /// Fails on a length mismatch or at the first value its column does not
    /// accept.
    pub fn check_row(&self, row: &[Value]) -> Result<(), RowError> {
        self.check_len(row)?;

        for (index, (column, value)) in self.columns.iter().zip(row).enumerate() {
            if column.check(value) {
                continue;
            }

            tracing::trace!(
                index,
                column = %column.name,
                sql_type = column.sql_type.name(),
                "Row value rejected"
            );
            return Err(RowError::UnexpectedType {
                index,
                column: column.name.clone(),
                kind: value.kind(),
            });
        }

        Ok(())
    }

    /// Convert every value of a row to its column's canonical form.
    ///
    /// The result always passes [`check_row`](Schema::check_row).
    pub fn convert_row(&self, row: Vec<Value>) -> Result<Vec<Value>, RowError> {
        self.check_len(&row)?;

        self.columns
            .iter()
            .zip(row)
            .enumerate()
            .map(|(index, (column, value))| {
                if value.is_null() {
                    return if column.nullable {
                        Ok(Value::Null)
                    } else {
                        Err(RowError::NullNotAllowed {
                            index,
                            column: column.name.clone(),
                        })
                    };
                }
                column
                    .sql_type
                    .convert(&value)
                    .map_err(|source| RowError::Conversion {
                        index,
                        column: column.name.clone(),
                        source,
                    })
            })
            .collect()
    }

    /// Order two canonical rows column by column.
    ///
    /// NULLs sort before every other value of a column; a shorter row sorts
    /// first when the shared prefix is equal.
    pub fn compare_rows(&self, a: &[Value], b: &[Value]) -> Ordering {
        for (column, (x, y)) in self.columns.iter().zip(a.iter().zip(b)) {
            let ord = column.sql_type.compare(x, y);
            if ord != Ordering::Equal {
                return ord;
            }
        }
        a.len().cmp(&b.len())
    }

    /// Encode a row for the wire after validating it.
    pub fn sql_row(&self, row: &[Value]) -> Result<Vec<WireValue>, RowError> {
        self.check_row(row)?;

        Ok(self
            .columns
            .iter()
            .zip(row)
            .map(|(column, value)| {
                if value.is_null() {
                    WireValue::NULL
                } else {
                    column.sql_type.sql(value)
                }
            })
            .collect())
    }

    /// Map a row to driver values.
    pub fn native_row(&self, row: &[Value]) -> Result<Vec<DriverValue>, RowError> {
        self.check_len(row)?;

        self.columns
            .iter()
            .zip(row)
            .enumerate()
            .map(|(index, (column, value))| {
                column
                    .sql_type
                    .native(value)
                    .map_err(|source| RowError::Conversion {
                        index,
                        column: column.name.clone(),
                        source,
                    })
            })
            .collect()
    }
}

impl FromIterator<Column> for Schema {
    fn from_iter<I: IntoIterator<Item = Column>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

// ============================================================================
// Definition Types (YAML)
// ============================================================================

/// Column as written in a schema file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColumnDefinition {
    /// Column name
    pub name: String,

    /// Type name, resolved through [`types::resolve`]
    #[serde(rename = "type")]
    pub column_type: String,

    /// Whether this column is nullable
    #[serde(default)]
    pub nullable: bool,

    /// Default value as a YAML scalar
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_yaml::Value>,
}

impl ColumnDefinition {
    /// Resolve into a runtime [`Column`].
    pub fn to_column(&self) -> Result<Column, SchemaError> {
        let sql_type =
            types::resolve(&self.column_type).ok_or_else(|| SchemaError::UnknownType {
                column: self.name.clone(),
                type_name: self.column_type.clone(),
            })?;

        let default = match &self.default {
            None => Value::Null,
            Some(yaml) => yaml_to_value(yaml).ok_or_else(|| SchemaError::UnsupportedDefault {
                column: self.name.clone(),
            })?,
        };

        Column::with_default(self.name.clone(), sql_type, self.nullable, default).map_err(
            |source| SchemaError::InvalidDefault {
                column: self.name.clone(),
                source,
            },
        )
    }
}

fn default_version() -> u32 {
    1
}

/// Full schema file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaDefinition {
    /// Schema version
    #[serde(default = "default_version")]
    pub version: u32,

    /// Column definitions, in row order
    pub columns: Vec<ColumnDefinition>,
}

impl SchemaDefinition {
    /// Load a schema definition from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        tracing::debug!("Loading schema definition from {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a schema definition from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, SchemaError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Resolve every column into a runtime [`Schema`].
    pub fn to_schema(&self) -> Result<Schema, SchemaError> {
        let mut seen = HashSet::new();
        let mut columns = Vec::with_capacity(self.columns.len());

        for def in &self.columns {
            if !seen.insert(def.name.as_str()) {
                return Err(SchemaError::DuplicateColumn(def.name.clone()));
            }
            columns.push(def.to_column()?);
        }

        tracing::debug!(
            version = self.version,
            "Resolved schema with {} columns",
            columns.len()
        );
        Ok(Schema::new(columns))
    }
}

/// Map a YAML scalar onto the closest [`Value`]; `None` for sequences,
/// mappings and tagged values.
fn yaml_to_value(yaml: &serde_yaml::Value) -> Option<Value> {
    match yaml {
        serde_yaml::Value::Null => Some(Value::Null),
        serde_yaml::Value::Bool(b) => Some(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Value::Int64(i))
            } else if let Some(u) = n.as_u64() {
                Some(Value::UInt64(u))
            } else {
                n.as_f64().map(Value::Float64)
            }
        }
        serde_yaml::Value::String(s) => Some(Value::String(s.clone())),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
