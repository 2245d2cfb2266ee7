//! Record-shape descriptors and the mapping contract for persistable types.
//!
//! # Responsibility
//! - Define the semantic value model shared by all record shapes.
//! - Declare the `Record` capability trait the repository is generic over.
//!
//! # Invariants
//! - `RecordShape::fields` is in declaration order and never lists the
//!   identity field.
//! - `pk == UNSET_PK` marks a transient record; any other value is a
//!   store-assigned identity.
//! - Logical field order is declared fields first, identity last.

use chrono::NaiveDateTime;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Name of the identity field shared by every record shape.
pub const PK_FIELD: &str = "pk";

/// Sentinel identity value for records not yet persisted.
pub const UNSET_PK: i64 = 0;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";
const TIMESTAMP_PARSE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Semantic type of one record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Int,
    Float,
    Text,
    Timestamp,
}

impl ValueKind {
    /// SQLite column type this semantic type is stored as.
    ///
    /// Only integers get a native column; everything else is TEXT to keep
    /// the storage format of the original database files.
    pub fn column_type(self) -> &'static str {
        match self {
            Self::Int => "INTEGER",
            Self::Float | Self::Text | Self::Timestamp => "TEXT",
        }
    }
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Int => "integer",
            Self::Float => "float",
            Self::Text => "text",
            Self::Timestamp => "timestamp",
        };
        f.write_str(name)
    }
}

/// One field value in its native semantic type.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
    Timestamp(NaiveDateTime),
}

impl Value {
    /// Semantic type of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Text(_) => ValueKind::Text,
            Self::Timestamp(_) => ValueKind::Timestamp,
        }
    }

    /// Converts to the stored SQLite representation.
    ///
    /// Floats and timestamps are rendered as text; Rust's `f64` formatting
    /// is shortest-round-trip, so `parse_stored` recovers the exact value.
    pub fn to_stored(&self) -> rusqlite::types::Value {
        match self {
            Self::Int(value) => rusqlite::types::Value::Integer(*value),
            Self::Float(value) => rusqlite::types::Value::Text(value.to_string()),
            Self::Text(value) => rusqlite::types::Value::Text(value.clone()),
            Self::Timestamp(value) => {
                rusqlite::types::Value::Text(value.format(TIMESTAMP_FORMAT).to_string())
            }
        }
    }

    /// Decodes a stored text representation back into a native value.
    ///
    /// Integers never take this path; they are read from INTEGER columns
    /// directly.
    pub fn parse_stored(kind: ValueKind, stored: &str) -> Result<Self, String> {
        match kind {
            ValueKind::Int => stored
                .parse::<i64>()
                .map(Self::Int)
                .map_err(|err| format!("invalid stored integer `{stored}`: {err}")),
            ValueKind::Float => stored
                .parse::<f64>()
                .map(Self::Float)
                .map_err(|err| format!("invalid stored float `{stored}`: {err}")),
            ValueKind::Text => Ok(Self::Text(stored.to_string())),
            ValueKind::Timestamp => {
                NaiveDateTime::parse_from_str(stored, TIMESTAMP_PARSE_FORMAT)
                    .map(Self::Timestamp)
                    .map_err(|err| format!("invalid stored timestamp `{stored}`: {err}"))
            }
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Self::Timestamp(value)
    }
}

/// Descriptor for one non-identity field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: ValueKind,
}

/// Statically declared descriptor table for one record shape.
///
/// Replaces runtime attribute reflection: each shape declares its fields
/// once, in declaration order, and the repository derives table name,
/// column list and column types from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordShape {
    /// Shape name; the table name is this, case-folded.
    pub name: &'static str,
    /// Non-identity fields in declaration order.
    pub fields: &'static [FieldSpec],
}

impl RecordShape {
    /// Position of a declared field, or `None` for unknown names.
    pub fn index_of(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|spec| spec.name == field)
    }

    /// Whether `field` is declared by this shape or is the identity field.
    pub fn has_field(&self, field: &str) -> bool {
        field == PK_FIELD || self.index_of(field).is_some()
    }
}

/// Error constructing a record from a row's field values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordDecodeError {
    Arity { expected: usize, actual: usize },
    FieldType {
        field: &'static str,
        expected: ValueKind,
        actual: ValueKind,
    },
}

impl Display for RecordDecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Arity { expected, actual } => {
                write!(f, "expected {expected} field values, got {actual}")
            }
            Self::FieldType {
                field,
                expected,
                actual,
            } => write!(f, "field `{field}` expected {expected} value, got {actual}"),
        }
    }
}

impl Error for RecordDecodeError {}

/// Capability contract for types the repository can persist.
///
/// Implementors declare their shape statically and map between struct
/// fields and declaration-order `Value`s. The identity field is handled
/// separately so the repository can transpose between physical column
/// order (identity first) and logical field order (identity last).
pub trait Record: Sized {
    /// Static shape descriptor for this type.
    fn shape() -> &'static RecordShape;

    /// Current identity, `UNSET_PK` while transient.
    fn pk(&self) -> i64;

    /// Binds a store-assigned identity. Called only by the repository.
    fn set_pk(&mut self, pk: i64);

    /// Non-identity field values in declaration order.
    fn values(&self) -> Vec<Value>;

    /// Record factory: rebuilds an instance from declaration-order values
    /// plus the identity read from storage.
    fn from_values(values: &[Value], pk: i64) -> Result<Self, RecordDecodeError>;
}

/// Sequential typed extractor over declaration-order field values.
///
/// Keeps `from_values` implementations flat: one `next_*` call per
/// declared field, then `finish` to assert arity.
pub struct ValueReader<'a> {
    values: &'a [Value],
    index: usize,
}

impl<'a> ValueReader<'a> {
    pub fn new(values: &'a [Value]) -> Self {
        Self { values, index: 0 }
    }

    pub fn next_int(&mut self, field: &'static str) -> Result<i64, RecordDecodeError> {
        match self.next(field, ValueKind::Int)? {
            Value::Int(value) => Ok(*value),
            _ => unreachable!("kind checked by next()"),
        }
    }

    pub fn next_float(&mut self, field: &'static str) -> Result<f64, RecordDecodeError> {
        match self.next(field, ValueKind::Float)? {
            Value::Float(value) => Ok(*value),
            _ => unreachable!("kind checked by next()"),
        }
    }

    pub fn next_text(&mut self, field: &'static str) -> Result<String, RecordDecodeError> {
        match self.next(field, ValueKind::Text)? {
            Value::Text(value) => Ok(value.clone()),
            _ => unreachable!("kind checked by next()"),
        }
    }

    pub fn next_timestamp(
        &mut self,
        field: &'static str,
    ) -> Result<NaiveDateTime, RecordDecodeError> {
        match self.next(field, ValueKind::Timestamp)? {
            Value::Timestamp(value) => Ok(*value),
            _ => unreachable!("kind checked by next()"),
        }
    }

    /// Asserts that every provided value was consumed.
    pub fn finish(self) -> Result<(), RecordDecodeError> {
        if self.index == self.values.len() {
            Ok(())
        } else {
            Err(RecordDecodeError::Arity {
                expected: self.index,
                actual: self.values.len(),
            })
        }
    }

    fn next(
        &mut self,
        field: &'static str,
        expected: ValueKind,
    ) -> Result<&'a Value, RecordDecodeError> {
        let value = self.values.get(self.index).ok_or(RecordDecodeError::Arity {
            expected: self.index + 1,
            actual: self.values.len(),
        })?;
        if value.kind() != expected {
            return Err(RecordDecodeError::FieldType {
                field,
                expected,
                actual: value.kind(),
            });
        }
        self.index += 1;
        Ok(value)
    }
}
