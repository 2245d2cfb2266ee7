//! Generic repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Derive a table schema from a record shape at construction time.
//! - Provide CRUD plus attribute-equality filtering over that table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Identity values are assigned only here, at insert, and never reused.
//! - A failed `add` leaves the caller's record untouched.
//! - Physical column order is `pk` first; logical order is `pk` last. Every
//!   read and write transposes between the two.

use crate::db::DbError;
use crate::model::record::{Record, RecordDecodeError, Value, ValueKind, PK_FIELD, UNSET_PK};
use log::debug;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Identity precondition violated on `add` or `update`.
    InvalidState(&'static str),
    /// `delete` addressed an identity absent from the store.
    NotFound(i64),
    /// A filter referenced a field the shape does not declare.
    InvalidArgument(String),
    /// Persisted data failed to decode back into its semantic type.
    InvalidData(String),
    /// The backing store rejected or could not execute a statement.
    Db(DbError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidState(message) => f.write_str(message),
            Self::NotFound(pk) => write!(f, "no record with identity {pk}"),
            Self::InvalidArgument(message) => f.write_str(message),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<RecordDecodeError> for RepoError {
    fn from(value: RecordDecodeError) -> Self {
        Self::InvalidData(value.to_string())
    }
}

/// Conjunctive equality predicate over named fields.
///
/// Terms are kept in insertion order; an empty filter matches everything.
/// Comparison happens on native semantic values after reconstruction, not
/// on the stored text encoding.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    terms: Vec<(String, Value)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one `field == value` term.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.terms.push((field.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.terms.iter().map(|(name, value)| (name.as_str(), value))
    }
}

/// Schema handling at repository construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaMode {
    /// Create the table only when absent (idempotent default).
    #[default]
    CreateIfMissing,
    /// Drop any existing table first; clean-slate mode.
    Recreate,
}

/// Repository interface for one record shape.
pub trait Repository<T: Record> {
    /// Inserts a transient record, assigns its identity, returns it.
    fn add(&self, record: &mut T) -> RepoResult<i64>;
    /// Looks one record up by identity; absence is `Ok(None)`.
    fn get(&self, pk: i64) -> RepoResult<Option<T>>;
    /// Returns records matching every filter term, in identity order.
    fn get_all(&self, filter: &Filter) -> RepoResult<Vec<T>>;
    /// Rewrites all non-identity columns of the addressed row.
    fn update(&self, record: &T) -> RepoResult<()>;
    /// Removes exactly one row; the identity must exist.
    fn delete(&self, pk: i64) -> RepoResult<()>;
}

/// SQLite-backed repository generic over a record shape.
pub struct SqliteRepository<'conn, T: Record> {
    conn: &'conn Connection,
    table: String,
    _shape: PhantomData<T>,
}

impl<'conn, T: Record> SqliteRepository<'conn, T> {
    /// Creates the repository, deriving and ensuring the table schema.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        Self::try_new_with_mode(conn, SchemaMode::default())
    }

    /// Creates the repository with explicit schema handling.
    pub fn try_new_with_mode(conn: &'conn Connection, mode: SchemaMode) -> RepoResult<Self> {
        let shape = T::shape();
        let table = shape.name.to_ascii_lowercase();

        if mode == SchemaMode::Recreate {
            conn.execute_batch(&format!("DROP TABLE IF EXISTS {table};"))?;
        }

        // AUTOINCREMENT keeps identities strictly increasing and never
        // reused, even after the highest row is deleted.
        let columns: Vec<String> = std::iter::once(format!(
            "{PK_FIELD} INTEGER PRIMARY KEY AUTOINCREMENT"
        ))
        .chain(
            shape
                .fields
                .iter()
                .map(|field| format!("{} {}", field.name, field.kind.column_type())),
        )
        .collect();
        let ddl = format!(
            "CREATE TABLE IF NOT EXISTS {table} ({});",
            columns.join(", ")
        );
        conn.execute_batch(&ddl)?;

        debug!(
            "event=repo_init module=repo status=ok table={table} mode={mode:?} fields={}",
            shape.fields.len()
        );

        Ok(Self {
            conn,
            table,
            _shape: PhantomData,
        })
    }

    /// Derived table name.
    pub fn table_name(&self) -> &str {
        &self.table
    }

    fn select_sql(&self) -> String {
        let fields: Vec<&str> = T::shape().fields.iter().map(|field| field.name).collect();
        format!(
            "SELECT {PK_FIELD}, {} FROM {}",
            fields.join(", "),
            self.table
        )
    }

    fn decode_row(row: &Row<'_>) -> RepoResult<T> {
        let shape = T::shape();
        let pk: i64 = row.get(0)?;
        let mut values = Vec::with_capacity(shape.fields.len());
        for (index, field) in shape.fields.iter().enumerate() {
            let column = index + 1;
            let value = match field.kind {
                ValueKind::Int => Value::Int(row.get(column)?),
                kind => {
                    let stored: String = row.get(column)?;
                    Value::parse_stored(kind, &stored).map_err(|message| {
                        RepoError::InvalidData(format!(
                            "column `{}`: {message}",
                            field.name
                        ))
                    })?
                }
            };
            values.push(value);
        }
        Ok(T::from_values(&values, pk)?)
    }

    fn validate_filter(filter: &Filter) -> RepoResult<()> {
        let shape = T::shape();
        for (name, _) in filter.terms() {
            if !shape.has_field(name) {
                return Err(RepoError::InvalidArgument(format!(
                    "unknown filter field `{name}` for shape `{}`",
                    shape.name
                )));
            }
        }
        Ok(())
    }

    fn matches(record: &T, filter: &Filter) -> bool {
        if filter.is_empty() {
            return true;
        }
        let values = record.values();
        let shape = T::shape();
        filter.terms().all(|(name, expected)| {
            if name == PK_FIELD {
                return Value::Int(record.pk()) == *expected;
            }
            // Names were validated before the scan.
            shape
                .index_of(name)
                .map(|index| values[index] == *expected)
                .unwrap_or(false)
        })
    }
}

impl<T: Record> Repository<T> for SqliteRepository<'_, T> {
    fn add(&self, record: &mut T) -> RepoResult<i64> {
        if record.pk() != UNSET_PK {
            return Err(RepoError::InvalidState(
                "cannot add a record that already carries an identity",
            ));
        }

        let shape = T::shape();
        let fields: Vec<&str> = shape.fields.iter().map(|field| field.name).collect();
        let placeholders: Vec<String> = (1..=fields.len()).map(|i| format!("?{i}")).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({});",
            self.table,
            fields.join(", "),
            placeholders.join(", ")
        );
        let stored: Vec<rusqlite::types::Value> =
            record.values().iter().map(Value::to_stored).collect();

        self.conn.execute(&sql, params_from_iter(stored))?;

        // Identity write-back happens only after a successful insert, so a
        // failed add leaves the record transient.
        let pk = self.conn.last_insert_rowid();
        record.set_pk(pk);
        debug!(
            "event=record_add module=repo status=ok table={} pk={pk}",
            self.table
        );
        Ok(pk)
    }

    fn get(&self, pk: i64) -> RepoResult<Option<T>> {
        let sql = format!("{} WHERE {PK_FIELD} = ?1;", self.select_sql());
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params![pk])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(Self::decode_row(row)?));
        }
        Ok(None)
    }

    fn get_all(&self, filter: &Filter) -> RepoResult<Vec<T>> {
        Self::validate_filter(filter)?;

        // Identity order matches insertion order; identities are monotonic.
        let sql = format!("{} ORDER BY {PK_FIELD} ASC;", self.select_sql());
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            let record = Self::decode_row(row)?;
            // Filtering on reconstructed native values, not stored text.
            if Self::matches(&record, filter) {
                records.push(record);
            }
        }

        Ok(records)
    }

    fn update(&self, record: &T) -> RepoResult<()> {
        if record.pk() == UNSET_PK {
            return Err(RepoError::InvalidState("unknown identity"));
        }

        let shape = T::shape();
        let assignments: Vec<String> = shape
            .fields
            .iter()
            .enumerate()
            .map(|(index, field)| format!("{} = ?{}", field.name, index + 1))
            .collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE {PK_FIELD} = ?{};",
            self.table,
            assignments.join(", "),
            shape.fields.len() + 1
        );
        let mut stored: Vec<rusqlite::types::Value> =
            record.values().iter().map(Value::to_stored).collect();
        stored.push(rusqlite::types::Value::Integer(record.pk()));

        // A missing row is a silent no-op, unlike delete's strict check.
        let changed = self.conn.execute(&sql, params_from_iter(stored))?;
        debug!(
            "event=record_update module=repo status=ok table={} pk={} changed={changed}",
            self.table,
            record.pk()
        );
        Ok(())
    }

    fn delete(&self, pk: i64) -> RepoResult<()> {
        // Existence check is type-blind: a row whose text fails decode
        // must stay deletable.
        let exists = self
            .conn
            .query_row(
                &format!(
                    "SELECT {PK_FIELD} FROM {} WHERE {PK_FIELD} = ?1;",
                    self.table
                ),
                params![pk],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        if exists.is_none() {
            return Err(RepoError::NotFound(pk));
        }
        self.conn.execute(
            &format!("DELETE FROM {} WHERE {PK_FIELD} = ?1;", self.table),
            params![pk],
        )?;
        debug!(
            "event=record_delete module=repo status=ok table={} pk={pk}",
            self.table
        );
        Ok(())
    }
}
