//! Expense record shape.
//!
//! # Invariants
//! - `category` holds the identity of an existing `Category` row; the
//!   repository itself does not enforce the reference.
//! - Timestamps carry at most microsecond precision so the TEXT storage
//!   encoding round-trips exactly.

use crate::model::record::{
    FieldSpec, Record, RecordDecodeError, RecordShape, Value, ValueKind, ValueReader, UNSET_PK,
};
use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

static EXPENSE_SHAPE: RecordShape = RecordShape {
    name: "Expense",
    fields: &[
        FieldSpec {
            name: "amount",
            kind: ValueKind::Float,
        },
        FieldSpec {
            name: "category",
            kind: ValueKind::Int,
        },
        FieldSpec {
            name: "expense_date",
            kind: ValueKind::Timestamp,
        },
        FieldSpec {
            name: "added_date",
            kind: ValueKind::Timestamp,
        },
        FieldSpec {
            name: "comment",
            kind: ValueKind::Text,
        },
    ],
};

/// One spending operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Amount spent.
    pub amount: f64,
    /// Identity of the owning category.
    pub category: i64,
    /// When the money was spent.
    pub expense_date: NaiveDateTime,
    /// When the record entered the store.
    pub added_date: NaiveDateTime,
    /// Free-form note.
    pub comment: String,
    /// Identity; `UNSET_PK` until persisted.
    pub pk: i64,
}

impl Expense {
    /// Creates a transient expense dated now, with an empty comment.
    pub fn new(amount: f64, category: i64) -> Self {
        let now = now_micros();
        Self {
            amount,
            category,
            expense_date: now,
            added_date: now,
            comment: String::new(),
            pk: UNSET_PK,
        }
    }
}

/// Current local wall-clock time truncated to microseconds.
fn now_micros() -> NaiveDateTime {
    let now = Local::now().naive_local();
    let micros = now.nanosecond() / 1_000 * 1_000;
    now.with_nanosecond(micros).unwrap_or(now)
}

impl Record for Expense {
    fn shape() -> &'static RecordShape {
        &EXPENSE_SHAPE
    }

    fn pk(&self) -> i64 {
        self.pk
    }

    fn set_pk(&mut self, pk: i64) {
        self.pk = pk;
    }

    fn values(&self) -> Vec<Value> {
        vec![
            Value::Float(self.amount),
            Value::Int(self.category),
            Value::Timestamp(self.expense_date),
            Value::Timestamp(self.added_date),
            Value::Text(self.comment.clone()),
        ]
    }

    fn from_values(values: &[Value], pk: i64) -> Result<Self, RecordDecodeError> {
        let mut reader = ValueReader::new(values);
        let amount = reader.next_float("amount")?;
        let category = reader.next_int("category")?;
        let expense_date = reader.next_timestamp("expense_date")?;
        let added_date = reader.next_timestamp("added_date")?;
        let comment = reader.next_text("comment")?;
        reader.finish()?;
        Ok(Self {
            amount,
            category,
            expense_date,
            added_date,
            comment,
            pk,
        })
    }
}
