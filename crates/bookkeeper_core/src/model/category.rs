//! Expense category shape.

use crate::model::record::{
    FieldSpec, Record, RecordDecodeError, RecordShape, Value, ValueKind, ValueReader, UNSET_PK,
};
use serde::{Deserialize, Serialize};

static CATEGORY_SHAPE: RecordShape = RecordShape {
    name: "Category",
    fields: &[FieldSpec {
        name: "name",
        kind: ValueKind::Text,
    }],
};

/// A named bucket expenses are filed under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Display name, e.g. "groceries".
    pub name: String,
    /// Identity; `UNSET_PK` until persisted.
    pub pk: i64,
}

impl Category {
    /// Creates a transient category.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pk: UNSET_PK,
        }
    }
}

impl Record for Category {
    fn shape() -> &'static RecordShape {
        &CATEGORY_SHAPE
    }

    fn pk(&self) -> i64 {
        self.pk
    }

    fn set_pk(&mut self, pk: i64) {
        self.pk = pk;
    }

    fn values(&self) -> Vec<Value> {
        vec![Value::Text(self.name.clone())]
    }

    fn from_values(values: &[Value], pk: i64) -> Result<Self, RecordDecodeError> {
        let mut reader = ValueReader::new(values);
        let name = reader.next_text("name")?;
        reader.finish()?;
        Ok(Self { name, pk })
    }
}
