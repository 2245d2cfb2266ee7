//! Shared test fixture: a minimal one-field record shape.

use bookkeeper_core::{
    FieldSpec, Record, RecordDecodeError, RecordShape, Value, ValueKind, ValueReader, UNSET_PK,
};

static SAMPLE_SHAPE: RecordShape = RecordShape {
    name: "Sample",
    fields: &[FieldSpec {
        name: "text",
        kind: ValueKind::Text,
    }],
};

#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub text: String,
    pub pk: i64,
}

impl Sample {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            pk: UNSET_PK,
        }
    }
}

impl Record for Sample {
    fn shape() -> &'static RecordShape {
        &SAMPLE_SHAPE
    }

    fn pk(&self) -> i64 {
        self.pk
    }

    fn set_pk(&mut self, pk: i64) {
        self.pk = pk;
    }

    fn values(&self) -> Vec<Value> {
        vec![Value::Text(self.text.clone())]
    }

    fn from_values(values: &[Value], pk: i64) -> Result<Self, RecordDecodeError> {
        let mut reader = ValueReader::new(values);
        let text = reader.next_text("text")?;
        reader.finish()?;
        Ok(Self { text, pk })
    }
}
