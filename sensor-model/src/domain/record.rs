use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use time::PrimitiveDateTime;

/// One observation exactly as it appeared in the source document.
///
/// Fields are positional: `[pes_id, "YYYY-MM-DDTHH:MM:SSZ", value]`. Anything
/// that is not a JSON array is kept untouched and reads as having no fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(Value);

impl RawRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn fields(&self) -> &[Value] {
        self.0.as_array().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn field(&self, idx: usize) -> Option<&Value> {
        self.fields().get(idx)
    }

    pub fn len(&self) -> usize {
        self.fields().len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

/// A record that passed validation, borrowing from the raw record.
///
/// `number` is the value exactly as it appeared in the source; `value` is its
/// float form for plotting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading<'a> {
    pub timestamp: &'a str,
    pub at: PrimitiveDateTime,
    pub number: &'a Number,
    pub value: f64,
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    #[error("record has fewer than 3 fields")]
    TooFewFields,
    #[error("timestamp is not a string or value is not a number")]
    UnexpectedType,
    #[error("timestamp does not match YYYY-MM-DDTHH:MM:SSZ")]
    InvalidTimestamp,
}

impl SkipReason {
    /// Stable code used in logs and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TooFewFields => "too_few_fields",
            Self::UnexpectedType => "unexpected_type",
            Self::InvalidTimestamp => "invalid_timestamp",
        }
    }
}
