use rusqlite::types::{Value, ValueRef};

use crate::types::RowValues;

/// Convert a single `RowValues` to a rusqlite `Value`.
#[must_use]
pub fn row_value_to_sqlite_value(value: &RowValues) -> Value {
    match value {
        RowValues::Int(i) => Value::Integer(*i),
        RowValues::Float(f) => Value::Real(*f),
        RowValues::Text(s) => Value::Text(s.clone()),
        RowValues::Null => Value::Null,
        RowValues::Blob(bytes) => Value::Blob(bytes.clone()),
    }
}

/// Convert a borrowed backend value into an owned `RowValues`.
#[must_use]
pub fn sqlite_value_to_row_value(value: ValueRef<'_>) -> RowValues {
    match value {
        ValueRef::Null => RowValues::Null,
        ValueRef::Integer(i) => RowValues::Int(i),
        ValueRef::Real(f) => RowValues::Float(f),
        ValueRef::Text(bytes) => RowValues::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(b) => RowValues::Blob(b.to_vec()),
    }
}

/// Argument list converted for binding.
pub struct Params(pub Vec<Value>);

impl Params {
    /// Convert row values into backend values.
    #[must_use]
    pub fn convert(params: &[RowValues]) -> Self {
        Params(params.iter().map(row_value_to_sqlite_value).collect())
    }

    /// Consume into a rusqlite parameter source.
    pub fn into_params(self) -> rusqlite::ParamsFromIter<Vec<Value>> {
        rusqlite::params_from_iter(self.0)
    }
}
