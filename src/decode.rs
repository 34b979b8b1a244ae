//! Row decoding.
//!
//! A pure mapping from one fetched row plus the requested target types to decoded
//! values. The compatibility rules are narrow: integer columns decode only
//! to [`SqlType::Integer`], character columns only to [`SqlType::Text`], and nothing
//! else decodes at all. There is no widening and no text/integer coercion.

use crate::error::SqlUowError;
use crate::types::{ColumnDescriptor, ColumnType, RowValues, SqlType};

/// Decode `values` (one row, in column order) into `targets`.
///
/// NULL is accepted for any target whose column family matches and is returned as
/// [`RowValues::Null`]; the typed layer decides whether NULL is acceptable.
///
/// # Errors
/// Returns `SqlUowError::DecodeError` on a column-count mismatch or on the first column
/// whose type is incompatible with its target.
pub fn decode_row(
    columns: &[ColumnDescriptor],
    values: &[RowValues],
    targets: &[SqlType],
) -> Result<Vec<RowValues>, SqlUowError> {
    if targets.len() != values.len() {
        return Err(SqlUowError::DecodeError(format!(
            "row has {} column(s) but {} target(s) were requested",
            values.len(),
            targets.len()
        )));
    }
    columns
        .iter()
        .zip(values)
        .zip(targets)
        .map(|((column, value), target)| decode_value(column, value, *target))
        .collect()
}

fn decode_value(
    column: &ColumnDescriptor,
    value: &RowValues,
    target: SqlType,
) -> Result<RowValues, SqlUowError> {
    let family = match &column.column_type {
        ColumnType::Integer => SqlType::Integer,
        ColumnType::Character => SqlType::Text,
        ColumnType::Other(declared) => {
            return Err(mismatch(column, target, &format!("declared type {declared}")));
        }
        ColumnType::Untyped => match value {
            RowValues::Int(_) => SqlType::Integer,
            RowValues::Text(_) => SqlType::Text,
            RowValues::Null => target,
            other => return Err(mismatch(column, target, &format!("{} value", other.kind()))),
        },
    };
    if family != target {
        return Err(mismatch(column, target, &format!("{family} column")));
    }

    match (target, value) {
        (_, RowValues::Null)
        | (SqlType::Integer, RowValues::Int(_))
        | (SqlType::Text, RowValues::Text(_)) => Ok(value.clone()),
        (_, other) => Err(mismatch(column, target, &format!("stored {} value", other.kind()))),
    }
}

fn mismatch(column: &ColumnDescriptor, target: SqlType, found: &str) -> SqlUowError {
    SqlUowError::DecodeError(format!(
        "column '{}' cannot decode to {target}: found {found}",
        column.name
    ))
}
