//! Typed decoding on top of [`crate::decode`].
//!
//! [`FromValue`] maps one decoded value to a Rust type; [`FromRow`] maps a whole row to a
//! tuple of such types and supplies the target list the decoder checks against.

mod macros;

use crate::error::SqlUowError;
use crate::types::{RowValues, SqlType};

use macros::impl_from_row_tuple;

/// A Rust type one column can decode into.
pub trait FromValue: Sized {
    /// Target type requested from the decoder for this Rust type.
    const TARGET: SqlType;

    /// Convert a value the decoder already accepted for [`Self::TARGET`].
    ///
    /// # Errors
    /// Returns `SqlUowError::DecodeError` for NULL (unless `Self` is an `Option`) or for
    /// integers outside `Self`'s range.
    fn from_value(value: RowValues) -> Result<Self, SqlUowError>;
}

/// A Rust type one whole row can decode into.
pub trait FromRow: Sized {
    const TARGETS: &'static [SqlType];

    /// # Errors
    /// Returns `SqlUowError::DecodeError` if the values do not fit `Self`.
    fn from_values(values: Vec<RowValues>) -> Result<Self, SqlUowError>;
}

fn unexpected(value: &RowValues, target: SqlType) -> SqlUowError {
    if value.is_null() {
        SqlUowError::DecodeError(format!("unexpected NULL for non-optional {target} target"))
    } else {
        SqlUowError::DecodeError(format!("{} value cannot decode to {target}", value.kind()))
    }
}

impl FromValue for i64 {
    const TARGET: SqlType = SqlType::Integer;

    fn from_value(value: RowValues) -> Result<Self, SqlUowError> {
        match value {
            RowValues::Int(i) => Ok(i),
            other => Err(unexpected(&other, Self::TARGET)),
        }
    }
}

impl FromValue for i32 {
    const TARGET: SqlType = SqlType::Integer;

    fn from_value(value: RowValues) -> Result<Self, SqlUowError> {
        let wide = i64::from_value(value)?;
        i32::try_from(wide)
            .map_err(|_| SqlUowError::DecodeError(format!("integer {wide} does not fit in i32")))
    }
}

impl FromValue for String {
    const TARGET: SqlType = SqlType::Text;

    fn from_value(value: RowValues) -> Result<Self, SqlUowError> {
        match value {
            RowValues::Text(s) => Ok(s),
            other => Err(unexpected(&other, Self::TARGET)),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    const TARGET: SqlType = T::TARGET;

    fn from_value(value: RowValues) -> Result<Self, SqlUowError> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_value(value).map(Some)
        }
    }
}

impl_from_row_tuple!(1; A);
impl_from_row_tuple!(2; A, B);
impl_from_row_tuple!(3; A, B, C);
impl_from_row_tuple!(4; A, B, C, D);
impl_from_row_tuple!(5; A, B, C, D, E);
impl_from_row_tuple!(6; A, B, C, D, E, F);
impl_from_row_tuple!(7; A, B, C, D, E, F, G);
impl_from_row_tuple!(8; A, B, C, D, E, F, G, H);
