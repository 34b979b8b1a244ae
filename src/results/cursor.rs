use std::fmt;
use std::sync::Arc;

use crate::connection::Connection;
use crate::decode::decode_row;
use crate::error::SqlUowError;
use crate::params::sqlite_value_to_row_value;
use crate::typed::FromRow;
use crate::types::{ColumnDescriptor, RowValues, SqlType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CursorState {
    /// Executed, no row fetched yet.
    Pending,
    OnRow,
    Exhausted,
    Closed,
}

/// Forward-only view over the rows of one query execution.
///
/// Rows are fetched one at a time by [`Cursor::advance`]; nothing is buffered beyond the
/// current row. Backend resources are released as soon as the rows run out, on
/// [`Cursor::close`], or when the cursor is dropped.
pub struct Cursor<'s> {
    conn: &'s Connection,
    columns: Arc<[ColumnDescriptor]>,
    rows: Option<rusqlite::Rows<'s>>,
    current: Option<Vec<RowValues>>,
    state: CursorState,
}

impl<'s> Cursor<'s> {
    pub(crate) fn new(
        conn: &'s Connection,
        columns: Arc<[ColumnDescriptor]>,
        rows: rusqlite::Rows<'s>,
    ) -> Self {
        Self {
            conn,
            columns,
            rows: Some(rows),
            current: None,
            state: CursorState::Pending,
        }
    }

    /// Column descriptors, available before the first row is fetched.
    #[must_use]
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Move to the next row.
    ///
    /// Returns `false` once the rows are exhausted, and keeps returning `false` after that.
    ///
    /// # Errors
    /// Returns `SqlUowError::CursorClosedError` after [`Cursor::close`], or
    /// `SqlUowError::ExecutionError` if the backend fails while fetching; a failed fetch
    /// ends the cursor.
    pub fn advance(&mut self) -> Result<bool, SqlUowError> {
        match self.state {
            CursorState::Closed => return Err(SqlUowError::CursorClosedError),
            CursorState::Exhausted => return Ok(false),
            CursorState::Pending | CursorState::OnRow => {}
        }
        self.current = None;
        let Some(rows) = self.rows.as_mut() else {
            self.state = CursorState::Exhausted;
            return Ok(false);
        };

        let width = self.columns.len();
        self.conn.record(|s| s.fetches += 1);
        let fetched = match rows.next() {
            Ok(Some(row)) => extract_row(row, width).map(Some),
            Ok(None) => Ok(None),
            Err(e) => Err(SqlUowError::execution("fetch failed", e)),
        };

        match fetched {
            Ok(Some(values)) => {
                self.current = Some(values);
                self.state = CursorState::OnRow;
                Ok(true)
            }
            Ok(None) => {
                self.rows = None;
                self.state = CursorState::Exhausted;
                Ok(false)
            }
            Err(err) => {
                self.rows = None;
                self.state = CursorState::Exhausted;
                Err(err)
            }
        }
    }

    /// Decode the current row into `targets`, one target per column.
    ///
    /// # Errors
    /// Returns `SqlUowError::DecodeError` if no row is current (before the first
    /// `advance`, or after exhaustion) or the targets do not match the row;
    /// `SqlUowError::CursorClosedError` after [`Cursor::close`].
    pub fn decode(&self, targets: &[SqlType]) -> Result<Vec<RowValues>, SqlUowError> {
        match (self.state, self.current.as_deref()) {
            (CursorState::Closed, _) => Err(SqlUowError::CursorClosedError),
            (CursorState::OnRow, Some(values)) => decode_row(&self.columns, values, targets),
            (CursorState::Exhausted, _) => Err(SqlUowError::DecodeError(
                "cursor is exhausted; no current row".into(),
            )),
            _ => Err(SqlUowError::DecodeError(
                "no current row; call advance() first".into(),
            )),
        }
    }

    /// Decode the current row into a typed tuple.
    ///
    /// # Errors
    /// Same as [`Cursor::decode`], plus `DecodeError` for unexpected NULLs or out-of-range
    /// integers.
    pub fn decode_as<T: FromRow>(&self) -> Result<T, SqlUowError> {
        T::from_values(self.decode(T::TARGETS)?)
    }

    /// Release the cursor before exhaustion. Idempotent.
    pub fn close(&mut self) {
        self.rows = None;
        self.current = None;
        self.state = CursorState::Closed;
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.state == CursorState::Exhausted
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state == CursorState::Closed
    }
}

fn extract_row(row: &rusqlite::Row<'_>, width: usize) -> Result<Vec<RowValues>, SqlUowError> {
    let mut values = Vec::with_capacity(width);
    for idx in 0..width {
        let value = row
            .get_ref(idx)
            .map_err(|e| SqlUowError::execution("reading column failed", e))?;
        values.push(sqlite_value_to_row_value(value));
    }
    Ok(values)
}

impl fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("columns", &self.columns)
            .field("state", &self.state)
            .field("current", &self.current)
            .finish()
    }
}
