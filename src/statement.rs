use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::connection::Connection;
use crate::error::SqlUowError;
use crate::params::Params;
use crate::results::Cursor;
use crate::types::{ColumnDescriptor, RowValues};

/// Outcome of one execution.
///
/// Which variant comes back depends on the command's shape as compiled by the backend:
/// commands that produce result columns yield a cursor, everything else a row count.
pub enum ExecutionResult<'s> {
    RowsAffected(usize),
    Rows(Cursor<'s>),
}

impl<'s> ExecutionResult<'s> {
    /// Affected-row count for mutating commands.
    #[must_use]
    pub fn rows_affected(&self) -> Option<usize> {
        match self {
            ExecutionResult::RowsAffected(n) => Some(*n),
            ExecutionResult::Rows(_) => None,
        }
    }

    /// Take the cursor of a row-producing command.
    #[must_use]
    pub fn into_cursor(self) -> Option<Cursor<'s>> {
        match self {
            ExecutionResult::Rows(cursor) => Some(cursor),
            ExecutionResult::RowsAffected(_) => None,
        }
    }
}

impl fmt::Debug for ExecutionResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionResult::RowsAffected(n) => f.debug_tuple("RowsAffected").field(n).finish(),
            ExecutionResult::Rows(cursor) => f.debug_tuple("Rows").field(cursor).finish(),
        }
    }
}

/// A compiled, reusable command bound to one connection.
///
/// The statement borrows its connection, so it can never outlive it. Executing a
/// row-producing statement borrows the statement mutably for as long as the cursor lives,
/// which means the cursor has to be dropped or closed before the next execution.
pub struct Statement<'c> {
    conn: &'c Connection,
    sql: Arc<str>,
    inner: Option<rusqlite::Statement<'c>>,
    parameter_count: usize,
    columns: Arc<[ColumnDescriptor]>,
}

impl<'c> Statement<'c> {
    pub(crate) fn new(conn: &'c Connection, sql: &str, inner: rusqlite::Statement<'c>) -> Self {
        let columns: Arc<[ColumnDescriptor]> = inner
            .columns()
            .iter()
            .map(|col| ColumnDescriptor::new(col.name(), col.decl_type()))
            .collect();
        Self {
            conn,
            sql: Arc::from(sql),
            parameter_count: inner.parameter_count(),
            inner: Some(inner),
            columns,
        }
    }

    /// Run the statement with `args` bound to its placeholders in order.
    ///
    /// # Errors
    /// Returns `SqlUowError::ArgumentError` (without contacting the backend) when
    /// `args.len()` differs from the placeholder count, and `SqlUowError::ExecutionError`
    /// when the statement is closed or the backend fails the execution.
    pub fn execute(&mut self, args: &[RowValues]) -> Result<ExecutionResult<'_>, SqlUowError> {
        let stmt = self
            .inner
            .as_mut()
            .ok_or_else(|| SqlUowError::ExecutionError("statement is closed".into()))?;
        if args.len() != self.parameter_count {
            return Err(SqlUowError::ArgumentError {
                expected: self.parameter_count,
                actual: args.len(),
            });
        }
        let session = self
            .conn
            .conn
            .as_ref()
            .ok_or_else(|| SqlUowError::ExecutionError("connection is closed".into()))?;
        self.conn.ensure_transaction_intact(session)?;

        let params = Params::convert(args).into_params();
        self.conn.record(|s| s.executions += 1);
        if self.columns.is_empty() {
            let affected = stmt
                .execute(params)
                .map_err(|e| SqlUowError::execution("execute failed", e))?;
            debug!(sql = %self.sql, affected, "statement executed");
            Ok(ExecutionResult::RowsAffected(affected))
        } else {
            let rows = stmt
                .query(params)
                .map_err(|e| SqlUowError::execution("query failed", e))?;
            Ok(ExecutionResult::Rows(Cursor::new(
                self.conn,
                Arc::clone(&self.columns),
                rows,
            )))
        }
    }

    /// Release the backend statement. Idempotent.
    pub fn close(&mut self) {
        if let Some(stmt) = self.inner.take()
            && let Err(err) = stmt.finalize()
        {
            warn!(sql = %self.sql, error = %err, "finalizing statement reported an error");
        }
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.is_none()
    }

    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.parameter_count
    }

    /// Result columns; empty for mutating commands.
    #[must_use]
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }
}

impl fmt::Debug for Statement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Statement")
            .field("sql", &self.sql)
            .field("parameter_count", &self.parameter_count)
            .field("columns", &self.columns)
            .field("closed", &self.is_closed())
            .finish()
    }
}
