use crate::command::{is_identifier, placeholder_count};
use crate::error::SqlUowError;
use crate::statement::ExecutionResult;
use crate::types::RowValues;

use super::Connection;

impl Connection {
    /// Execute a command once without keeping a prepared statement around.
    ///
    /// The argument count is checked against the command text before anything reaches the
    /// backend. The execution result is handed to `consume`; the ephemeral statement (and
    /// any cursor) is released when `consume` returns, on success and on failure.
    ///
    /// ```rust
    /// # use sql_uow::prelude::*;
    /// # fn demo(conn: &Connection) -> Result<(), SqlUowError> {
    /// let names = conn.execute_direct(
    ///     "select lastname from employee where job = ?",
    ///     &[RowValues::from("MANAGER")],
    ///     |outcome| {
    ///         let mut names = Vec::new();
    ///         if let ExecutionResult::Rows(mut cursor) = outcome {
    ///             while cursor.advance()? {
    ///                 let (name,): (String,) = cursor.decode_as()?;
    ///                 names.push(name);
    ///             }
    ///         }
    ///         Ok(names)
    ///     },
    /// )?;
    /// # let _ = names;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    /// Returns `SqlUowError::ArgumentError` on arity mismatch, `StatementError` if the
    /// command cannot be prepared, `ExecutionError` if execution fails, or whatever
    /// `consume` returns.
    pub fn execute_direct<F, R>(
        &self,
        sql: &str,
        args: &[RowValues],
        consume: F,
    ) -> Result<R, SqlUowError>
    where
        F: FnOnce(ExecutionResult<'_>) -> Result<R, SqlUowError>,
    {
        let expected = placeholder_count(sql);
        if expected != args.len() {
            return Err(SqlUowError::ArgumentError {
                expected,
                actual: args.len(),
            });
        }
        let mut stmt = self.prepare(sql)?;
        let result = match stmt.execute(args) {
            Ok(outcome) => consume(outcome),
            Err(err) => Err(err),
        };
        stmt.close();
        result
    }

    /// Execute a mutating command once and return the number of affected rows.
    ///
    /// # Errors
    /// Same as [`Connection::execute_direct`]; a command that returns rows fails with
    /// `SqlUowError::ExecutionError`.
    pub fn execute_update(&self, sql: &str, args: &[RowValues]) -> Result<usize, SqlUowError> {
        self.execute_direct(sql, args, |outcome| match outcome {
            ExecutionResult::RowsAffected(n) => Ok(n),
            ExecutionResult::Rows(_) => Err(SqlUowError::ExecutionError(
                "command returns rows; use execute_direct or a prepared statement".into(),
            )),
        })
    }

    /// Run a script of argument-free commands (DDL, seed data) in one call.
    ///
    /// # Errors
    /// Returns `SqlUowError::ExecutionError` if the connection is closed or any command fails.
    pub fn execute_batch(&self, script: &str) -> Result<(), SqlUowError> {
        let conn = self
            .conn
            .as_ref()
            .ok_or_else(|| SqlUowError::ExecutionError("connection is closed".into()))?;
        self.ensure_transaction_intact(conn)?;
        self.record(|s| s.executions += 1);
        conn.execute_batch(script)
            .map_err(|e| SqlUowError::execution("batch failed", e))
    }

    /// Number of rows in `table`.
    ///
    /// # Errors
    /// Returns `SqlUowError::StatementError` if `table` is not a plain identifier or does not
    /// exist, or `ExecutionError`/`DecodeError` if the count cannot be read.
    pub fn count_rows(&self, table: &str) -> Result<i64, SqlUowError> {
        if !is_identifier(table) {
            return Err(SqlUowError::StatementError(format!(
                "'{table}' is not a valid table name"
            )));
        }
        self.execute_direct(&format!("SELECT count(*) FROM {table}"), &[], |outcome| {
            let mut cursor = outcome.into_cursor().ok_or_else(|| {
                SqlUowError::ExecutionError("count query did not return rows".into())
            })?;
            if !cursor.advance()? {
                return Err(SqlUowError::ExecutionError(
                    "count query returned no rows".into(),
                ));
            }
            let (count,): (i64,) = cursor.decode_as()?;
            Ok(count)
        })
    }
}
