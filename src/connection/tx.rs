use tracing::{debug, warn};

use crate::error::SqlUowError;
use crate::transaction::UnitOfWork;

use super::Connection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TxEnd {
    Commit,
    Rollback,
}

impl TxEnd {
    fn sql(self) -> &'static str {
        match self {
            TxEnd::Commit => "COMMIT",
            TxEnd::Rollback => "ROLLBACK",
        }
    }
}

impl Connection {
    /// Begin a unit of work on this connection.
    ///
    /// Every execution issued on the connection until the unit of work commits or rolls
    /// back is part of it.
    ///
    /// # Errors
    /// Returns `SqlUowError::TransactionError` if the connection is closed, a unit of work
    /// is already open, the session is inside a transaction started by raw SQL, or the
    /// backend refuses to begin.
    pub fn begin(&self) -> Result<UnitOfWork<'_>, SqlUowError> {
        let conn = self
            .conn
            .as_ref()
            .ok_or_else(|| SqlUowError::TransactionError("connection is closed".into()))?;
        if let Some(id) = self.active_tx.get() {
            return Err(SqlUowError::TransactionError(format!(
                "unit of work {id} is already open on this connection"
            )));
        }
        if !conn.is_autocommit() {
            return Err(SqlUowError::TransactionError(
                "session is already inside a transaction started outside a unit of work".into(),
            ));
        }
        self.record(|s| s.begins += 1);
        conn.execute_batch("BEGIN")
            .map_err(|e| SqlUowError::TransactionError(format!("BEGIN failed: {e}")))?;

        let id = self.next_tx_id.get() + 1;
        self.next_tx_id.set(id);
        self.active_tx.set(Some(id));
        debug!(tx_id = id, "unit of work begun");
        Ok(UnitOfWork::new(self, id, self.stats().executions))
    }

    /// Run `func` inside a unit of work: commit when it returns `Ok`, roll back when it
    /// returns `Err`.
    ///
    /// # Errors
    /// Returns the error from `begin`, from `func`, or from `commit`.
    pub fn in_unit_of_work<F, R>(&self, func: F) -> Result<R, SqlUowError>
    where
        F: FnOnce(&UnitOfWork<'_>) -> Result<R, SqlUowError>,
    {
        let uow = self.begin()?;
        match func(&uow) {
            Ok(value) => {
                uow.commit()?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = uow.rollback() {
                    warn!(error = %rollback_err, "rollback after failed unit of work also failed");
                }
                Err(err)
            }
        }
    }

    /// Issue `COMMIT` or `ROLLBACK` for unit of work `id` and release the slot.
    ///
    /// A session the backend already took out of its transaction cannot commit; a
    /// rollback of such a session succeeds without a round trip.
    pub(crate) fn finish_unit_of_work(&self, id: u64, end: TxEnd) -> Result<(), String> {
        let conn = self
            .conn
            .as_ref()
            .ok_or_else(|| "connection is closed".to_string())?;
        if conn.is_autocommit() {
            self.release_unit_of_work(id);
            return match end {
                TxEnd::Commit => Err("transaction was already ended by the backend".into()),
                TxEnd::Rollback => Ok(()),
            };
        }
        let result = conn.execute_batch(end.sql()).map_err(|e| e.to_string());
        if conn.is_autocommit() {
            self.release_unit_of_work(id);
        }
        result
    }

    /// Fail when a unit of work is open but the session has left its transaction, so
    /// nothing runs in autocommit under an open unit of work.
    pub(crate) fn ensure_transaction_intact(
        &self,
        conn: &rusqlite::Connection,
    ) -> Result<(), SqlUowError> {
        match self.active_tx.get() {
            Some(id) if conn.is_autocommit() => Err(SqlUowError::TransactionError(format!(
                "unit of work {id} was ended by the backend; roll it back before executing"
            ))),
            _ => Ok(()),
        }
    }

    /// Drop the bookkeeping for unit of work `id` once it reached a terminal state.
    pub(crate) fn release_unit_of_work(&self, id: u64) {
        if self.active_tx.get() == Some(id) {
            self.active_tx.set(None);
        }
    }
}
