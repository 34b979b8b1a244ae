use std::fmt;
use std::ops::Deref;

use tracing::{debug, warn};

use crate::connection::{Connection, TxEnd};
use crate::error::SqlUowError;
use crate::tx_outcome::TxOutcome;

/// Lifecycle of a unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxState {
    Open,
    Committed,
    RolledBack,
}

/// An explicit transaction scope on one connection.
///
/// While the unit of work is open, every execution on the connection belongs to it,
/// whether issued through the unit of work (it derefs to [`Connection`]) or through
/// statements and cursors obtained before it began. Nothing becomes visible to other
/// sessions until [`UnitOfWork::commit`] succeeds.
///
/// Dropping an open unit of work rolls it back.
pub struct UnitOfWork<'c> {
    conn: &'c Connection,
    id: u64,
    state: TxState,
    executions_at_begin: u64,
}

impl<'c> UnitOfWork<'c> {
    pub(crate) fn new(conn: &'c Connection, id: u64, executions_at_begin: u64) -> Self {
        Self {
            conn,
            id,
            state: TxState::Open,
            executions_at_begin,
        }
    }

    /// Make every change of this unit of work durable and visible.
    ///
    /// If the backend refuses the commit, the unit of work is rolled back so that no
    /// partial effects survive.
    ///
    /// # Errors
    /// Returns `SqlUowError::CommitError` if the commit fails.
    pub fn commit(mut self) -> Result<TxOutcome, SqlUowError> {
        self.conn.record(|s| s.commits += 1);
        if let Err(err) = self.conn.finish_unit_of_work(self.id, TxEnd::Commit) {
            warn!(tx_id = self.id, error = %err, "commit failed; rolling back");
            self.conn.record(|s| s.rollbacks += 1);
            if let Err(rollback_err) = self.conn.finish_unit_of_work(self.id, TxEnd::Rollback) {
                warn!(tx_id = self.id, error = %rollback_err, "rollback after failed commit failed");
            }
            self.finish(TxState::RolledBack);
            return Err(SqlUowError::CommitError(err));
        }
        debug!(tx_id = self.id, "unit of work committed");
        Ok(self.finish(TxState::Committed))
    }

    /// Discard every change of this unit of work.
    ///
    /// # Errors
    /// Returns `SqlUowError::RollbackError` if the backend fails the rollback.
    pub fn rollback(mut self) -> Result<TxOutcome, SqlUowError> {
        self.conn.record(|s| s.rollbacks += 1);
        let result = self.conn.finish_unit_of_work(self.id, TxEnd::Rollback);
        let outcome = self.finish(TxState::RolledBack);
        result.map_err(SqlUowError::RollbackError)?;
        debug!(tx_id = outcome.id(), "unit of work rolled back");
        Ok(outcome)
    }

    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn state(&self) -> TxState {
        self.state
    }

    fn finish(&mut self, state: TxState) -> TxOutcome {
        self.state = state;
        self.conn.release_unit_of_work(self.id);
        let executions = self
            .conn
            .stats()
            .executions
            .saturating_sub(self.executions_at_begin);
        TxOutcome::new(self.id, state, executions)
    }
}

impl Deref for UnitOfWork<'_> {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        self.conn
    }
}

impl Drop for UnitOfWork<'_> {
    fn drop(&mut self) {
        if self.state != TxState::Open {
            return;
        }
        warn!(tx_id = self.id, "unit of work dropped while open; rolling back");
        self.conn.record(|s| s.rollbacks += 1);
        if let Err(err) = self.conn.finish_unit_of_work(self.id, TxEnd::Rollback) {
            warn!(tx_id = self.id, error = %err, "rollback on drop failed");
        }
        self.finish(TxState::RolledBack);
    }
}

impl fmt::Debug for UnitOfWork<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitOfWork")
            .field("id", &self.id)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
