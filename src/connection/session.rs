use std::cell::Cell;
use std::fmt;

use tracing::{debug, warn};

use crate::config::{Endpoint, SessionOptions};
use crate::error::SqlUowError;
use crate::stats::SessionStats;
use crate::statement::Statement;

const MEMORY_DATABASE: &str = ":memory:";

/// One live session with the backend.
///
/// The handle is owned by whoever opened it. Statements and units of work borrow it,
/// so it cannot be closed while any of them is alive. All operations on one handle run
/// sequentially; the type is `Send` but not `Sync`.
pub struct Connection {
    endpoint: Endpoint,
    pub(crate) conn: Option<rusqlite::Connection>,
    pub(crate) active_tx: Cell<Option<u64>>,
    pub(crate) next_tx_id: Cell<u64>,
    stats: Cell<SessionStats>,
}

impl Connection {
    /// Open a session with default [`SessionOptions`].
    ///
    /// # Errors
    /// Returns `SqlUowError::ConnectionError` if the descriptor is malformed, the endpoint is
    /// unreachable, or the backend session cannot be established.
    pub fn open(endpoint: &Endpoint) -> Result<Self, SqlUowError> {
        Self::open_with(endpoint, SessionOptions::default())
    }

    /// Open a session and apply `options` to it.
    ///
    /// # Errors
    /// Returns `SqlUowError::ConnectionError` if the descriptor is malformed, the endpoint is
    /// unreachable, or the backend rejects the session (including the initial smoke test).
    pub fn open_with(endpoint: &Endpoint, options: SessionOptions) -> Result<Self, SqlUowError> {
        endpoint.validate().map_err(|e| {
            SqlUowError::ConnectionError(format!("malformed endpoint descriptor: {e}"))
        })?;
        if !endpoint.is_loopback() {
            return Err(SqlUowError::ConnectionError(format!(
                "endpoint {endpoint} unreachable: the embedded backend only serves loopback hosts"
            )));
        }

        let conn = rusqlite::Connection::open(&endpoint.database)
            .map_err(|e| SqlUowError::connection(&format!("failed to open {endpoint}"), e))?;
        conn.busy_timeout(options.busy_timeout)
            .map_err(|e| SqlUowError::connection("failed to set busy timeout", e))?;

        // The backend opens files lazily; touch the schema so a bad target fails here.
        conn.query_row("PRAGMA schema_version", [], |row| row.get::<_, i64>(0))
            .map_err(|e| SqlUowError::connection(&format!("session check failed for {endpoint}"), e))?;

        if options.wal && endpoint.database != MEMORY_DATABASE {
            let mode = conn
                .query_row("PRAGMA journal_mode = WAL", [], |row| row.get::<_, String>(0))
                .map_err(|e| SqlUowError::connection("failed to enable WAL", e))?;
            debug!(journal_mode = %mode, "journal mode set");
        }

        debug!(endpoint = %endpoint, "session opened");
        Ok(Self {
            endpoint: endpoint.clone(),
            conn: Some(conn),
            active_tx: Cell::new(None),
            next_tx_id: Cell::new(0),
            stats: Cell::new(SessionStats::default()),
        })
    }

    /// Open a session, run `func` with it, and close it on every exit path.
    ///
    /// The error from `func` wins over an error from closing.
    ///
    /// # Errors
    /// Returns whatever `open`, `func` or `close` return.
    pub fn scoped<F, R>(endpoint: &Endpoint, func: F) -> Result<R, SqlUowError>
    where
        F: FnOnce(&mut Connection) -> Result<R, SqlUowError>,
    {
        let mut conn = Connection::open(endpoint)?;
        let result = func(&mut conn);
        let closed = conn.close();
        let value = result?;
        closed?;
        Ok(value)
    }

    /// Release the backend session.
    ///
    /// Idempotent. A transaction still open on the session is rolled back first.
    ///
    /// # Errors
    /// Returns `SqlUowError::ConnectionError` if the backend refuses to release the session.
    pub fn close(&mut self) -> Result<(), SqlUowError> {
        let Some(conn) = self.conn.take() else {
            return Ok(());
        };
        if !conn.is_autocommit() {
            warn!(endpoint = %self.endpoint, "closing with an open transaction; rolling back");
            if let Err(err) = conn.execute_batch("ROLLBACK") {
                warn!(error = %err, "implicit rollback on close failed");
            }
        }
        self.active_tx.set(None);
        conn.close()
            .map_err(|(_, e)| SqlUowError::connection("failed to close session", e))?;
        debug!(endpoint = %self.endpoint, "session closed");
        Ok(())
    }

    /// Compile `sql` into a reusable statement.
    ///
    /// # Errors
    /// Returns `SqlUowError::StatementError` if the connection is closed or the backend
    /// rejects the command text.
    pub fn prepare(&self, sql: &str) -> Result<Statement<'_>, SqlUowError> {
        let conn = self
            .conn
            .as_ref()
            .ok_or_else(|| SqlUowError::StatementError("connection is closed".into()))?;
        self.record(|s| s.prepares += 1);
        let stmt = conn
            .prepare(sql)
            .map_err(|e| SqlUowError::statement("prepare failed", e))?;
        debug!(sql, "statement prepared");
        Ok(Statement::new(self, sql, stmt))
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Whether a unit of work is currently open on this connection.
    #[must_use]
    pub fn has_open_unit_of_work(&self) -> bool {
        self.active_tx.get().is_some()
    }

    #[must_use]
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Snapshot of the backend round-trip counters.
    #[must_use]
    pub fn stats(&self) -> SessionStats {
        self.stats.get()
    }

    pub(crate) fn record(&self, update: impl FnOnce(&mut SessionStats)) {
        let mut stats = self.stats.get();
        update(&mut stats);
        self.stats.set(stats);
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!(error = %err, "failed to close connection on drop");
        }
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("endpoint", &self.endpoint)
            .field("open", &self.is_open())
            .field("active_tx", &self.active_tx.get())
            .field("stats", &self.stats.get())
            .finish()
    }
}
