use thiserror::Error;

/// Every failure this layer reports.
///
/// Each variant corresponds to one failure kind; backend errors are classified at the
/// call site that produced them instead of being converted wholesale.
#[derive(Debug, Error)]
pub enum SqlUowError {
    /// Endpoint unreachable, session could not be established, or the connection is closed.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Malformed or incomplete endpoint descriptor.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Command text rejected by the backend at prepare time.
    #[error("Statement error: {0}")]
    StatementError(String),

    /// Argument list does not match the command's placeholders; never sent to the backend.
    #[error("Argument error: expected {expected} argument(s), got {actual}")]
    ArgumentError { expected: usize, actual: usize },

    /// Constraint violation, runtime type mismatch, timeout or any other execution failure.
    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    /// Row shape or column type does not match the requested targets.
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// The cursor was closed before this call.
    #[error("Cursor is closed")]
    CursorClosedError,

    /// A unit of work could not be started.
    #[error("Transaction error: {0}")]
    TransactionError(String),

    /// Commit failed; no effect of the unit of work may be assumed durable.
    #[error("Commit error: {0}")]
    CommitError(String),

    #[error("Rollback error: {0}")]
    RollbackError(String),
}

impl SqlUowError {
    pub(crate) fn connection(context: &str, err: impl std::fmt::Display) -> Self {
        SqlUowError::ConnectionError(format!("{context}: {err}"))
    }

    pub(crate) fn statement(context: &str, err: impl std::fmt::Display) -> Self {
        SqlUowError::StatementError(format!("{context}: {err}"))
    }

    pub(crate) fn execution(context: &str, err: impl std::fmt::Display) -> Self {
        SqlUowError::ExecutionError(format!("{context}: {err}"))
    }
}
