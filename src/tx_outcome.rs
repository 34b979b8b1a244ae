use crate::transaction::TxState;

/// Summary returned when a [`UnitOfWork`](crate::transaction::UnitOfWork) commits or rolls back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxOutcome {
    id: u64,
    state: TxState,
    executions: u64,
}

impl TxOutcome {
    pub(crate) fn new(id: u64, state: TxState, executions: u64) -> Self {
        Self {
            id,
            state,
            executions,
        }
    }

    /// Identifier of the finished unit of work, unique per connection.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Terminal state: `Committed` or `RolledBack`.
    #[must_use]
    pub fn state(&self) -> TxState {
        self.state
    }

    #[must_use]
    pub fn is_committed(&self) -> bool {
        self.state == TxState::Committed
    }

    /// Executions dispatched on the connection while the unit of work was open.
    #[must_use]
    pub fn executions(&self) -> u64 {
        self.executions
    }
}
