/// Per-connection counters of backend round trips.
///
/// Every call that reaches the backend session bumps exactly one counter, so a call that
/// fails before dispatch (for example an argument-count mismatch) leaves them untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub prepares: u64,
    pub executions: u64,
    pub fetches: u64,
    pub begins: u64,
    pub commits: u64,
    pub rollbacks: u64,
}

impl SessionStats {
    /// Total number of calls dispatched to the backend.
    #[must_use]
    pub fn round_trips(&self) -> u64 {
        self.prepares + self.executions + self.fetches + self.begins + self.commits + self.rollbacks
    }
}
