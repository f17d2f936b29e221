use crate::{RunId, RunMode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Load the category and probe every endpoint in it.
    StartRun {
        run_id: RunId,
        category: String,
        timeout_ms: u64,
        mode: RunMode,
    },
    /// Abort the outstanding probes of a run and finalize it early.
    CancelRun { run_id: RunId },
}
