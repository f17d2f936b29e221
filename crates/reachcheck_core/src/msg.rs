#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked a category to check.
    CategorySelected(String),
    /// User changed timeout, concurrency mode or display policy.
    SettingsChanged(crate::RunSettings),
    /// User asked for a new run.
    StartClicked,
    /// User asked to abort the current run.
    CancelClicked,
    /// Engine refused to start the run (bad configuration).
    RunRejected { run_id: crate::RunId, reason: String },
    /// Engine loaded the descriptors and is about to probe them.
    RunStarted { run_id: crate::RunId, total: usize },
    /// One probe finished.
    OutcomeReceived {
        run_id: crate::RunId,
        row: crate::OutcomeRow,
    },
    /// Engine progress for the run.
    ProgressReported {
        run_id: crate::RunId,
        completed: usize,
        total: usize,
    },
    /// Engine finished (or cancelled) the run.
    RunFinished {
        run_id: crate::RunId,
        summary: crate::RunSummaryView,
    },
    /// User-visible notice, e.g. a category file that could not be read.
    NoticeRaised { run_id: crate::RunId, message: String },
}
