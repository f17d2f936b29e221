use crate::{OutcomeRow, ProgressDisplay, RunSummaryView, SessionState};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub session: SessionState,
    pub category: Option<String>,
    pub progress: ProgressDisplay,
    pub completed: usize,
    pub total: usize,
    pub working_count: usize,
    /// Reachable rows in outcome order.
    pub working: Vec<OutcomeRow>,
    /// Unreachable rows in outcome order; empty when the display policy hides them.
    pub not_working: Vec<OutcomeRow>,
    /// Unreachable rows suppressed by the display policy.
    pub hidden_unreachable: usize,
    pub summary: Option<RunSummaryView>,
    pub notice: Option<String>,
    pub can_start: bool,
    pub can_cancel: bool,
    pub dirty: bool,
}

impl AppViewModel {
    pub fn show_working_section(&self) -> bool {
        !self.working.is_empty()
    }

    pub fn show_not_working_section(&self) -> bool {
        !self.not_working.is_empty()
    }
}
