use crate::progress::ProgressReporter;
use crate::view_model::AppViewModel;

pub type RunId = u64;

/// Probe deadline used when nothing else is configured.
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Running,
    /// Cancel requested; waiting for the engine to finalize the run.
    Cancelling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// One probe at a time, progress after each.
    #[default]
    Sequential,
    /// Every probe at once, progress only when the batch is done.
    Parallel,
}

/// Whether unreachable endpoints are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayPolicy {
    #[default]
    All,
    ReachableOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeReason {
    Ok,
    Timeout,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeRow {
    pub name: String,
    pub url: String,
    pub reachable: bool,
    pub reason: OutcomeReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSettings {
    pub timeout_ms: u64,
    pub mode: RunMode,
    pub display: DisplayPolicy,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            mode: RunMode::default(),
            display: DisplayPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummaryView {
    pub working_count: usize,
    pub unreachable_count: usize,
    pub total: usize,
    pub cancelled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    session: SessionState,
    settings: RunSettings,
    category: Option<String>,
    last_run_id: RunId,
    active_run: Option<RunId>,
    total: usize,
    completed: usize,
    rows: Vec<OutcomeRow>,
    progress: ProgressReporter,
    last_summary: Option<RunSummaryView>,
    notice: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: RunSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn settings(&self) -> RunSettings {
        self.settings
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn active_run(&self) -> Option<RunId> {
        self.active_run
    }

    pub fn last_summary(&self) -> Option<RunSummaryView> {
        self.last_summary
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn view(&self) -> AppViewModel {
        let working_count = self.rows.iter().filter(|row| row.reachable).count();
        let (working, not_working): (Vec<_>, Vec<_>) =
            self.rows.iter().cloned().partition(|row| row.reachable);
        let (not_working, hidden_unreachable) = match self.settings.display {
            DisplayPolicy::All => (not_working, 0),
            DisplayPolicy::ReachableOnly => (Vec::new(), not_working.len()),
        };

        AppViewModel {
            session: self.session,
            category: self.category.clone(),
            progress: self.progress.last(),
            completed: self.completed,
            total: self.total,
            working_count,
            working,
            not_working,
            hidden_unreachable,
            summary: self.last_summary,
            notice: self.notice.clone(),
            can_start: self.session == SessionState::Idle && self.category.is_some(),
            can_cancel: self.session == SessionState::Running,
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, clearing the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn is_active(&self, run_id: RunId) -> bool {
        self.active_run == Some(run_id)
    }

    pub(crate) fn select_category(&mut self, category: String) {
        self.category = Some(category);
        self.mark_dirty();
    }

    pub(crate) fn apply_settings(&mut self, settings: RunSettings) {
        self.settings = settings;
        self.mark_dirty();
    }

    pub(crate) fn set_notice(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
        self.mark_dirty();
    }

    /// Allocates a run id, clears every trace of the previous run and enters `Running`.
    pub(crate) fn begin_run(&mut self) -> RunId {
        self.last_run_id += 1;
        let run_id = self.last_run_id;
        self.active_run = Some(run_id);
        self.session = SessionState::Running;
        self.reset_counts(0);
        self.last_summary = None;
        self.notice = None;
        self.mark_dirty();
        run_id
    }

    pub(crate) fn reset_counts(&mut self, total: usize) {
        self.total = total;
        self.completed = 0;
        self.rows.clear();
        self.progress.reset();
        self.mark_dirty();
    }

    pub(crate) fn request_cancel(&mut self) {
        self.session = SessionState::Cancelling;
        self.mark_dirty();
    }

    pub(crate) fn push_row(&mut self, row: OutcomeRow) {
        self.rows.push(row);
        self.mark_dirty();
    }

    pub(crate) fn apply_progress(&mut self, completed: usize, total: usize) {
        self.total = total;
        self.completed = completed.min(total);
        self.progress.on_progress(completed, total);
        self.mark_dirty();
    }

    pub(crate) fn finish_run(&mut self, summary: Option<RunSummaryView>) {
        self.session = SessionState::Idle;
        self.active_run = None;
        self.last_summary = summary;
        self.mark_dirty();
    }
}
