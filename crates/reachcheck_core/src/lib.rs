//! Reachcheck core: pure run state machine, progress reporter and view-model helpers.
mod effect;
mod msg;
mod progress;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use progress::{progress_percent, ProgressDisplay, ProgressReporter};
pub use state::{
    AppState, DisplayPolicy, OutcomeReason, OutcomeRow, RunId, RunMode, RunSettings,
    RunSummaryView, SessionState, DEFAULT_TIMEOUT_MS,
};
pub use update::update;
pub use view_model::AppViewModel;
