use crate::{AppState, Effect, Msg, SessionState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::CategorySelected(category) => {
            let category = category.trim().to_string();
            if state.session() == SessionState::Idle && !category.is_empty() {
                state.select_category(category);
            }
            Vec::new()
        }
        Msg::SettingsChanged(settings) => {
            if state.session() == SessionState::Idle {
                state.apply_settings(settings);
            }
            Vec::new()
        }
        Msg::StartClicked => {
            if state.session() != SessionState::Idle {
                return (state, Vec::new());
            }
            let Some(category) = state.category().map(ToOwned::to_owned) else {
                state.set_notice("Select a category before starting a check.");
                return (state, Vec::new());
            };
            let settings = state.settings();
            let run_id = state.begin_run();
            vec![Effect::StartRun {
                run_id,
                category,
                timeout_ms: settings.timeout_ms,
                mode: settings.mode,
            }]
        }
        Msg::CancelClicked => match (state.session(), state.active_run()) {
            (SessionState::Running, Some(run_id)) => {
                state.request_cancel();
                vec![Effect::CancelRun { run_id }]
            }
            _ => Vec::new(),
        },
        Msg::RunRejected { run_id, reason } => {
            if state.is_active(run_id) {
                state.finish_run(None);
                state.set_notice(reason);
            }
            Vec::new()
        }
        Msg::RunStarted { run_id, total } => {
            if state.is_active(run_id) {
                state.reset_counts(total);
            }
            Vec::new()
        }
        Msg::OutcomeReceived { run_id, row } => {
            if state.is_active(run_id) {
                state.push_row(row);
            }
            Vec::new()
        }
        Msg::ProgressReported {
            run_id,
            completed,
            total,
        } => {
            if state.is_active(run_id) {
                state.apply_progress(completed, total);
            }
            Vec::new()
        }
        Msg::RunFinished { run_id, summary } => {
            if state.is_active(run_id) {
                state.finish_run(Some(summary));
            }
            Vec::new()
        }
        Msg::NoticeRaised { run_id, message } => {
            if state.is_active(run_id) {
                state.set_notice(message);
            }
            Vec::new()
        }
    };

    (state, effects)
}
