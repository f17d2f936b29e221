use reachcheck_core::{
    AppViewModel, OutcomeReason, OutcomeRow, ProgressDisplay, RunSummaryView, SessionState,
};

/// Turns successive view models into terminal lines, printing only what changed.
pub struct TerminalRenderer {
    last_session: SessionState,
    last_progress: ProgressDisplay,
    last_notice: Option<String>,
    clock: fn() -> String,
}

impl TerminalRenderer {
    pub fn new(clock: fn() -> String) -> Self {
        Self {
            last_session: SessionState::Idle,
            last_progress: ProgressDisplay::Idle,
            last_notice: None,
            clock,
        }
    }

    pub fn render(&mut self, view: &AppViewModel) -> Vec<String> {
        let mut lines = Vec::new();

        if view.notice != self.last_notice {
            if let Some(notice) = &view.notice {
                lines.push(format!("Notice: {notice}"));
            }
            self.last_notice = view.notice.clone();
        }

        match (self.last_session, view.session) {
            (SessionState::Idle, SessionState::Running) => {
                let category = view.category.as_deref().unwrap_or("?");
                lines.push(format!("Checking {category}..."));
                self.last_progress = ProgressDisplay::Idle;
            }
            (SessionState::Running, SessionState::Cancelling) => {
                lines.push("Cancelling...".to_string());
            }
            _ => {}
        }

        if view.session != SessionState::Idle && view.progress != self.last_progress {
            if let ProgressDisplay::Percent(_) = view.progress {
                lines.push(format!(
                    "Progress: {} ({}/{})",
                    view.progress, view.completed, view.total
                ));
            }
            self.last_progress = view.progress;
        }

        if self.last_session != SessionState::Idle && view.session == SessionState::Idle {
            if let Some(summary) = view.summary {
                lines.extend(self.render_results(view, summary));
            }
        }

        self.last_session = view.session;
        lines
    }

    fn render_results(&self, view: &AppViewModel, summary: RunSummaryView) -> Vec<String> {
        let mut lines = Vec::new();
        if summary.total == 0 {
            lines.push("Nothing to check.".to_string());
            return lines;
        }

        if view.show_working_section() {
            lines.push(format!("Working ({}):", view.working.len()));
            lines.extend(view.working.iter().map(format_row));
        }
        if view.show_not_working_section() {
            lines.push(format!("Not Working ({}):", view.not_working.len()));
            lines.extend(view.not_working.iter().map(format_row));
        }
        if view.hidden_unreachable > 0 {
            lines.push(format!(
                "({} unreachable endpoints hidden)",
                view.hidden_unreachable
            ));
        }

        let finished_at = (self.clock)();
        if summary.cancelled {
            lines.push(format!(
                "Cancelled after {} of {} checks: {} reachable, {} unreachable ({finished_at})",
                summary.working_count + summary.unreachable_count,
                summary.total,
                summary.working_count,
                summary.unreachable_count
            ));
        } else {
            lines.push(format!(
                "Result: {} of {} reachable, {} unreachable ({finished_at})",
                summary.working_count, summary.total, summary.unreachable_count
            ));
        }
        lines
    }
}

fn format_row(row: &OutcomeRow) -> String {
    match row.reason {
        OutcomeReason::Ok => format!("  [ OK ] {}  {}", row.name, row.url),
        OutcomeReason::Timeout => format!("  [DOWN] {}  {}  (timeout)", row.name, row.url),
        OutcomeReason::Error => format!("  [DOWN] {}  {}  (error)", row.name, row.url),
    }
}
