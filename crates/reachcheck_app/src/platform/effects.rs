use std::sync::mpsc;
use std::time::Duration;

use engine_logging::{engine_info, engine_warn};
use reachcheck_core::{Effect, Msg, OutcomeReason, OutcomeRow, RunMode, RunSummaryView};
use reachcheck_engine::{
    ConcurrencyMode, EngineError, EngineEvent, EngineHandle, ProbeOutcome, ProbeReason, RunConfig,
    RunSummary,
};

/// Executes core effects against the engine and feeds engine events back as messages.
pub struct EffectRunner {
    engine: EngineHandle,
    msg_tx: mpsc::Sender<Msg>,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, msg_tx: mpsc::Sender<Msg>) -> Self {
        Self { engine, msg_tx }
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartRun {
                    run_id,
                    category,
                    timeout_ms,
                    mode,
                } => {
                    engine_info!(
                        "StartRun run_id={} category={} timeout_ms={} mode={:?}",
                        run_id,
                        category,
                        timeout_ms,
                        mode
                    );
                    let config = RunConfig::new(category)
                        .with_timeout_ms(timeout_ms)
                        .with_mode(map_mode(mode));
                    if let Err(err) = self.engine.start_run(run_id, config) {
                        engine_warn!("Run {} rejected: {}", run_id, err);
                        let _ = self.msg_tx.send(Msg::RunRejected {
                            run_id,
                            reason: err.to_string(),
                        });
                    }
                }
                Effect::CancelRun { run_id } => {
                    self.engine.cancel(run_id);
                }
            }
        }
    }

    /// Waits up to `timeout` for one engine event and forwards it. Returns whether one arrived.
    pub fn pump(&self, timeout: Duration) -> Result<bool, EngineError> {
        match self.engine.recv_timeout(timeout)? {
            Some(event) => {
                let _ = self.msg_tx.send(map_event(event));
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

fn map_mode(mode: RunMode) -> ConcurrencyMode {
    match mode {
        RunMode::Sequential => ConcurrencyMode::Sequential,
        RunMode::Parallel => ConcurrencyMode::Parallel,
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::RunStarted { run_id, total } => Msg::RunStarted { run_id, total },
        EngineEvent::Outcome { run_id, outcome } => Msg::OutcomeReceived {
            run_id,
            row: map_outcome(outcome),
        },
        EngineEvent::Progress { run_id, progress } => Msg::ProgressReported {
            run_id,
            completed: progress.completed,
            total: progress.total,
        },
        EngineEvent::RunFinished { run_id, summary } => Msg::RunFinished {
            run_id,
            summary: map_summary(&summary),
        },
        EngineEvent::Notice { run_id, message } => Msg::NoticeRaised { run_id, message },
    }
}

fn map_outcome(outcome: ProbeOutcome) -> OutcomeRow {
    OutcomeRow {
        name: outcome.endpoint.name,
        url: outcome.endpoint.url,
        reachable: outcome.reachable,
        reason: match outcome.reason {
            ProbeReason::Ok => OutcomeReason::Ok,
            ProbeReason::Timeout => OutcomeReason::Timeout,
            // Cancelled probes are dropped by the coordinator before they get here.
            ProbeReason::Error | ProbeReason::Cancelled => OutcomeReason::Error,
        },
    }
}

fn map_summary(summary: &RunSummary) -> RunSummaryView {
    RunSummaryView {
        working_count: summary.working_count,
        unreachable_count: summary.unreachable_count,
        total: summary.total,
        cancelled: summary.cancelled,
    }
}
