use std::sync::Arc;

use engine_logging::{engine_debug, engine_info};
use futures_util::future::join_all;
use tokio_util::sync::CancellationToken;

use crate::{
    ConcurrencyMode, EndpointDescriptor, EngineEvent, EventSink, Prober, ProbeOutcome,
    ProbeReason, RunConfig, RunId, RunProgress, RunSummary,
};

/// Counters and outcomes of one run. Only the coordinator mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunState {
    total: usize,
    completed: usize,
    working_count: usize,
    outcomes: Vec<ProbeOutcome>,
}

impl RunState {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn working_count(&self) -> usize {
        self.working_count
    }

    pub fn unreachable_count(&self) -> usize {
        self.completed - self.working_count
    }

    pub fn outcomes(&self) -> &[ProbeOutcome] {
        &self.outcomes
    }

    pub fn is_complete(&self) -> bool {
        self.completed == self.total
    }

    pub fn progress(&self) -> RunProgress {
        RunProgress {
            completed: self.completed,
            total: self.total,
        }
    }

    pub fn summary(&self, cancelled: bool) -> RunSummary {
        RunSummary {
            working_count: self.working_count,
            unreachable_count: self.unreachable_count(),
            total: self.total,
            cancelled,
            outcomes: self.outcomes.clone(),
        }
    }

    fn record(&mut self, outcome: ProbeOutcome) {
        debug_assert!(self.completed < self.total, "more outcomes than descriptors");
        if outcome.reachable {
            self.working_count += 1;
        }
        self.completed += 1;
        self.outcomes.push(outcome);
    }
}

/// Probes a descriptor list and reports outcomes and progress to a sink.
pub struct RunCoordinator {
    prober: Arc<dyn Prober>,
}

impl RunCoordinator {
    pub fn new(prober: Arc<dyn Prober>) -> Self {
        Self { prober }
    }

    /// Runs one full check cycle and returns the final state.
    ///
    /// Every call starts from a fresh [`RunState`]. Cancelling `cancel` aborts
    /// the outstanding probes; the returned state then holds only the outcomes
    /// that finished first.
    pub async fn run(
        &self,
        run_id: RunId,
        descriptors: Vec<EndpointDescriptor>,
        config: &RunConfig,
        sink: &dyn EventSink,
        cancel: &CancellationToken,
    ) -> RunState {
        let mut state = RunState::new(descriptors.len());
        sink.emit(EngineEvent::RunStarted {
            run_id,
            total: state.total(),
        });

        if descriptors.is_empty() {
            engine_info!("Run {}: nothing to check", run_id);
            sink.emit(EngineEvent::RunFinished {
                run_id,
                summary: state.summary(cancel.is_cancelled()),
            });
            return state;
        }

        engine_info!(
            "Run {}: checking {} endpoints ({:?}, timeout {} ms)",
            run_id,
            state.total(),
            config.mode,
            config.timeout_ms
        );

        let cancelled = match config.mode {
            ConcurrencyMode::Sequential => {
                self.run_sequential(run_id, descriptors, config, sink, cancel, &mut state)
                    .await
            }
            ConcurrencyMode::Parallel => {
                self.run_parallel(run_id, descriptors, config, sink, cancel, &mut state)
                    .await
            }
        };

        engine_info!(
            "Run {} {}: {}/{} reachable",
            run_id,
            if cancelled { "cancelled" } else { "finished" },
            state.working_count(),
            state.total()
        );
        sink.emit(EngineEvent::RunFinished {
            run_id,
            summary: state.summary(cancelled),
        });
        state
    }

    /// Returns whether the run was cancelled.
    async fn run_sequential(
        &self,
        run_id: RunId,
        descriptors: Vec<EndpointDescriptor>,
        config: &RunConfig,
        sink: &dyn EventSink,
        cancel: &CancellationToken,
        state: &mut RunState,
    ) -> bool {
        for endpoint in descriptors {
            if cancel.is_cancelled() {
                return true;
            }
            let verdict = self
                .prober
                .probe(&endpoint.url, config.timeout(), cancel)
                .await;
            if verdict.reason == ProbeReason::Cancelled {
                return true;
            }
            let outcome = ProbeOutcome::new(endpoint, verdict);
            state.record(outcome.clone());
            sink.emit(EngineEvent::Outcome { run_id, outcome });
            sink.emit(EngineEvent::Progress {
                run_id,
                progress: state.progress(),
            });
        }
        false
    }

    /// Returns whether the run was cancelled.
    async fn run_parallel(
        &self,
        run_id: RunId,
        descriptors: Vec<EndpointDescriptor>,
        config: &RunConfig,
        sink: &dyn EventSink,
        cancel: &CancellationToken,
        state: &mut RunState,
    ) -> bool {
        let timeout = config.timeout();
        // join_all yields verdicts in input order, whatever order the probes finish in.
        let verdicts = join_all(
            descriptors
                .iter()
                .map(|endpoint| self.prober.probe(&endpoint.url, timeout, cancel)),
        )
        .await;

        let mut cancelled = false;
        for (endpoint, verdict) in descriptors.into_iter().zip(verdicts) {
            if verdict.reason == ProbeReason::Cancelled {
                engine_debug!("Run {}: dropping cancelled probe for {}", run_id, endpoint.url);
                cancelled = true;
                continue;
            }
            let outcome = ProbeOutcome::new(endpoint, verdict);
            state.record(outcome.clone());
            sink.emit(EngineEvent::Outcome { run_id, outcome });
        }
        sink.emit(EngineEvent::Progress {
            run_id,
            progress: state.progress(),
        });
        cancelled
    }
}
