use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use engine_logging::{engine_debug, engine_error, engine_info};
use thiserror::Error;
use tokio::sync::mpsc as async_mpsc;
use tokio_util::sync::CancellationToken;

use crate::sink::ChannelEventSink;
use crate::{
    ConfigError, EndpointSource, EngineEvent, EventSink, LoadedEndpoints, Prober, ReqwestProber,
    RunConfig, RunCoordinator, RunId, RunSummary,
};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] io::Error),
    #[error("failed to build http client: {0}")]
    HttpClient(#[source] reqwest::Error),
    #[error("engine thread has stopped")]
    Stopped,
}

enum EngineCommand {
    Run {
        run_id: RunId,
        config: RunConfig,
        cancel: CancellationToken,
    },
}

impl EngineCommand {
    fn run_id(&self) -> RunId {
        match self {
            EngineCommand::Run { run_id, .. } => *run_id,
        }
    }
}

struct ActiveRun {
    run_id: RunId,
    cancel: CancellationToken,
}

/// Front-end handle to the engine thread.
///
/// The thread owns a single-threaded tokio runtime, so every probe of every run
/// is multiplexed on one execution context.
pub struct EngineHandle {
    cmd_tx: async_mpsc::UnboundedSender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    source: Arc<dyn EndpointSource>,
    active: Option<ActiveRun>,
}

impl EngineHandle {
    /// Starts the engine with the default HTTP prober.
    pub fn new(source: Arc<dyn EndpointSource>) -> Result<Self, EngineError> {
        Self::with_prober(source, Arc::new(ReqwestProber::new()?))
    }

    pub fn with_prober(
        source: Arc<dyn EndpointSource>,
        prober: Arc<dyn Prober>,
    ) -> Result<Self, EngineError> {
        let (cmd_tx, mut cmd_rx) = async_mpsc::unbounded_channel::<EngineCommand>();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let coordinator = Arc::new(RunCoordinator::new(prober));
        let thread_source = source.clone();

        thread::Builder::new()
            .name("reachcheck-engine".to_string())
            .spawn(move || {
                runtime.block_on(async move {
                    while let Some(command) = cmd_rx.recv().await {
                        let source = thread_source.clone();
                        let coordinator = coordinator.clone();
                        let sink = ChannelEventSink::new(event_tx.clone());
                        let run_id = command.run_id();
                        let guard_sink = sink.clone();
                        let task = tokio::spawn(async move {
                            handle_command(source.as_ref(), coordinator.as_ref(), command, &sink)
                                .await;
                        });
                        tokio::spawn(async move {
                            if let Err(err) = task.await {
                                finish_aborted_run(run_id, &err, &guard_sink);
                            }
                        });
                    }
                    engine_debug!("Engine command channel closed");
                });
            })?;

        Ok(Self {
            cmd_tx,
            event_rx,
            source,
            active: None,
        })
    }

    /// Validates `config` and starts a run in the background.
    ///
    /// Configuration mistakes are returned here instead of starting a run.
    pub fn start_run(&mut self, run_id: RunId, config: RunConfig) -> Result<(), EngineError> {
        config.validate(self.source.as_ref())?;
        let cancel = CancellationToken::new();
        self.cmd_tx
            .send(EngineCommand::Run {
                run_id,
                config,
                cancel: cancel.clone(),
            })
            .map_err(|_| EngineError::Stopped)?;
        self.active = Some(ActiveRun { run_id, cancel });
        Ok(())
    }

    /// Cancels `run_id` if it is the latest run. Returns whether a token was triggered.
    pub fn cancel(&mut self, run_id: RunId) -> bool {
        match self.active.take() {
            Some(active) if active.run_id == run_id => {
                engine_info!("Cancelling run {}", run_id);
                active.cancel.cancel();
                true
            }
            other => {
                self.active = other;
                false
            }
        }
    }

    /// Waits up to `timeout` for the next event.
    ///
    /// `Ok(None)` means nothing arrived in time; [`EngineError::Stopped`] means the
    /// engine thread is gone and no further events will come.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<EngineEvent>, EngineError> {
        match self.event_rx.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(None),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(EngineError::Stopped),
        }
    }
}

async fn handle_command(
    source: &dyn EndpointSource,
    coordinator: &RunCoordinator,
    command: EngineCommand,
    sink: &ChannelEventSink,
) {
    match command {
        EngineCommand::Run {
            run_id,
            config,
            cancel,
        } => {
            let loaded = tokio::select! {
                loaded = source.load(&config.category) => loaded,
                _ = cancel.cancelled() => LoadedEndpoints::default(),
            };
            if let Some(message) = loaded.notice {
                sink.emit(EngineEvent::Notice { run_id, message });
            }
            let state = coordinator
                .run(run_id, loaded.endpoints, &config, sink, &cancel)
                .await;
            engine_debug!(
                "Run {} returned {} of {} outcomes",
                run_id,
                state.completed(),
                state.total()
            );
        }
    }
}

/// Closes out a run whose task died, so the front end does not wait forever.
fn finish_aborted_run(run_id: RunId, err: &tokio::task::JoinError, sink: &dyn EventSink) {
    engine_error!("Run {} stopped unexpectedly: {}", run_id, err);
    sink.emit(EngineEvent::Notice {
        run_id,
        message: format!("Run {run_id} stopped unexpectedly"),
    });
    sink.emit(EngineEvent::RunFinished {
        run_id,
        summary: RunSummary {
            cancelled: true,
            ..RunSummary::default()
        },
    });
}

#[cfg(test)]
mod tests {
    use std::sync::{mpsc, Arc};
    use std::time::Duration;

    use tokio::sync::mpsc as async_mpsc;

    use super::{EngineError, EngineHandle};
    use crate::StaticSource;

    #[test]
    fn disconnected_event_channel_reports_stopped() {
        let (cmd_tx, _cmd_rx) = async_mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::channel();
        drop(event_tx);
        let engine = EngineHandle {
            cmd_tx,
            event_rx,
            source: Arc::new(StaticSource::new()),
            active: None,
        };

        assert!(matches!(
            engine.recv_timeout(Duration::from_millis(10)),
            Err(EngineError::Stopped)
        ));
    }

    #[test]
    fn quiet_engine_times_out_without_error() {
        let engine = EngineHandle::with_prober(
            Arc::new(StaticSource::new()),
            Arc::new(crate::ReqwestProber::new().unwrap()),
        )
        .unwrap();

        assert!(matches!(
            engine.recv_timeout(Duration::from_millis(10)),
            Ok(None)
        ));
    }
}
