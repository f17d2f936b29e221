use std::process::ExitCode;
use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use engine_logging::{engine_debug, engine_info, level_for_verbosity};
use reachcheck_core::{update, AppState, Msg, RunSummaryView, SessionState};
use reachcheck_engine::{CatalogSource, EngineHandle};

use super::cli::{CheckArgs, Cli, Commands};
use super::config::{load_config, AppConfig};
use super::effects::EffectRunner;
use super::logging::{self, LogDestination};
use super::ui::render::TerminalRenderer;

/// Exit status for bad configuration or a run that never started.
pub const EXIT_CONFIG_ERROR: u8 = 2;

const TICK: Duration = Duration::from_millis(75);

pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::initialize(
        LogDestination::from_cli(cli.log_file.as_deref()),
        level_for_verbosity(cli.verbose, cli.quiet),
    );

    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Some(Commands::Categories) => {
            for name in config.category_names() {
                println!("{name}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Check(args)) => Ok(run_checks(&config, &args)?.into()),
        None => Ok(run_checks(&config, &CheckArgs::default())?.into()),
    }
}

fn run_checks(config: &AppConfig, args: &CheckArgs) -> Result<RunStatus> {
    let category = config.resolve_category(args.category.as_deref())?;
    let settings = config.settings_for(args);
    let source = CatalogSource::new(config.categories.clone())?;
    let engine = EngineHandle::new(Arc::new(source))?;

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let mut session = Session {
        state: AppState::with_settings(settings),
        runner: EffectRunner::new(engine, msg_tx),
        renderer: TerminalRenderer::new(now_rfc3339),
    };
    session.dispatch(Msg::CategorySelected(category));

    let budget = args.run_budget_ms.map(Duration::from_millis);
    let mut status = RunStatus::AllReachable;
    for round in 1..=args.repeat {
        engine_debug!("Starting round {} of {}", round, args.repeat);
        session.dispatch(Msg::StartClicked);
        let started = Instant::now();
        let mut cancel_sent = false;

        while session.state.session() != SessionState::Idle {
            if let Some(budget) = budget {
                if !cancel_sent && started.elapsed() >= budget {
                    engine_info!("Run budget of {:?} exhausted; cancelling", budget);
                    session.dispatch(Msg::CancelClicked);
                    cancel_sent = true;
                }
            }
            session
                .runner
                .pump(TICK)
                .context("engine stopped before the run finished")?;
            while let Ok(msg) = msg_rx.try_recv() {
                session.dispatch(msg);
            }
        }

        status = status.max(RunStatus::from_summary(
            session.state.last_summary(),
            session.state.notice(),
        ));
    }

    Ok(status)
}

struct Session {
    state: AppState,
    runner: EffectRunner,
    renderer: TerminalRenderer,
}

impl Session {
    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.enqueue(effects);
        if self.state.consume_dirty() {
            for line in self.renderer.render(&self.state.view()) {
                println!("{line}");
            }
        }
    }
}

/// Worst result seen across rounds, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum RunStatus {
    AllReachable,
    Degraded,
    Rejected,
}

impl RunStatus {
    /// A run that checked nothing because its list failed to load is not a success.
    fn from_summary(summary: Option<RunSummaryView>, notice: Option<&str>) -> Self {
        match summary {
            None => RunStatus::Rejected,
            Some(summary) if summary.cancelled || summary.unreachable_count > 0 => {
                RunStatus::Degraded
            }
            Some(summary) if summary.total == 0 && notice.is_some() => RunStatus::Degraded,
            Some(_) => RunStatus::AllReachable,
        }
    }
}

impl From<RunStatus> for ExitCode {
    fn from(status: RunStatus) -> Self {
        match status {
            RunStatus::AllReachable => ExitCode::SUCCESS,
            RunStatus::Degraded => ExitCode::from(1),
            RunStatus::Rejected => ExitCode::from(EXIT_CONFIG_ERROR),
        }
    }
}

fn now_rfc3339() -> String {
    chrono::Local::now().to_rfc3339()
}
