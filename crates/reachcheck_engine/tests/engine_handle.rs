mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use common::FakeProber;
use reachcheck_engine::{
    ConcurrencyMode, ConfigError, EndpointDescriptor, EngineError, EngineEvent, EngineHandle,
    ProbeVerdict, Prober, RunConfig, StaticSource,
};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

fn collect_until_finished(engine: &EngineHandle, run_id: u64) -> Vec<EngineEvent> {
    let deadline = Instant::now() + Duration::from_secs(10);
    let mut events = Vec::new();
    while Instant::now() < deadline {
        if let Ok(Some(event)) = engine.recv_timeout(Duration::from_millis(50)) {
            let finished = matches!(&event, EngineEvent::RunFinished { run_id: id, .. } if *id == run_id);
            events.push(event);
            if finished {
                return events;
            }
        }
    }
    panic!("run {run_id} did not finish; got {events:?}");
}

fn source() -> Arc<StaticSource> {
    Arc::new(
        StaticSource::new()
            .with_category(
                "bdix",
                vec![
                    EndpointDescriptor::new("A", "http://a"),
                    EndpointDescriptor::new("B", "http://b"),
                ],
            )
            .with_category("empty", Vec::new()),
    )
}

#[test]
fn invalid_config_fails_fast() {
    let mut engine = EngineHandle::with_prober(source(), Arc::new(FakeProber::new())).unwrap();

    let err = engine
        .start_run(1, RunConfig::new("bdix").with_timeout_ms(0))
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Config(ConfigError::NonPositiveTimeout)
    ));

    let err = engine.start_run(2, RunConfig::new("ftp")).unwrap_err();
    assert_eq!(err.to_string(), "unknown category 'ftp'");
    assert!(matches!(
        engine.recv_timeout(Duration::from_millis(100)),
        Ok(None)
    ));
}

#[test]
fn run_streams_events_and_can_be_restarted() {
    let prober = FakeProber::new()
        .answer("http://a", 1, ProbeVerdict::ok())
        .answer("http://b", 1, ProbeVerdict::timeout());
    let mut engine = EngineHandle::with_prober(source(), Arc::new(prober)).unwrap();

    for run_id in 1..=2 {
        engine.start_run(run_id, RunConfig::new("bdix")).unwrap();
        let events = collect_until_finished(&engine, run_id);
        assert_eq!(events[0], EngineEvent::RunStarted { run_id, total: 2 });
        match events.last() {
            Some(EngineEvent::RunFinished { summary, .. }) => {
                assert_eq!(summary.working_count, 1);
                assert_eq!(summary.total, 2);
                assert_eq!(summary.outcomes.len(), 2);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}

#[test]
fn empty_category_finishes_immediately() {
    let mut engine = EngineHandle::with_prober(source(), Arc::new(FakeProber::new())).unwrap();
    engine.start_run(7, RunConfig::new("empty")).unwrap();

    let events = collect_until_finished(&engine, 7);
    assert_eq!(events.len(), 2);
    assert!(!events
        .iter()
        .any(|event| matches!(event, EngineEvent::Progress { .. })));
}

#[test]
fn cancel_finalizes_a_hanging_run() {
    let prober = FakeProber::new()
        .answer("http://a", 1, ProbeVerdict::ok())
        .answer("http://b", 30_000, ProbeVerdict::ok());
    let mut engine = EngineHandle::with_prober(source(), Arc::new(prober)).unwrap();
    engine
        .start_run(3, RunConfig::new("bdix").with_mode(ConcurrencyMode::Parallel))
        .unwrap();

    std::thread::sleep(Duration::from_millis(100));
    assert!(!engine.cancel(99));
    assert!(engine.cancel(3));

    let events = collect_until_finished(&engine, 3);
    match events.last() {
        Some(EngineEvent::RunFinished { summary, .. }) => {
            assert!(summary.cancelled);
            assert_eq!(summary.outcomes.len(), 1);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn default_prober_checks_real_endpoints() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let server = runtime.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(418))
            .mount(&server)
            .await;
        server
    });

    let source = Arc::new(StaticSource::new().with_category(
        "live",
        vec![
            EndpointDescriptor::new("mock", server.uri()),
            EndpointDescriptor::new("broken", "http://"),
        ],
    ));
    let mut engine = EngineHandle::new(source).unwrap();
    engine
        .start_run(1, RunConfig::new("live").with_timeout_ms(2_000))
        .unwrap();

    let events = collect_until_finished(&engine, 1);
    match events.last() {
        Some(EngineEvent::RunFinished { summary, .. }) => {
            let verdicts: Vec<_> = summary
                .outcomes
                .iter()
                .map(|o| (o.endpoint.name.as_str(), o.reachable))
                .collect();
            assert_eq!(verdicts, vec![("mock", true), ("broken", false)]);
        }
        other => panic!("unexpected {other:?}"),
    }
    drop(runtime);
}

struct PanickingProber;

#[async_trait::async_trait]
impl Prober for PanickingProber {
    async fn probe(
        &self,
        url: &str,
        _timeout: Duration,
        _cancel: &CancellationToken,
    ) -> ProbeVerdict {
        panic!("prober blew up on {url}");
    }
}

#[test]
fn panicking_run_still_finishes() {
    let mut engine = EngineHandle::with_prober(source(), Arc::new(PanickingProber)).unwrap();
    engine.start_run(5, RunConfig::new("bdix")).unwrap();

    let events = collect_until_finished(&engine, 5);
    assert!(events
        .iter()
        .any(|event| matches!(event, EngineEvent::Notice { run_id: 5, .. })));
    match events.last() {
        Some(EngineEvent::RunFinished { summary, .. }) => {
            assert!(summary.cancelled);
            assert!(summary.outcomes.is_empty());
        }
        other => panic!("unexpected {other:?}"),
    }

    // The engine keeps serving later runs.
    engine.start_run(6, RunConfig::new("empty")).unwrap();
    collect_until_finished(&engine, 6);
}
