#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use reachcheck_engine::{EngineEvent, EventSink, ProbeVerdict, Prober};
use tokio_util::sync::CancellationToken;

/// Scripted prober: each URL answers with a fixed verdict after a fixed delay.
#[derive(Default)]
pub struct FakeProber {
    plan: HashMap<String, (Duration, ProbeVerdict)>,
    seen: Mutex<Vec<(String, Duration)>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl FakeProber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, url: &str, delay_ms: u64, verdict: ProbeVerdict) -> Self {
        self.plan
            .insert(url.to_string(), (Duration::from_millis(delay_ms), verdict));
        self
    }

    pub fn seen(&self) -> Vec<(String, Duration)> {
        self.seen.lock().unwrap().clone()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Prober for FakeProber {
    async fn probe(
        &self,
        url: &str,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> ProbeVerdict {
        self.seen.lock().unwrap().push((url.to_string(), timeout));
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        let (delay, verdict) = self
            .plan
            .get(url)
            .copied()
            .unwrap_or((Duration::ZERO, ProbeVerdict::error()));
        let verdict = tokio::select! {
            _ = cancel.cancelled() => ProbeVerdict::cancelled(),
            _ = tokio::time::sleep(delay) => verdict,
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        verdict
    }
}

#[derive(Default, Clone)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<EngineEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub fn progress_pairs(events: &[EngineEvent]) -> Vec<(usize, usize)> {
    events
        .iter()
        .filter_map(|event| match event {
            EngineEvent::Progress { progress, .. } => Some((progress.completed, progress.total)),
            _ => None,
        })
        .collect()
}
