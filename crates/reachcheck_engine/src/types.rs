use std::fmt;

use serde::Deserialize;

pub type RunId = u64;

/// One endpoint to check. Extra fields in the source document are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EndpointDescriptor {
    pub name: String,
    pub url: String,
}

impl EndpointDescriptor {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Why a probe ended the way it did. Only `Ok` means reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeReason {
    Ok,
    Timeout,
    Error,
    /// The run was cancelled before the probe finished.
    Cancelled,
}

impl fmt::Display for ProbeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeReason::Ok => write!(f, "ok"),
            ProbeReason::Timeout => write!(f, "timeout"),
            ProbeReason::Error => write!(f, "error"),
            ProbeReason::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeVerdict {
    pub reachable: bool,
    pub reason: ProbeReason,
}

impl ProbeVerdict {
    pub fn ok() -> Self {
        Self {
            reachable: true,
            reason: ProbeReason::Ok,
        }
    }

    pub fn timeout() -> Self {
        Self::unreachable(ProbeReason::Timeout)
    }

    pub fn error() -> Self {
        Self::unreachable(ProbeReason::Error)
    }

    pub fn cancelled() -> Self {
        Self::unreachable(ProbeReason::Cancelled)
    }

    fn unreachable(reason: ProbeReason) -> Self {
        Self {
            reachable: false,
            reason,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub endpoint: EndpointDescriptor,
    pub reachable: bool,
    pub reason: ProbeReason,
}

impl ProbeOutcome {
    pub fn new(endpoint: EndpointDescriptor, verdict: ProbeVerdict) -> Self {
        Self {
            endpoint,
            reachable: verdict.reachable,
            reason: verdict.reason,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunProgress {
    pub completed: usize,
    pub total: usize,
}

/// Final aggregation of a run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub working_count: usize,
    pub unreachable_count: usize,
    pub total: usize,
    /// Set when the run was cancelled; `outcomes` then holds only finished probes.
    pub cancelled: bool,
    pub outcomes: Vec<ProbeOutcome>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    RunStarted {
        run_id: RunId,
        total: usize,
    },
    Outcome {
        run_id: RunId,
        outcome: ProbeOutcome,
    },
    Progress {
        run_id: RunId,
        progress: RunProgress,
    },
    RunFinished {
        run_id: RunId,
        summary: RunSummary,
    },
    Notice {
        run_id: RunId,
        message: String,
    },
}

impl EngineEvent {
    pub fn run_id(&self) -> RunId {
        match self {
            EngineEvent::RunStarted { run_id, .. }
            | EngineEvent::Outcome { run_id, .. }
            | EngineEvent::Progress { run_id, .. }
            | EngineEvent::RunFinished { run_id, .. }
            | EngineEvent::Notice { run_id, .. } => *run_id,
        }
    }
}
