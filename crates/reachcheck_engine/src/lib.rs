//! Reachcheck engine: liveness probes, endpoint sources and the run coordinator.
mod config;
mod coordinator;
mod engine;
mod probe;
mod sink;
mod source;
mod types;

pub use config::{ConcurrencyMode, ConfigError, RunConfig, DEFAULT_TIMEOUT_MS};
pub use coordinator::{RunCoordinator, RunState};
pub use engine::{EngineError, EngineHandle};
pub use probe::{probe, Prober, ReqwestProber};
pub use sink::{ChannelEventSink, EventSink};
pub use source::{
    CatalogSource, CategoryLocation, EndpointSource, LoadedEndpoints, SourceError, StaticSource,
};
pub use types::{
    EndpointDescriptor, EngineEvent, ProbeOutcome, ProbeReason, ProbeVerdict, RunId, RunProgress,
    RunSummary,
};
