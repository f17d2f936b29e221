use std::time::Duration;

use thiserror::Error;

use crate::EndpointSource;

/// Probe deadline used when the caller does not choose one.
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConcurrencyMode {
    /// Probes run one at a time; progress after every probe.
    #[default]
    Sequential,
    /// Probes run all at once; progress once the whole batch is done.
    Parallel,
}

/// Settings for one run. Immutable once the run has started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub timeout_ms: u64,
    pub mode: ConcurrencyMode,
    pub category: String,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("probe timeout must be greater than zero")]
    NonPositiveTimeout,
    #[error("no category selected")]
    EmptyCategory,
    #[error("unknown category '{0}'")]
    UnknownCategory(String),
}

impl RunConfig {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            mode: ConcurrencyMode::default(),
            category: category.into(),
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_mode(mut self, mode: ConcurrencyMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Checks the configuration before a run starts.
    ///
    /// These are caller mistakes, reported as errors rather than folded into a
    /// reachability verdict.
    pub fn validate(&self, source: &dyn EndpointSource) -> Result<(), ConfigError> {
        if self.timeout_ms == 0 {
            return Err(ConfigError::NonPositiveTimeout);
        }
        if self.category.trim().is_empty() {
            return Err(ConfigError::EmptyCategory);
        }
        if !source.contains(&self.category) {
            return Err(ConfigError::UnknownCategory(self.category.clone()));
        }
        Ok(())
    }
}
