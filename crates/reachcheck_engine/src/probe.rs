use std::time::Duration;

use engine_logging::{engine_debug, engine_info, engine_warn};
use tokio_util::sync::CancellationToken;

use crate::{EngineError, ProbeVerdict};

/// A single liveness check against one URL.
///
/// Implementations never fail: every problem is folded into the verdict.
#[async_trait::async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, url: &str, timeout: Duration, cancel: &CancellationToken)
        -> ProbeVerdict;
}

/// Issues an HTTP `HEAD` request and treats any response, whatever its status, as reachable.
#[derive(Debug, Clone)]
pub struct ReqwestProber {
    client: reqwest::Client,
}

impl ReqwestProber {
    pub fn new() -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(EngineError::HttpClient)?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Prober for ReqwestProber {
    async fn probe(
        &self,
        url: &str,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> ProbeVerdict {
        let parsed = match reqwest::Url::parse(url) {
            Ok(parsed) => parsed,
            Err(err) => {
                engine_warn!("Error checking {}: invalid url: {}", url, err);
                return ProbeVerdict::error();
            }
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                engine_debug!("Probe cancelled for: {}", url);
                ProbeVerdict::cancelled()
            }
            result = self.client.head(parsed).send() => match result {
                Ok(response) => {
                    engine_debug!("Reachable: {} (status {})", url, response.status());
                    ProbeVerdict::ok()
                }
                Err(err) if err.is_timeout() => {
                    engine_info!("Timeout for: {}", url);
                    ProbeVerdict::timeout()
                }
                Err(err) => {
                    engine_warn!("Error checking {}: {}", url, err);
                    ProbeVerdict::error()
                }
            },
            _ = tokio::time::sleep(timeout) => {
                engine_info!("Timeout for: {} after {} ms", url, timeout.as_millis());
                ProbeVerdict::timeout()
            }
        }
    }
}

/// Checks one URL with a fresh client; `true` when anything answered before the deadline.
pub async fn probe(url: &str, timeout_ms: u64) -> bool {
    let prober = match ReqwestProber::new() {
        Ok(prober) => prober,
        Err(err) => {
            engine_warn!("Error checking {}: {}", url, err);
            return false;
        }
    };
    prober
        .probe(url, Duration::from_millis(timeout_ms), &CancellationToken::new())
        .await
        .reachable
}
