use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use engine_logging::{engine_error, engine_info};
use thiserror::Error;
use url::Url;

use crate::{EndpointDescriptor, EngineError};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("unknown category '{0}'")]
    UnknownCategory(String),
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("endpoint list is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to fetch endpoint list: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("endpoint list request returned http status {0}")]
    HttpStatus(u16),
}

/// Result of [`EndpointSource::load`]: the endpoints, or nothing plus a notice for the user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadedEndpoints {
    pub endpoints: Vec<EndpointDescriptor>,
    pub notice: Option<String>,
}

/// Supplies the ordered endpoint list for a category.
#[async_trait::async_trait]
pub trait EndpointSource: Send + Sync {
    /// Known category names, sorted.
    fn categories(&self) -> Vec<String>;

    fn contains(&self, category: &str) -> bool {
        self.categories().iter().any(|known| known == category)
    }

    async fn try_load(&self, category: &str) -> Result<Vec<EndpointDescriptor>, SourceError>;

    /// Like [`try_load`](Self::try_load), but a failure becomes an empty list and a notice.
    async fn load(&self, category: &str) -> LoadedEndpoints {
        match self.try_load(category).await {
            Ok(endpoints) => {
                engine_info!(
                    "Loaded {} endpoints for category '{}'",
                    endpoints.len(),
                    category
                );
                LoadedEndpoints {
                    endpoints,
                    notice: None,
                }
            }
            Err(err) => {
                engine_error!("Error loading category '{}': {}", category, err);
                LoadedEndpoints {
                    endpoints: Vec::new(),
                    notice: Some(format!(
                        "Could not load the server list for '{category}': {err}"
                    )),
                }
            }
        }
    }
}

/// In-memory categories.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    categories: BTreeMap<String, Vec<EndpointDescriptor>>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(
        mut self,
        name: impl Into<String>,
        endpoints: Vec<EndpointDescriptor>,
    ) -> Self {
        self.categories.insert(name.into(), endpoints);
        self
    }
}

#[async_trait::async_trait]
impl EndpointSource for StaticSource {
    fn categories(&self) -> Vec<String> {
        self.categories.keys().cloned().collect()
    }

    async fn try_load(&self, category: &str) -> Result<Vec<EndpointDescriptor>, SourceError> {
        self.categories
            .get(category)
            .cloned()
            .ok_or_else(|| SourceError::UnknownCategory(category.to_string()))
    }
}

/// Where a category's JSON endpoint list lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryLocation {
    File(PathBuf),
    Remote(Url),
}

/// Categories backed by JSON documents on disk or behind a URL.
#[derive(Debug, Clone)]
pub struct CatalogSource {
    categories: BTreeMap<String, CategoryLocation>,
    client: reqwest::Client,
}

impl CatalogSource {
    pub fn new(categories: BTreeMap<String, CategoryLocation>) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(EngineError::HttpClient)?;
        Ok(Self { categories, client })
    }

    pub fn location(&self, category: &str) -> Option<&CategoryLocation> {
        self.categories.get(category)
    }

    async fn fetch_remote(&self, url: &Url) -> Result<Vec<u8>, SourceError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::HttpStatus(status.as_u16()));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait::async_trait]
impl EndpointSource for CatalogSource {
    fn categories(&self) -> Vec<String> {
        self.categories.keys().cloned().collect()
    }

    fn contains(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }

    async fn try_load(&self, category: &str) -> Result<Vec<EndpointDescriptor>, SourceError> {
        let location = self
            .location(category)
            .ok_or_else(|| SourceError::UnknownCategory(category.to_string()))?;
        let raw = match location {
            CategoryLocation::File(path) => {
                tokio::fs::read(path)
                    .await
                    .map_err(|source| SourceError::Io {
                        path: path.clone(),
                        source,
                    })?
            }
            CategoryLocation::Remote(url) => self.fetch_remote(url).await?,
        };
        Ok(serde_json::from_slice(&raw)?)
    }
}
