use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use engine_logging::{engine_info, engine_warn};
use reachcheck_core::{DisplayPolicy, RunMode, RunSettings, DEFAULT_TIMEOUT_MS};
use reachcheck_engine::CategoryLocation;
use serde::{Deserialize, Serialize};
use url::Url;

use super::cli::CheckArgs;

pub(crate) const CONFIG_FILENAME: &str = "reachcheck.ron";
const DEFAULT_CATEGORY: &str = "default";
const DEFAULT_SERVERS_FILE: &str = "servers.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
enum ModeSetting {
    #[default]
    Sequential,
    Parallel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
enum DisplaySetting {
    #[default]
    All,
    ReachableOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
enum LocationSetting {
    File(PathBuf),
    Remote(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
struct PersistedConfig {
    timeout_ms: u64,
    mode: ModeSetting,
    display: DisplaySetting,
    default_category: Option<String>,
    categories: BTreeMap<String, LocationSetting>,
}

impl Default for PersistedConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            mode: ModeSetting::default(),
            display: DisplaySetting::default(),
            default_category: Some(DEFAULT_CATEGORY.to_string()),
            categories: BTreeMap::from([(
                DEFAULT_CATEGORY.to_string(),
                LocationSetting::File(PathBuf::from(DEFAULT_SERVERS_FILE)),
            )]),
        }
    }
}

/// Configuration after relative paths and URLs have been resolved.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AppConfig {
    pub settings: RunSettings,
    pub default_category: Option<String>,
    pub categories: BTreeMap<String, CategoryLocation>,
}

impl AppConfig {
    /// Applies command line overrides on top of the file settings.
    pub fn settings_for(&self, args: &CheckArgs) -> RunSettings {
        RunSettings {
            timeout_ms: args.timeout_ms.unwrap_or(self.settings.timeout_ms),
            mode: args.mode.map(Into::into).unwrap_or(self.settings.mode),
            display: args.display.map(Into::into).unwrap_or(self.settings.display),
        }
    }

    /// Picks the category to check: explicit, configured default, or the only one there is.
    pub fn resolve_category(&self, requested: Option<&str>) -> Result<String> {
        if let Some(category) = requested.or(self.default_category.as_deref()) {
            return Ok(category.to_string());
        }
        let mut names = self.categories.keys();
        match (names.next(), names.next()) {
            (Some(only), None) => Ok(only.clone()),
            (None, _) => bail!("no categories configured"),
            _ => bail!(
                "no category given; choose one of: {}",
                self.category_names().join(", ")
            ),
        }
    }

    pub fn category_names(&self) -> Vec<String> {
        self.categories.keys().cloned().collect()
    }
}

/// Loads the config file.
///
/// An explicit path must exist. Without one, `./reachcheck.ron` is used when
/// present and the built-in default otherwise.
pub(crate) fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(CONFIG_FILENAME),
    };

    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound && explicit.is_none() => {
            engine_info!("No {} found; using built-in defaults", CONFIG_FILENAME);
            return resolve(PersistedConfig::default(), Path::new("."));
        }
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read config {path:?}"));
        }
    };

    let persisted = parse_config(&content).with_context(|| format!("invalid config {path:?}"))?;
    let base_dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    engine_info!("Loaded config from {:?}", path);
    resolve(persisted, base_dir)
}

fn parse_config(content: &str) -> Result<PersistedConfig> {
    Ok(ron::from_str(content)?)
}

fn resolve(persisted: PersistedConfig, base_dir: &Path) -> Result<AppConfig> {
    if persisted.timeout_ms == 0 {
        engine_warn!("Config sets timeout_ms to 0; runs will be rejected");
    }

    let mut categories = BTreeMap::new();
    for (name, location) in persisted.categories {
        let location = match location {
            LocationSetting::File(path) if path.is_relative() => {
                CategoryLocation::File(base_dir.join(path))
            }
            LocationSetting::File(path) => CategoryLocation::File(path),
            LocationSetting::Remote(raw) => CategoryLocation::Remote(
                Url::parse(&raw)
                    .with_context(|| format!("category '{name}' has an invalid url {raw:?}"))?,
            ),
        };
        categories.insert(name, location);
    }

    Ok(AppConfig {
        settings: RunSettings {
            timeout_ms: persisted.timeout_ms,
            mode: match persisted.mode {
                ModeSetting::Sequential => RunMode::Sequential,
                ModeSetting::Parallel => RunMode::Parallel,
            },
            display: match persisted.display {
                DisplaySetting::All => DisplayPolicy::All,
                DisplaySetting::ReachableOnly => DisplayPolicy::ReachableOnly,
            },
        },
        default_category: persisted.default_category,
        categories,
    })
}
