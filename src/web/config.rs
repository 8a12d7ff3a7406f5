use serde::{Deserialize, Deserializer};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::catalog::{CatalogSource, LoadTask, DEFAULT_CATALOG_URL};
use crate::clock::DEFAULT_TICK;
use crate::propagate::{PathSpec, MAX_PATH_SAMPLES};
use crate::scene::{GlobeStyle, SceneStyle};
use crate::selection::PathRule;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub web: WebConfig,
    pub catalog: CatalogConfig,
    pub path: PathConfig,
    pub clock: ClockConfig,
    pub highlight: HighlightConfig,
    pub globe: GlobeStyle,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub url: String,
    /// Local catalog file; takes precedence over `url`.
    pub file: Option<PathBuf>,
    #[serde(deserialize_with = "deserialize_duration")]
    pub timeout: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_CATALOG_URL.to_string(),
            file: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl CatalogConfig {
    pub fn source(&self) -> CatalogSource {
        match &self.file {
            Some(path) => CatalogSource::File(path.clone()),
            None => CatalogSource::Url(self.url.clone()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    #[serde(deserialize_with = "deserialize_duration")]
    pub horizon: Duration,
    #[serde(deserialize_with = "deserialize_duration")]
    pub step: Duration,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            horizon: Duration::from_secs(100 * 60),
            step: Duration::from_secs(5 * 60),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    #[serde(deserialize_with = "deserialize_duration")]
    pub tick: Duration,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self { tick: DEFAULT_TICK }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub pinned_paths: PathRule,
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn from_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.path_spec()?;
        if config.clock.tick.is_zero() {
            return Err(ConfigError::Invalid {
                field: "clock.tick",
                message: "must be greater than zero".into(),
            });
        }
        Ok(config)
    }

    /// Defaults when no file is given.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn path_spec(&self) -> Result<PathSpec, ConfigError> {
        let invalid = |message: String| ConfigError::Invalid {
            field: "path",
            message,
        };
        let horizon = chrono::Duration::from_std(self.path.horizon).map_err(|e| invalid(e.to_string()))?;
        let step = chrono::Duration::from_std(self.path.step).map_err(|e| invalid(e.to_string()))?;
        let spec = PathSpec { horizon, step };
        match spec.sample_count() {
            0 => return Err(invalid("step must be positive and no longer than horizon".into())),
            n if n > MAX_PATH_SAMPLES => {
                return Err(invalid(format!(
                    "horizon/step gives {n} samples, at most {MAX_PATH_SAMPLES} allowed"
                )))
            }
            _ => {}
        }
        Ok(spec)
    }

    pub fn load_task(&self) -> Result<LoadTask, ConfigError> {
        Ok(LoadTask {
            source: self.catalog.source(),
            timeout: self.catalog.timeout,
            path: self.path_spec()?,
        })
    }

    pub fn scene_style(&self) -> SceneStyle {
        SceneStyle {
            globe: self.globe.clone(),
            paths: self.highlight.pinned_paths.clone(),
        }
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(s.trim()).map_err(serde::de::Error::custom)
}
