//! Configuration loading.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `COLLECTWATCH_*` environment variables (`__` separates nested keys, e.g.
//! `COLLECTWATCH_SOURCE__URL`). Command line flags are applied on top by
//! the binary.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::data::duration::parse_duration;
use crate::data::Thresholds;
use crate::scheduler::OverlapPolicy;
use crate::source::{DashboardSource, EndpointPaths, FileSource, HttpSource, SampleSource};

/// Top-level dashboard configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub source: SourceConfig,
    pub refresh: RefreshConfig,
    pub thresholds: Thresholds,
}

/// Where dashboard data comes from.
///
/// Precedence when several are set: `sample`, then `file`, then `url`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Backend base URL.
    pub url: String,
    /// JSON document to read instead of the backend.
    pub file: Option<PathBuf>,
    /// Serve built-in sample data.
    pub sample: bool,
    /// Per-request timeout, e.g. "10s".
    pub timeout: String,
    pub paths: EndpointPaths,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8000".to_string(),
            file: None,
            sample: false,
            timeout: "10s".to_string(),
            paths: EndpointPaths::default(),
        }
    }
}

/// Refresh loop settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Interval between cycles, e.g. "30s".
    pub interval: String,
    pub overlap: OverlapPolicy,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: "30s".to_string(),
            overlap: OverlapPolicy::Skip,
        }
    }
}

/// Values given on the command line. Set fields replace loaded ones.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub url: Option<String>,
    pub file: Option<PathBuf>,
    pub sample: bool,
    pub refresh: Option<String>,
    pub timeout: Option<String>,
    pub overlap: Option<OverlapPolicy>,
    pub health_nominal: Option<f64>,
    pub health_warning: Option<f64>,
    pub usage_warning: Option<f64>,
    pub usage_critical: Option<f64>,
}

impl DashboardConfig {
    /// Load configuration from an optional file plus the environment.
    ///
    /// The result is not validated, since command line overrides may still
    /// replace bad values. Call [`Self::validate`] once they are applied.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        builder = builder.add_source(
            Environment::with_prefix("COLLECTWATCH")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder
            .build()
            .context("failed to read configuration")?
            .try_deserialize()
            .context("invalid configuration")?;
        Ok(config)
    }

    /// Parse and validate config from a TOML string (e.g. for tests).
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = Config::builder()
            .add_source(File::from_str(s, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply command line values on top of the loaded layers.
    ///
    /// Choosing a source on the command line clears the lower-precedence
    /// sources so the flag actually takes effect.
    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(ref url) = overrides.url {
            self.source.url = url.clone();
            self.source.file = None;
            self.source.sample = false;
        }
        if let Some(ref file) = overrides.file {
            self.source.file = Some(file.clone());
            self.source.sample = false;
        }
        if overrides.sample {
            self.source.sample = true;
        }
        if let Some(ref refresh) = overrides.refresh {
            self.refresh.interval = refresh.clone();
        }
        if let Some(ref timeout) = overrides.timeout {
            self.source.timeout = timeout.clone();
        }
        if let Some(overlap) = overrides.overlap {
            self.refresh.overlap = overlap;
        }

        let thresholds = &mut self.thresholds;
        if let Some(v) = overrides.health_nominal {
            thresholds.health_nominal = v;
        }
        if let Some(v) = overrides.health_warning {
            thresholds.health_warning = v;
        }
        if let Some(v) = overrides.usage_warning {
            thresholds.usage_warning = v;
        }
        if let Some(v) = overrides.usage_critical {
            thresholds.usage_critical = v;
        }
    }

    pub fn validate(&self) -> Result<()> {
        let interval = self.refresh_interval()?;
        anyhow::ensure!(
            !interval.is_zero(),
            "refresh.interval must be > 0, got {}",
            self.refresh.interval
        );
        let timeout = self.request_timeout()?;
        anyhow::ensure!(
            !timeout.is_zero(),
            "source.timeout must be > 0, got {}",
            self.source.timeout
        );
        anyhow::ensure!(
            self.source.sample || self.source.file.is_some() || !self.source.url.is_empty(),
            "source.url must be non-empty when no file or sample source is set"
        );
        self.thresholds.validate()
    }

    pub fn refresh_interval(&self) -> Result<Duration> {
        parse_duration(&self.refresh.interval)
            .with_context(|| format!("invalid refresh.interval: {}", self.refresh.interval))
    }

    pub fn request_timeout(&self) -> Result<Duration> {
        parse_duration(&self.source.timeout)
            .with_context(|| format!("invalid source.timeout: {}", self.source.timeout))
    }

    /// Open the configured source.
    pub fn open_source(&self) -> Result<Arc<dyn DashboardSource>> {
        if self.source.sample {
            return Ok(Arc::new(SampleSource::new()));
        }
        if let Some(ref path) = self.source.file {
            return Ok(Arc::new(FileSource::new(path)));
        }

        let source = HttpSource::builder()
            .endpoint(self.source.url.clone())
            .paths(self.source.paths.clone())
            .timeout(self.request_timeout()?)
            .build()?;
        Ok(Arc::new(source))
    }
}
