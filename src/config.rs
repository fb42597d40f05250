//! Exporter configuration from environment variables.
//!
//! | Variable                 | Default                        |
//! |--------------------------|--------------------------------|
//! | `EXPORTER_OUTPUT_PATH`   | `metrics/docker_stats.prom`    |
//! | `EXPORTER_DOCKER_BIN`    | `docker`                       |
//! | `EXPORTER_STATS_FORMAT`  | `delimited`                    |
//! | `EXPORTER_INTERVAL_SECS` | unset (single pass)            |
//! | `EXPORTER_LISTEN_ADDR`   | unset (no HTTP endpoint)       |
//! | `EXPORTER_CPU_METRIC`    | `docker_container_cpu_percent` |
//! | `EXPORTER_MEMORY_METRIC` | `docker_container_memory_mb`   |
//!
//! Empty values are treated as unset.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::exposition::{self, ExpositionConfig, LabelKeys};
use crate::sampler::RecordFormat;

const ENV_PREFIX: &str = "EXPORTER";

const DEFAULT_OUTPUT_PATH: &str = "metrics/docker_stats.prom";
const DEFAULT_DOCKER_BIN: &str = "docker";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid value `{value}` for `{key}`: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
    #[error("`EXPORTER_LISTEN_ADDR` requires `EXPORTER_INTERVAL_SECS` to be set")]
    ListenWithoutInterval,
    #[error(transparent)]
    Exposition(#[from] exposition::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Runtime configuration of the exporter.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the published document.
    pub output_path: PathBuf,
    /// Container runtime CLI used for sampling.
    pub docker_bin: PathBuf,
    /// Record layout requested from the runtime.
    pub stats_format: RecordFormat,
    /// Pass period. `None` runs a single pass and exits.
    pub interval: Option<Duration>,
    /// Address of the HTTP endpoint serving the published document.
    pub listen_addr: Option<SocketAddr>,
    pub exposition: ExpositionConfig,
}

impl Config {
    /// Loads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if any variable holds an invalid value.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads the configuration through `lookup`, which maps a variable name to its
    /// value.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if any variable holds an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |name: &str| {
            let key = format!("{ENV_PREFIX}_{name}");
            lookup(&key).filter(|v| !v.is_empty()).map(|v| (key, v))
        };

        let output_path = get("OUTPUT_PATH")
            .map(|(_, v)| PathBuf::from(v))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH));
        let docker_bin = get("DOCKER_BIN")
            .map(|(_, v)| PathBuf::from(v))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DOCKER_BIN));

        let stats_format = match get("STATS_FORMAT") {
            Some((key, value)) => value.parse::<RecordFormat>().map_err(|err| {
                Error::InvalidValue {
                    reason: err.to_string(),
                    key,
                    value,
                }
            })?,
            None => RecordFormat::default(),
        };

        let interval = get("INTERVAL_SECS")
            .map(|(key, value)| match value.parse::<u64>() {
                Ok(0) => Err(Error::InvalidValue {
                    key,
                    value,
                    reason: "interval must be at least one second".to_owned(),
                }),
                Ok(secs) => Ok(Duration::from_secs(secs)),
                Err(err) => Err(Error::InvalidValue {
                    reason: err.to_string(),
                    key,
                    value,
                }),
            })
            .transpose()?;

        let listen_addr = get("LISTEN_ADDR")
            .map(|(key, value)| {
                value
                    .parse::<SocketAddr>()
                    .map_err(|err| Error::InvalidValue {
                        reason: err.to_string(),
                        key,
                        value,
                    })
            })
            .transpose()?;
        if listen_addr.is_some() && interval.is_none() {
            return Err(Error::ListenWithoutInterval);
        }

        let cpu_metric = get("CPU_METRIC")
            .map(|(_, v)| v)
            .unwrap_or_else(|| exposition::DEFAULT_CPU_METRIC.to_owned());
        let memory_metric = get("MEMORY_METRIC")
            .map(|(_, v)| v)
            .unwrap_or_else(|| exposition::DEFAULT_MEMORY_METRIC.to_owned());
        let exposition = ExpositionConfig::new(cpu_metric, memory_metric, LabelKeys::default())?;

        Ok(Self {
            output_path,
            docker_bin,
            stats_format,
            interval,
            listen_addr,
            exposition,
        })
    }
}
