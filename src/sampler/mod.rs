//! Sampling of raw per-container statistics from the container runtime.
//!
//! A [`Sampler`] takes one snapshot of all running containers per call. The
//! [`DockerStatsSampler`] does so by running `docker stats --no-stream` once and
//! reading one [`RawSample`] per output line. The raw text is not interpreted here;
//! classification and unit conversion happen later in the pass.
mod docker;
mod error;

use std::fmt;
use std::io::BufRead;
use std::str::FromStr;

pub use docker::DockerStatsSampler;
pub use error::{Error, Result};

/// One unparsed statistics record of a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSample {
    /// Container name, e.g. `rest-order-1`.
    pub container_name: String,
    /// CPU usage text, e.g. `12.50%`.
    pub cpu_text: String,
    /// Memory usage text, e.g. `128MiB / 512MiB`.
    pub mem_text: String,
}

impl RawSample {
    pub fn new(
        container_name: impl Into<String>,
        cpu_text: impl Into<String>,
        mem_text: impl Into<String>,
    ) -> Self {
        Self {
            container_name: container_name.into(),
            cpu_text: cpu_text.into(),
            mem_text: mem_text.into(),
        }
    }
}

/// A source of container statistics snapshots.
pub trait Sampler {
    /// Takes a single snapshot of all running containers.
    ///
    /// An empty vector means that no containers are running.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the runtime cannot be queried at all.
    fn sample(&self) -> Result<Vec<RawSample>>;
}

/// Layout of the records printed by the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordFormat {
    /// `name,cpu,memory` per line.
    #[default]
    Delimited,
    /// One JSON object per line, as printed by `--format '{{json .}}'`.
    Json,
}

impl RecordFormat {
    /// The Go template passed to `docker stats --format`.
    pub fn template(&self) -> &'static str {
        match self {
            RecordFormat::Delimited => "{{.Name}},{{.CPUPerc}},{{.MemUsage}}",
            RecordFormat::Json => "{{json .}}",
        }
    }

    fn parse_line(&self, line: &str, lineno: usize) -> Option<RawSample> {
        match self {
            RecordFormat::Delimited => parse_delimited_line(line, lineno),
            RecordFormat::Json => parse_json_line(line, lineno),
        }
    }
}

impl FromStr for RecordFormat {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "delimited" => Ok(RecordFormat::Delimited),
            "json" => Ok(RecordFormat::Json),
            other => Err(Error::UnknownFormat(other.to_owned())),
        }
    }
}

impl fmt::Display for RecordFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordFormat::Delimited => "delimited",
            RecordFormat::Json => "json",
        };
        write!(f, "{name}")
    }
}

/// Reads all records of a stats snapshot.
///
/// Blank lines are ignored. Lines that are not valid UTF-8 or do not fit the
/// record layout are skipped and logged; they never fail the snapshot.
///
/// # Errors
///
/// Returns an `io::Error` if reading from `buf` fails.
pub fn parse_records<R: BufRead>(
    buf: &mut R,
    format: RecordFormat,
) -> std::io::Result<Vec<RawSample>> {
    let mut out = Vec::new();
    let mut line = Vec::new();
    let mut lineno = 0;

    while buf.read_until(b'\n', &mut line)? != 0 {
        lineno += 1;
        let sample = match std::str::from_utf8(&line) {
            Ok(text) if text.trim().is_empty() => None,
            Ok(text) => format.parse_line(text.trim(), lineno),
            Err(err) => {
                log::warn!(target: "sampler", "skipping non UTF-8 record at line {lineno}: {err}");
                None
            }
        };
        out.extend(sample);
        line.clear();
    }

    Ok(out)
}

fn parse_delimited_line(line: &str, lineno: usize) -> Option<RawSample> {
    // memory text may contain spaces and `/`, but never a comma
    let mut fields = line.splitn(3, ',');
    match (fields.next(), fields.next(), fields.next()) {
        (Some(name), Some(cpu), Some(mem)) => Some(RawSample::new(name.trim(), cpu, mem)),
        _ => {
            log::debug!(
                target: "sampler",
                "skipping record with missing fields at line {lineno}: {line:?}"
            );
            None
        }
    }
}

#[derive(Debug, serde::Deserialize)]
struct StatsRecord {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "CPUPerc")]
    cpu_perc: String,
    #[serde(rename = "MemUsage")]
    mem_usage: String,
}

fn parse_json_line(line: &str, lineno: usize) -> Option<RawSample> {
    match serde_json::from_str::<StatsRecord>(line) {
        Ok(record) => Some(RawSample::new(record.name, record.cpu_perc, record.mem_usage)),
        Err(err) => {
            log::warn!(target: "sampler", "skipping invalid JSON record at line {lineno}: {err}");
            None
        }
    }
}
