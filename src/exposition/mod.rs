//! Rendering and publishing of the exposition document.
//!
//! Each classified sample becomes two lines in the Prometheus text format, one for
//! CPU and one for memory, in input order:
//!
//! ```text
//! docker_container_cpu_percent{container="rest-order-1",protocol="rest",service="order"} 5
//! docker_container_memory_mb{container="rest-order-1",protocol="rest",service="order"} 100
//! ```
//!
//! Rendering is a pure function of the [`ExpositionConfig`] and the samples, so the
//! same input always yields a byte-identical [`ExposedDocument`]. [`publish`]
//! replaces the document on disk with a single rename, so scrapers never see a
//! partially written file.
mod config;
mod error;

use std::borrow::Cow;
use std::fmt::{self, Write};
use std::path::Path;

pub use config::{DEFAULT_CPU_METRIC, DEFAULT_MEMORY_METRIC, ExpositionConfig, LabelKeys};
pub use error::{Error, Result};

use crate::container::ClassifiedSample;
use crate::fsutil::PublishError;

/// A single `name{labels} value` record.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricLine<'a> {
    pub name: &'a str,
    pub labels: [(&'a str, &'a str); 3],
    pub value: f64,
}

impl fmt::Display for MetricLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)?;
        f.write_char('{')?;
        for (i, (key, value)) in self.labels.iter().enumerate() {
            if i > 0 {
                f.write_char(',')?;
            }
            write!(f, "{key}=\"{}\"", escape_label_value(value))?;
        }
        // `f64` display never uses exponents and round-trips exactly
        write!(f, "}} {}", self.value)
    }
}

/// Returns the metric lines of one sample: CPU first, then memory.
pub fn metric_lines<'a>(
    config: &'a ExpositionConfig,
    sample: &'a ClassifiedSample,
) -> [MetricLine<'a>; 2] {
    let classification = sample.classification();
    let keys = config.labels();
    let labels = [
        (keys.container(), classification.name().as_ref()),
        (keys.protocol(), classification.protocol().as_ref()),
        (keys.service(), classification.service().as_str()),
    ];
    [
        MetricLine {
            name: config.cpu_metric(),
            labels,
            value: sample.measurement().cpu_percent(),
        },
        MetricLine {
            name: config.memory_metric(),
            labels,
            value: sample.measurement().memory_mb(),
        },
    ]
}

/// The rendered text of one complete pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExposedDocument(String);

impl ExposedDocument {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of metric lines in the document.
    pub fn line_count(&self) -> usize {
        self.0.lines().count()
    }
}

impl fmt::Display for ExposedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Renders all samples into a newline-terminated document.
pub fn render(config: &ExpositionConfig, samples: &[ClassifiedSample]) -> ExposedDocument {
    let mut out = String::with_capacity(samples.len() * 2 * 128);
    for sample in samples {
        for line in metric_lines(config, sample) {
            writeln!(out, "{line}").expect("write!() into String to never fail");
        }
    }
    ExposedDocument(out)
}

/// Atomically replaces the document at `path`.
///
/// # Errors
///
/// Returns a [`PublishError`] if the document could not be staged or renamed into
/// place. The previously published document is left untouched in that case.
pub fn publish(
    document: &ExposedDocument,
    path: impl AsRef<Path>,
) -> std::result::Result<(), PublishError> {
    crate::fsutil::write_atomic(path, document.as_bytes())
}

/// Escapes `\`, `"` and line feeds, the only characters the text format requires
/// escaping in label values.
fn escape_label_value(value: &str) -> Cow<'_, str> {
    if !value.contains(['\\', '"', '\n']) {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + 2);
    for c in value.chars() {
        match c {
            '\\' => out.push_str(r"\\"),
            '"' => out.push_str(r#"\""#),
            '\n' => out.push_str(r"\n"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}
