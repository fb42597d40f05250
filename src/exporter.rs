use std::path::{Path, PathBuf};

use crate::container::{self, ClassifiedSample};
use crate::error::{Result, ResultOkLogExt};
use crate::exposition::{self, ExposedDocument, ExpositionConfig};
use crate::sampler::{RawSample, Sampler};
use crate::stats;

/// Counts of what happened to the records of one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PassReport {
    /// Records returned by the sampler.
    pub sampled: usize,
    /// Records whose container name does not follow the naming convention.
    pub rejected: usize,
    /// Classified records dropped because a reading could not be converted.
    pub dropped: usize,
    /// Samples written to the published document.
    pub exported: usize,
}

/// Classifies and converts raw records, keeping their order.
///
/// Records with unrecognized names are skipped silently and records with
/// unconvertible readings are skipped with a warning; neither affects the other
/// records.
pub fn collect(raw: Vec<RawSample>) -> (Vec<ClassifiedSample>, PassReport) {
    let mut report = PassReport {
        sampled: raw.len(),
        ..PassReport::default()
    };
    let mut out = Vec::with_capacity(raw.len());

    for sample in raw {
        let Some(classification) = container::classify(&sample.container_name) else {
            report.rejected += 1;
            continue;
        };

        let converted = stats::convert(&sample.cpu_text, &sample.mem_text)
            .ok_log(|| format!("dropping sample of `{}`", sample.container_name));
        match converted {
            Some(measurement) => out.push(ClassifiedSample::new(classification, measurement)),
            None => report.dropped += 1,
        }
    }

    report.exported = out.len();
    (out, report)
}

/// Runs complete passes: sample, classify, convert, render and publish.
///
/// The exporter holds no state between passes.
#[derive(Debug)]
pub struct Exporter<S> {
    sampler: S,
    exposition: ExpositionConfig,
    output_path: PathBuf,
}

impl<S: Sampler> Exporter<S> {
    pub fn new(sampler: S, exposition: ExpositionConfig, output_path: impl Into<PathBuf>) -> Self {
        Self {
            sampler,
            exposition,
            output_path: output_path.into(),
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Samples the runtime and renders the document, without publishing it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::RuntimeUnavailable`] if sampling fails.
    pub fn render_pass(&self) -> Result<(ExposedDocument, PassReport)> {
        let raw = self.sampler.sample()?;
        let (samples, report) = collect(raw);
        Ok((exposition::render(&self.exposition, &samples), report))
    }

    /// Runs one pass and publishes its document.
    ///
    /// If sampling or publishing fails, the previously published document stays in
    /// place.
    ///
    /// # Errors
    ///
    /// - [`crate::error::Error::RuntimeUnavailable`] if the runtime cannot be queried.
    /// - [`crate::error::Error::Publish`] if the document cannot be published.
    pub fn run_pass(&self) -> Result<PassReport> {
        let before = std::time::Instant::now();
        let (document, report) = self.render_pass()?;
        exposition::publish(&document, &self.output_path)?;
        log::trace!("run_pass() took {} microseconds", before.elapsed().as_micros());

        log::info!(
            "published {} samples to `{}` (sampled={}, rejected={}, dropped={})",
            report.exported,
            self.output_path.display(),
            report.sampled,
            report.rejected,
            report.dropped
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::Error;
    use crate::sampler;

    struct StaticSampler(Vec<RawSample>);

    impl Sampler for StaticSampler {
        fn sample(&self) -> sampler::Result<Vec<RawSample>> {
            Ok(self.0.clone())
        }
    }

    struct FailingSampler(AtomicUsize);

    impl Sampler for FailingSampler {
        fn sample(&self) -> sampler::Result<Vec<RawSample>> {
            self.0.fetch_add(1, Ordering::Relaxed);
            Err(sampler::Error::Spawn {
                command: "docker stats --no-stream".to_owned(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
        }
    }

    fn raw(name: &str, cpu: &str, mem: &str) -> RawSample {
        RawSample::new(name, cpu, mem)
    }

    #[test]
    fn test_collect_drops_only_bad_samples() {
        let (samples, report) = collect(vec![
            raw("rest-order-1", "5.0%", "100MiB / 200MiB"),
            raw("grpc-payment", "abc%", "100MiB / 200MiB"),
        ]);

        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].classification().name().as_ref(), "rest-order-1");
        assert_eq!(
            report,
            PassReport {
                sampled: 2,
                rejected: 0,
                dropped: 1,
                exported: 1,
            }
        );
    }

    #[test]
    fn test_collect_empty() {
        let (samples, report) = collect(Vec::new());
        assert!(samples.is_empty());
        assert_eq!(report, PassReport::default());
    }

    #[test]
    fn test_pass_end_to_end() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let path = tmp.path().join("docker_stats.prom");
        let exporter = Exporter::new(
            StaticSampler(vec![
                raw("rest-order-1", "5.0%", "100MiB / 200MiB"),
                raw("NAME", "0%", "0MiB / 0MiB"),
                raw("kafka-broker", "1%", "50MiB / 100MiB"),
            ]),
            ExpositionConfig::default(),
            &path,
        );

        let report = exporter.run_pass().unwrap();

        assert_eq!(
            report,
            PassReport {
                sampled: 3,
                rejected: 2,
                dropped: 0,
                exported: 1,
            }
        );
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "docker_container_cpu_percent{container=\"rest-order-1\",protocol=\"rest\",service=\"order\"} 5\n\
             docker_container_memory_mb{container=\"rest-order-1\",protocol=\"rest\",service=\"order\"} 100\n"
        );
    }

    #[test]
    fn test_pass_is_idempotent() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let path = tmp.path().join("docker_stats.prom");
        let exporter = Exporter::new(
            StaticSampler(vec![
                raw("grpc-notification-1", "0.35%", "80.5MiB / 1GiB"),
                raw("jsonrpc-order", "12.25%", "200MiB / 1GiB"),
                raw("rest-payment", "3%", "1.2GiB / 2GiB"),
            ]),
            ExpositionConfig::default(),
            &path,
        );

        exporter.run_pass().unwrap();
        let first = std::fs::read(&path).unwrap();
        exporter.run_pass().unwrap();
        let second = std::fs::read(&path).unwrap();

        assert_eq!(first, second);
        assert_eq!(String::from_utf8(first).unwrap().lines().count(), 4);
    }

    #[test]
    fn test_pass_with_no_containers_publishes_empty_document() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let path = tmp.path().join("docker_stats.prom");
        std::fs::write(&path, "stale 1\n").unwrap();

        let exporter =
            Exporter::new(StaticSampler(Vec::new()), ExpositionConfig::default(), &path);
        exporter.run_pass().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_runtime_failure_keeps_previous_document() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let path = tmp.path().join("docker_stats.prom");
        std::fs::write(&path, "previous 1\n").unwrap();

        let exporter = Exporter::new(
            FailingSampler(AtomicUsize::new(0)),
            ExpositionConfig::default(),
            &path,
        );
        let err = exporter.run_pass().unwrap_err();

        assert!(matches!(err, Error::RuntimeUnavailable(_)));
        assert_eq!(exporter.sampler.0.load(Ordering::Relaxed), 1);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "previous 1\n");
    }

    #[test]
    fn test_publish_failure_is_reported() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let path = tmp.path().join("no-such-dir").join("docker_stats.prom");
        let exporter = Exporter::new(
            StaticSampler(vec![raw("rest-order", "1%", "1MiB / 1GiB")]),
            ExpositionConfig::default(),
            &path,
        );

        let err = exporter.run_pass().unwrap_err();
        assert!(matches!(err, Error::Publish(_)));
    }
}
