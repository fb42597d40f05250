use std::path::PathBuf;
use std::process::{Command, Stdio};

use super::{Error, RawSample, RecordFormat, Result, Sampler};

/// Samples containers by running `docker stats --no-stream` once per call.
#[derive(Debug, Clone)]
pub struct DockerStatsSampler {
    binary: PathBuf,
    format: RecordFormat,
}

impl DockerStatsSampler {
    /// Creates a sampler invoking the given runtime CLI (e.g. `docker` or `podman`).
    pub fn new(binary: impl Into<PathBuf>, format: RecordFormat) -> Self {
        Self {
            binary: binary.into(),
            format,
        }
    }

    fn args(&self) -> [&'static str; 4] {
        ["stats", "--no-stream", "--format", self.format.template()]
    }

    fn command_line(&self) -> String {
        format!("{} {}", self.binary.display(), self.args().join(" "))
    }
}

impl Default for DockerStatsSampler {
    fn default() -> Self {
        Self::new("docker", RecordFormat::default())
    }
}

impl Sampler for DockerStatsSampler {
    /// Runs the stats query and parses its output.
    ///
    /// # Errors
    ///
    /// - [`Error::Spawn`] if the binary cannot be started.
    /// - [`Error::ExitStatus`] if it exits unsuccessfully, e.g. because the daemon
    ///   is not reachable.
    /// - [`Error::Read`] if its output cannot be read.
    fn sample(&self) -> Result<Vec<RawSample>> {
        log::trace!(target: "sampler", "running `{}`", self.command_line());
        let output = Command::new(&self.binary)
            .args(self.args())
            .stdin(Stdio::null())
            .output()
            .map_err(|source| Error::Spawn {
                command: self.command_line(),
                source,
            })?;

        if !output.status.success() {
            return Err(Error::ExitStatus {
                command: self.command_line(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        super::parse_records(&mut output.stdout.as_slice(), self.format).map_err(|source| {
            Error::Read {
                command: self.command_line(),
                source,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line() {
        let sampler = DockerStatsSampler::default();
        assert_eq!(
            sampler.command_line(),
            "docker stats --no-stream --format {{.Name}},{{.CPUPerc}},{{.MemUsage}}"
        );

        let sampler = DockerStatsSampler::new("/usr/bin/podman", RecordFormat::Json);
        assert_eq!(
            sampler.command_line(),
            "/usr/bin/podman stats --no-stream --format {{json .}}"
        );
    }

    #[test]
    fn test_missing_binary_is_spawn_error() {
        let sampler =
            DockerStatsSampler::new("/definitely/does/not/exist/docker", RecordFormat::Delimited);
        let err = sampler.sample().unwrap_err();
        match err {
            Error::Spawn { command, source } => {
                assert!(command.starts_with("/definitely/does/not/exist/docker stats"));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            _ => panic!("Expected Spawn error"),
        }
    }
}
