use std::process::ExitStatus;

/// Errors that make the container runtime unavailable for a pass.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` exited with {status}: {stderr}")]
    ExitStatus {
        command: String,
        status: ExitStatus,
        stderr: String,
    },
    #[error("failed to read output of `{command}`: {source}")]
    Read {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unknown stats format `{0}` (expected `delimited` or `json`)")]
    UnknownFormat(String),
}

pub type Result<T> = std::result::Result<T, Error>;
