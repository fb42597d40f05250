use std::fmt;

use crate::{config, fsutil, sampler};

/// Errors that abort a pass or the whole exporter.
///
/// Per-sample problems never show up here: samples that cannot be classified or
/// converted are dropped inside the pass.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(#[from] config::Error),
    #[error("container runtime unavailable: {0}")]
    RuntimeUnavailable(#[from] sampler::Error),
    #[error("failed to publish metrics: {0}")]
    Publish(#[from] fsutil::PublishError),
    #[error("pass did not run to completion: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("failed to bind metrics endpoint on `{addr}`: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

pub trait ResultOkLogExt<T, E> {
    /// Converts the result into an `Option`, logging the error as a warning
    /// prefixed with the context returned by `context`. The context is only
    /// built for errors.
    fn ok_log<D, F>(self, context: F) -> Option<T>
    where
        D: fmt::Display,
        F: FnOnce() -> D;
}

impl<T, E> ResultOkLogExt<T, E> for std::result::Result<T, E>
where
    E: std::error::Error,
{
    fn ok_log<D, F>(self, context: F) -> Option<T>
    where
        D: fmt::Display,
        F: FnOnce() -> D,
    {
        match self {
            Ok(ok) => Some(ok),
            Err(err) => {
                log::warn!("{}: {err}", context());
                None
            }
        }
    }
}
