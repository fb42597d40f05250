#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid container name: {0:?}")]
    InvalidContainerName(String),
    #[error("container name `{0}` does not follow `<protocol>-<service>`")]
    MissingServiceToken(String),
    #[error("empty protocol token")]
    EmptyProtocol,
    #[error("unknown service: {0}")]
    UnknownService(String),
}
pub type Result<T> = std::result::Result<T, Error>;
