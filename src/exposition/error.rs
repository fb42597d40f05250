#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid metric name `{0}`")]
    InvalidMetricName(String),
    #[error("invalid label name `{0}`")]
    InvalidLabelName(String),
}

pub type Result<T> = std::result::Result<T, Error>;
