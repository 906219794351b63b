use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("container runtime unavailable: {0}")]
    RuntimeUnavailable(String),

    #[error("container {0} not found")]
    NotFound(String),

    #[error("external tool error: {0}")]
    ExternalTool(String),

    #[error("invalid time format {0:?} (expected YYYY-MM-DD HH:MM:SS)")]
    InvalidTimeFormat(String),

    #[error("log file unavailable: {0}")]
    LogUnavailable(String),

    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, FetchError>;
