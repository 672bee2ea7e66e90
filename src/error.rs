use thiserror::Error;

#[derive(Error, Debug)]
pub enum OpsdeckError {
    #[error("duplicate record id '{0}'")]
    DuplicateId(String),

    #[error("invalid record data: {0}")]
    InvalidData(String),

    #[error("invalid status '{0}'")]
    InvalidStatus(String),

    #[error("invalid priority '{0}'")]
    InvalidPriority(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, OpsdeckError>;
