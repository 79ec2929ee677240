use std::process::ExitStatus;

pub type ProvisionResult<T> = Result<T, ProvisionError>;

#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    #[error("environment variable missing: {0}")]
    EnvMissing(String),

    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("request to {url} failed with status {status}: {message}")]
    Api {
        url: String,
        status: u16,
        message: String,
    },

    #[error("operation {operation} finished with status {status}: {message}")]
    OperationFailed {
        operation: String,
        status: String,
        message: String,
    },

    #[error("response is missing field: {0}")]
    MissingField(String),

    #[error("command failed: {command}")]
    CommandFailed { command: String, status: ExitStatus },

    #[error("command not found: {0}")]
    CommandNotFound(String),

    #[error("prerequisite missing: {0}")]
    PrerequisiteMissing(String),

    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
