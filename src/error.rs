use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueueStatusError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Feed request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML decode error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("No pipeline named '{0}' in the status feed")]
    QueueNotFound(String),

    #[error("Resource pool '{0}' is missing from the capacity feed")]
    MissingPool(String),

    #[error("Resource pool '{0}' has no max-servers value")]
    MissingMaxServers(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, QueueStatusError>;
