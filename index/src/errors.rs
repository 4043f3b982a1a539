use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Request error: {0}")]
    Request(String),
    #[error("Index returned HTTP {status_code}: {message}")]
    Http { status_code: u16, message: String },
    #[error("Failed to parse index response: {0}")]
    Parse(String),
    #[error("Index not ready: {0}")]
    NotReady(String),
}

impl IndexError {
    /// True for failures caused by missing or invalid local configuration.
    pub fn is_config(&self) -> bool {
        matches!(self, IndexError::Config(_))
    }
}

pub type IndexResult<T> = Result<T, IndexError>;
