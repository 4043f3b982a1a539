use thiserror::Error;

/// Gemini API errors
#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("API Error: {message} (code: {code}, status: {status})")]
    ApiError {
        code: u16,
        message: String,
        status: String,
    },

    #[error("Configuration Error: {0}")]
    ConfigError(String),

    #[error("Request Error: {0}")]
    RequestError(String),

    #[error("Response Error: {0}")]
    ResponseError(String),

    #[error("Parsing Error: {0}")]
    ParsingError(String),

    #[error("HTTP Error: {status_code} - {message}")]
    HttpError { status_code: u16, message: String },
}

impl GeminiError {
    /// True for failures caused by missing or invalid local configuration.
    pub fn is_config(&self) -> bool {
        matches!(self, GeminiError::ConfigError(_))
    }
}

/// Result type for Gemini operations
pub type GeminiResult<T> = Result<T, GeminiError>;
