use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("No access token found")]
    Unauthenticated,

    #[error("API request failed with status {0}")]
    RequestFailed(u16),

    #[error("{0}")]
    LoginFailed(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid course id: {0}")]
    InvalidCourseId(String),

    #[error("Cutoff must be between 50 and 100, got {0}")]
    InvalidCutoff(u32),
}

impl AppError {
    /// True for failures that mean the user has to log in again.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, AppError::Unauthenticated | AppError::RequestFailed(401))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::Decode(err.to_string())
        } else {
            AppError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decode(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}
