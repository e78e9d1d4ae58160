use thiserror::Error;

pub type Result<T> = std::result::Result<T, HelixError>;

#[derive(Debug, Error)]
pub enum HelixError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for HelixError {
    fn from(err: reqwest::Error) -> Self {
        HelixError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for HelixError {
    fn from(err: serde_json::Error) -> Self {
        HelixError::Parse(err.to_string())
    }
}
