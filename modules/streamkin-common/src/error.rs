use thiserror::Error;

#[derive(Error, Debug)]
pub enum StreamkinError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Channel resolution failed: {0}")]
    Resolution(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
