use thiserror::Error;

/// Error type for token generation.
#[derive(Debug, Clone, Error)]
pub enum TokenError {
    #[error("Random source unavailable: {0}")]
    RandomSourceFailed(String),
}
