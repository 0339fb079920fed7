use thiserror::Error;

/// Errors that can occur while mounting the adaptive rendering core.
#[derive(Debug, Error)]
pub enum MarqueeError {
    #[error("Failed to parse adaptive config RON: {0}")]
    ConfigParseError(String),

    #[error("Invalid adaptive config: {0}")]
    InvalidConfig(String),

    #[error("Browser window not available")]
    NoWindow,

    #[error("Document not available")]
    NoDocument,
}
