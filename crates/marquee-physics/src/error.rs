use thiserror::Error;

#[derive(Debug, Error)]
pub enum PhysicsError {
    #[error("Failed to parse text effect config RON: {0}")]
    ConfigParseError(String),

    #[error("Invalid text effect config: {0}")]
    InvalidConfig(String),

    #[error("Fragment/size mismatch: {fragments} fragments but {sizes} measured sizes")]
    SizeMismatch {
        fragments: usize,
        sizes: usize,
    },
}
