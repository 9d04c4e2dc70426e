use thiserror::Error;

pub type SealboxResult<T> = Result<T, SealboxError>;

#[derive(Debug, Error)]
pub enum SealboxError {
    /// Fatal: the key file is missing, unreadable, or not exactly 32 bytes.
    /// No assets are processed when this is raised.
    #[error("key material error: {0}")]
    KeyMaterial(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("manifest error: {0}")]
    Manifest(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
