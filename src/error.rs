use thiserror::Error;

#[derive(Error, Debug)]
pub enum TcrError {
    #[error("Invalid mapping definition: {0}")]
    InvalidMapping(String),

    #[error("Invalid raw input map: {0}")]
    InvalidRawInputs(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TcrError>;
