use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("file is not valid utf-8: {0}")]
    InvalidUtf8(String),

    #[error("path has no file name: {0}")]
    MissingFileName(String),

    #[error("invalid interpreter options: {0}")]
    InvalidOptions(String),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("document not found: {0}")]
    UnknownDocument(String),

    #[error("serialize error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = IngestError> = std::result::Result<T, E>;
