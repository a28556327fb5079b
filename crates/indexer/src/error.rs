use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexerError>;

#[derive(Error, Debug)]
pub enum IndexerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Vector store error: {0}")]
    VectorStoreError(#[from] eternal_vector_store::VectorStoreError),

    #[error("Card source error: {0}")]
    SheetsError(#[from] eternal_sheets::SheetsError),

    #[error("Backup failed: {0}")]
    BackupError(String),

    #[error("{0}")]
    Other(String),
}

impl IndexerError {
    /// Connection and timeout failures that are worth another attempt.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::IoError(err) => is_transient_io(err.kind()),
            Self::SheetsError(eternal_sheets::SheetsError::Http(err)) => {
                err.is_timeout() || err.is_connect()
            }
            Self::SheetsError(eternal_sheets::SheetsError::IoError(err)) => {
                is_transient_io(err.kind())
            }
            _ => false,
        }
    }
}

fn is_transient_io(kind: std::io::ErrorKind) -> bool {
    use std::io::ErrorKind;
    matches!(
        kind,
        ErrorKind::TimedOut
            | ErrorKind::ConnectionRefused
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::Interrupted
    )
}
