use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Vector store error: {0}")]
    VectorStoreError(#[from] eternal_vector_store::VectorStoreError),

    #[error("Card source error: {0}")]
    SheetsError(#[from] eternal_sheets::SheetsError),

    #[error("Semantic index unavailable: {0}")]
    IndexUnavailable(String),

    #[error("Empty query")]
    EmptyQuery,
}
