use thiserror::Error;

/// Failure reported by a storage backend
#[derive(Error, Debug)]
#[error("storage backend failure: {source}")]
pub struct StoreError {
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
}

impl StoreError {
    /// Wrap any backend error
    pub fn backend<E>(source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self {
            source: source.into(),
        }
    }
}

/// Errors produced by sheet registry and table operations
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Sheet name is required!")]
    InvalidName,

    #[error("Sheet already exists!")]
    AlreadyExists(String),

    #[error("Sheet not found!")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
