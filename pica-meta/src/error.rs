use pica_core::PicaError;
use thiserror::Error;

/// Result type for metadata operations
pub type MetaResult<T> = Result<T, MetaError>;

#[derive(Error, Debug)]
pub enum MetaError {
    #[error("Record already exists: {0}")]
    Duplicate(String),

    #[error("Metadata backend error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Stored document is unreadable: {0}")]
    Document(#[from] serde_json::Error),
}

impl From<MetaError> for PicaError {
    fn from(err: MetaError) -> Self {
        let message = err.to_string();
        let classified = match &err {
            MetaError::Duplicate(_) => PicaError::general_error(message),
            MetaError::Database(_) | MetaError::Document(_) => PicaError::store_unavailable(message),
        };
        classified.with_source(err)
    }
}
