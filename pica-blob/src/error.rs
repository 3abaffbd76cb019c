use pica_core::PicaError;
use thiserror::Error;

/// Result type for blob operations
pub type BlobResult<T> = Result<T, BlobError>;

/// Errors that can occur during blob operations
#[derive(Error, Debug)]
pub enum BlobError {
    #[error("Blob not found: {path}")]
    NotFound { path: String },

    #[error("Invalid request: {message}")]
    Invalid { message: String },

    #[error("Storage backend error: {source}")]
    Backend {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl BlobError {
    /// Create a backend error from any error type
    pub fn backend<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend {
            source: Box::new(error),
        }
    }

    /// Create an invalid request error
    pub fn invalid<S: Into<String>>(message: S) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found<S: Into<String>>(path: S) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<BlobError> for PicaError {
    fn from(err: BlobError) -> Self {
        let message = err.to_string();
        let classified = match &err {
            BlobError::NotFound { .. } => PicaError::not_found(message),
            BlobError::Invalid { .. } => PicaError::invalid_image(message),
            BlobError::Backend { .. } | BlobError::Io { .. } => {
                PicaError::storage_unavailable(message)
            }
        };
        classified.with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pica_core::ErrorKind;

    #[test]
    fn blob_errors_are_classified() {
        let missing: PicaError = BlobError::not_found("c1/x/a.png").into();
        assert_eq!(missing.kind, ErrorKind::NotFound);

        let too_big: PicaError = BlobError::invalid("too big").into();
        assert_eq!(too_big.kind, ErrorKind::InvalidImage);

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let down: PicaError = BlobError::from(io).into();
        assert_eq!(down.kind, ErrorKind::StorageUnavailable);
    }
}
