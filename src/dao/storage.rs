use std::error::Error;

use thiserror::Error;

/// Result of a match store operation.
pub type StorageResult<T> = Result<T, StorageError>;

/// What the services see of a backend failure.
///
/// Backends keep their own error enums and fold them into one of these two
/// cases: either the write broke a uniqueness rule, or the store could not
/// serve the request at all.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not be reached or answered with an error.
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// Summary safe to log.
        message: String,
        /// Backend error behind the failure.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// A uniqueness rule was broken, such as a taken username.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl StorageError {
    /// Wrap a backend error as [`StorageError::Unavailable`].
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_keeps_the_backend_error_as_source() {
        let err = StorageError::unavailable(
            "load match".into(),
            std::io::Error::other("connection reset"),
        );
        assert!(!matches!(err, StorageError::Conflict(_)));
        assert_eq!(err.to_string(), "storage unavailable: load match");
        assert_eq!(
            err.source().map(ToString::to_string).as_deref(),
            Some("connection reset")
        );
    }

    #[test]
    fn conflicts_carry_their_message() {
        let err = StorageError::Conflict("username taken".into());
        assert_eq!(err.to_string(), "conflict: username taken");
        assert!(err.source().is_none());
    }
}
