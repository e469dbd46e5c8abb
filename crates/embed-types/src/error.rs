//! Unified error taxonomy for embedding operations.

use thiserror::Error;

/// Result alias used throughout the workspace.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while loading models or producing embeddings.
///
/// At the C boundary this taxonomy is flattened to a single
/// message-carrying error object; the variant name survives as the
/// message prefix so callers can still tell the categories apart.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Model code not present in the registry for the requested modality
    #[error("Unsupported model: {0}")]
    UnsupportedModel(String),

    /// Caller-supplied argument rejected before any work was done
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Tokenizer or image decoding failure
    #[error("Preprocessing failed: {0}")]
    Preprocessing(String),

    /// Inference backend failure
    #[error("Executor failed: {0}")]
    Executor(String),

    /// Model artifact could not be acquired or read
    #[error("Artifact acquisition failed: {0}")]
    Artifact(String),
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::Artifact(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_category_prefix() {
        let err = EngineError::UnsupportedModel("no/such-model".to_string());
        assert!(err.to_string().starts_with("Unsupported model:"));

        let err = EngineError::InvalidArgument("batch_size must be >= 1".to_string());
        assert!(err.to_string().contains("batch_size"));
    }

    #[test]
    fn test_io_error_maps_to_artifact() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: EngineError = io.into();
        assert!(matches!(err, EngineError::Artifact(_)));
    }
}
