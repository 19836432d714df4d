//! Error types for locally-run embedders.

use embedforge_core::EmbedForgeError;
use thiserror::Error;

/// Errors raised while building or running a local model.
#[derive(Error, Debug)]
pub enum LocalEmbedderError {
    /// Model name does not match any model the runtime can load
    #[error("Unknown model '{model}'")]
    UnknownModel {
        /// The requested model name
        model: String,
    },

    /// A keyword option had the wrong type or value
    #[error("Invalid value for '{key}': {reason}")]
    InvalidOption {
        /// Option key
        key: String,
        /// What was wrong with it
        reason: String,
    },

    /// Model weights could not be loaded
    #[error("Failed to load model '{model}': {reason}")]
    ModelLoad {
        /// The model that failed to load
        model: String,
        /// The reason for the failure
        reason: String,
    },

    /// Inference failed
    #[error("Failed to generate embeddings: {reason}")]
    Embedding {
        /// The reason for the failure
        reason: String,
    },

    /// Crate was built without a local model runtime
    #[error("Local embeddings require the `fastembed` feature")]
    RuntimeUnavailable,
}

impl LocalEmbedderError {
    /// Create an invalid option error.
    pub fn invalid_option<K: Into<String>, R: Into<String>>(key: K, reason: R) -> Self {
        Self::InvalidOption {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create an embedding error.
    pub fn embedding<S: Into<String>>(reason: S) -> Self {
        Self::Embedding {
            reason: reason.into(),
        }
    }

    /// Convert into the core error raised while constructing a client.
    pub fn into_construction_error(self, provider: &str) -> EmbedForgeError {
        EmbedForgeError::provider_construction(provider, self.to_string())
    }
}

impl From<LocalEmbedderError> for EmbedForgeError {
    fn from(err: LocalEmbedderError) -> Self {
        match err {
            LocalEmbedderError::UnknownModel { .. } | LocalEmbedderError::InvalidOption { .. } => {
                Self::configuration(err.to_string())
            }
            _ => Self::embedding(err.to_string()),
        }
    }
}

/// Result type for local embedder operations.
pub type Result<T> = std::result::Result<T, LocalEmbedderError>;
