//! Error types for embedforge.
//!
//! Every fallible operation in the workspace returns [`EmbedForgeError`]. The
//! variants separate three phases: reading a configuration, constructing a
//! provider client from it, and running embeddings through that client.

use thiserror::Error;

/// Core error type for embedforge.
#[derive(Error, Debug)]
pub enum EmbedForgeError {
    /// The configuration names a provider this crate does not know.
    #[error("Unsupported embedding config type: {provider}")]
    UnsupportedConfiguration {
        /// Tag (or type description) of the rejected configuration
        provider: String,
    },

    /// A provider client refused to be constructed.
    #[error("Failed to construct {provider} embedding client: {message}")]
    ProviderConstruction {
        /// Provider whose constructor failed
        provider: String,
        /// Detailed error message
        message: String,
    },

    /// Configuration validation errors
    #[error("Configuration error: {message}")]
    Configuration {
        /// Detailed error message
        message: String,
    },

    /// JSON conversion errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Embedding generation errors
    #[error("Embedding error: {message}")]
    Embedding {
        /// Detailed error message
        message: String,
    },

    /// Rate limiting errors
    #[error("Rate limit exceeded: {message}")]
    RateLimit {
        /// Detailed error message
        message: String,
    },

    /// Authentication failures
    #[error("Authentication failed: {message}")]
    Authentication {
        /// Detailed error message
        message: String,
    },
}

impl EmbedForgeError {
    /// Create a new unsupported configuration error.
    pub fn unsupported<S: Into<String>>(provider: S) -> Self {
        Self::UnsupportedConfiguration {
            provider: provider.into(),
        }
    }

    /// Create a new provider construction error.
    pub fn provider_construction<P: Into<String>, S: Into<String>>(provider: P, message: S) -> Self {
        Self::ProviderConstruction {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a new configuration error with a message.
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a new embedding error with a message.
    pub fn embedding<S: Into<String>>(message: S) -> Self {
        Self::Embedding {
            message: message.into(),
        }
    }

    /// Create a new rate limit error with a message.
    pub fn rate_limit<S: Into<String>>(message: S) -> Self {
        Self::RateLimit {
            message: message.into(),
        }
    }

    /// Create a new authentication error with a message.
    pub fn authentication<S: Into<String>>(message: S) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Check if this error happened while building a client, as opposed to
    /// while using one.
    #[must_use]
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedConfiguration { .. }
                | Self::ProviderConstruction { .. }
                | Self::Configuration { .. }
        )
    }
}

/// Result type alias used throughout embedforge.
pub type Result<T> = std::result::Result<T, EmbedForgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = EmbedForgeError::embedding("Failed to generate embedding");
        assert!(matches!(err, EmbedForgeError::Embedding { .. }));
        assert_eq!(
            err.to_string(),
            "Embedding error: Failed to generate embedding"
        );
    }

    #[test]
    fn test_unsupported_names_the_tag() {
        let err = EmbedForgeError::unsupported("cohere");
        assert_eq!(err.to_string(), "Unsupported embedding config type: cohere");
    }

    #[test]
    fn test_json_errors_convert() {
        let err: EmbedForgeError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, EmbedForgeError::Serialization(_)));
        assert!(!err.is_construction_error());
    }

    #[test]
    fn test_construction_errors() {
        assert!(EmbedForgeError::unsupported("x").is_construction_error());
        assert!(EmbedForgeError::provider_construction("openai", "no key").is_construction_error());
        assert!(EmbedForgeError::configuration("bad").is_construction_error());
        assert!(!EmbedForgeError::rate_limit("slow down").is_construction_error());
    }
}
