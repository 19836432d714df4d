//! Error types for API embedders.

use embedforge_core::EmbedForgeError;
use thiserror::Error;

/// Result type alias for API embedder operations.
pub type Result<T> = std::result::Result<T, ApiEmbedderError>;

/// Errors that can occur when building or calling API embedders.
#[derive(Error, Debug)]
pub enum ApiEmbedderError {
    /// No API key was given and the fallback environment variable is unset
    #[error("No API key provided and {env_var} is not set")]
    MissingApiKey {
        /// Environment variable that was consulted
        env_var: &'static str,
    },

    /// Endpoint could not be parsed as a URL
    #[error("Invalid endpoint '{endpoint}': {message}")]
    InvalidEndpoint {
        /// The rejected endpoint
        endpoint: String,
        /// Error message
        message: String,
    },

    /// Option value the provider does not accept
    #[error("Invalid option: {message}")]
    InvalidOption {
        /// Error message
        message: String,
    },

    /// API authentication error
    #[error("Authentication failed: {message}")]
    Authentication {
        /// Error message
        message: String,
    },

    /// API rate limit exceeded
    #[error("Rate limit exceeded: {message}")]
    RateLimit {
        /// Error message
        message: String,
    },

    /// Network or connection error
    #[error("Network error: {message}")]
    Network {
        /// Error message
        message: String,
    },

    /// API server error
    #[error("Server error: {status_code} - {message}")]
    Server {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },

    /// Response body did not have the expected shape
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// Error message
        message: String,
    },
}

impl ApiEmbedderError {
    /// Create an invalid endpoint error.
    pub fn invalid_endpoint<E: Into<String>, S: Into<String>>(endpoint: E, message: S) -> Self {
        Self::InvalidEndpoint {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Create an invalid option error.
    pub fn invalid_option<S: Into<String>>(message: S) -> Self {
        Self::InvalidOption {
            message: message.into(),
        }
    }

    /// Create a network error.
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create an invalid response error.
    pub fn invalid_response<S: Into<String>>(message: S) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Classify a non-success HTTP response.
    pub fn from_status(status_code: u16, body: String) -> Self {
        match status_code {
            401 | 403 => Self::Authentication { message: body },
            429 => Self::RateLimit { message: body },
            _ => Self::Server {
                status_code,
                message: body,
            },
        }
    }

    /// Convert into the core error raised while constructing a client.
    pub fn into_construction_error(self, provider: &str) -> EmbedForgeError {
        EmbedForgeError::provider_construction(provider, self.to_string())
    }
}

// Convert to embedforge core error
impl From<ApiEmbedderError> for EmbedForgeError {
    fn from(error: ApiEmbedderError) -> Self {
        match error {
            ApiEmbedderError::MissingApiKey { .. }
            | ApiEmbedderError::InvalidEndpoint { .. }
            | ApiEmbedderError::InvalidOption { .. } => Self::configuration(error.to_string()),
            ApiEmbedderError::Authentication { message } => Self::authentication(message),
            ApiEmbedderError::RateLimit { message } => Self::rate_limit(message),
            ApiEmbedderError::Network { message } => {
                Self::embedding(format!("Network error: {message}"))
            }
            ApiEmbedderError::Server {
                status_code,
                message,
            } => Self::embedding(format!("Server error {status_code}: {message}")),
            ApiEmbedderError::InvalidResponse { message } => {
                Self::embedding(format!("Invalid response: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(401 ; "unauthorized")]
    #[test_case(403 ; "forbidden")]
    fn test_auth_statuses(status: u16) {
        let err = ApiEmbedderError::from_status(status, "denied".to_string());
        assert!(matches!(err, ApiEmbedderError::Authentication { .. }));
        assert!(matches!(
            EmbedForgeError::from(err),
            EmbedForgeError::Authentication { .. }
        ));
    }

    #[test]
    fn test_rate_limit_status() {
        let err = ApiEmbedderError::from_status(429, "slow down".to_string());
        assert!(matches!(
            EmbedForgeError::from(err),
            EmbedForgeError::RateLimit { .. }
        ));
    }

    #[test]
    fn test_server_status() {
        let err = ApiEmbedderError::from_status(503, "unavailable".to_string());
        assert_eq!(err.to_string(), "Server error: 503 - unavailable");
    }

    #[test]
    fn test_construction_error_names_provider() {
        let err = ApiEmbedderError::MissingApiKey {
            env_var: "OPENAI_API_KEY",
        }
        .into_construction_error("openai");
        assert_eq!(
            err.to_string(),
            "Failed to construct openai embedding client: No API key provided and OPENAI_API_KEY is not set"
        );
    }
}
