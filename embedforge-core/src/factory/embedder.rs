//! Factory for creating embedders from configuration.

use std::sync::Arc;

use crate::{
    Result,
    config::{EmbeddingConfig, EmbeddingProvider},
    traits::Embedder,
};

/// Factory for creating embedders from configuration.
///
/// Construction is synchronous: API clients only assemble an HTTP client,
/// and local clients defer loading model weights until first use.
///
/// # Examples
///
/// ```rust,no_run
/// use embedforge_core::config::{EmbeddingConfig, EmbeddingProvider};
/// use embedforge_core::factory::EmbedderFactory;
/// use embedforge_core::traits::Embedder;
/// use embedforge_core::{EmbedForgeError, Result};
/// use std::sync::Arc;
///
/// #[derive(Debug)]
/// struct OpenAiOnlyFactory;
///
/// impl EmbedderFactory for OpenAiOnlyFactory {
///     fn create_embedder(&self, config: &EmbeddingConfig) -> Result<Arc<dyn Embedder>> {
///         Err(EmbedForgeError::unsupported(config.provider().as_str()))
///     }
///
///     fn supported_types(&self) -> Vec<EmbeddingProvider> {
///         vec![EmbeddingProvider::OpenAi]
///     }
/// }
/// ```
pub trait EmbedderFactory: Send + Sync + std::fmt::Debug {
    /// Create an embedder from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, targets a provider
    /// this factory does not support, or the provider client fails to
    /// construct.
    fn create_embedder(&self, config: &EmbeddingConfig) -> Result<Arc<dyn Embedder>>;

    /// Get the providers this factory can build.
    fn supported_types(&self) -> Vec<EmbeddingProvider>;

    /// Check if this factory can create an embedder for the given configuration.
    fn can_create(&self, config: &EmbeddingConfig) -> bool {
        self.supported_types().contains(&config.provider())
    }

    /// Get a human-readable name for this factory.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Validate the configuration without creating the embedder.
    fn validate_config(&self, config: &EmbeddingConfig) -> Result<()> {
        config.validate()
    }

    /// Get metadata about this factory.
    fn metadata(&self) -> std::collections::HashMap<String, serde_json::Value> {
        let mut metadata = std::collections::HashMap::new();
        metadata.insert("name".to_string(), self.name().into());
        metadata.insert(
            "supported_types".to_string(),
            self.supported_types()
                .into_iter()
                .map(EmbeddingProvider::as_str)
                .collect::<Vec<_>>()
                .into(),
        );
        metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EmbedForgeError;

    #[derive(Debug)]
    struct MockEmbedderFactory {
        supported_types: Vec<EmbeddingProvider>,
    }

    impl EmbedderFactory for MockEmbedderFactory {
        fn create_embedder(&self, config: &EmbeddingConfig) -> Result<Arc<dyn Embedder>> {
            Err(EmbedForgeError::unsupported(config.provider().as_str()))
        }

        fn supported_types(&self) -> Vec<EmbeddingProvider> {
            self.supported_types.clone()
        }
    }

    #[test]
    fn test_can_create() {
        let factory = MockEmbedderFactory {
            supported_types: vec![EmbeddingProvider::Gemini],
        };

        assert!(factory.can_create(&EmbeddingConfig::gemini("models/embedding-001")));
        assert!(!factory.can_create(&EmbeddingConfig::openai("text-embedding-3-small")));
    }

    #[test]
    fn test_validate_config_default() {
        let factory = MockEmbedderFactory {
            supported_types: vec![EmbeddingProvider::OpenAi],
        };
        assert!(factory.validate_config(&EmbeddingConfig::openai("")).is_err());
    }

    #[test]
    fn test_metadata() {
        let factory = MockEmbedderFactory {
            supported_types: vec![EmbeddingProvider::Azure, EmbeddingProvider::OpenAi],
        };
        let metadata = factory.metadata();
        assert_eq!(metadata["supported_types"], serde_json::json!(["azure", "openai"]));
    }
}
