//! Configuration-driven construction of embedding clients.

use std::sync::Arc;

use embedforge_core::{
    Result,
    config::{
        EmbeddingConfig, EmbeddingProvider, GeminiEmbeddingConfig, HuggingFaceEmbeddingConfig,
        Kwargs, non_empty,
    },
    factory::EmbedderFactory,
    traits::Embedder,
};
use serde_json::Value;
use strum::IntoEnumIterator;
use tracing::debug;

use crate::client::EmbeddingClient;
use crate::embedders::{
    AzureOpenAiEmbedder, GeminiEmbedder, HuggingFaceEmbedder, OpenAiEmbedder,
    SentenceTransformerEmbedder,
};

/// Builds an [`EmbeddingClient`] from an [`EmbeddingConfig`].
///
/// The factory holds no state. Each call validates the configuration, then
/// hands the relevant fields to the matching provider client. The caller's
/// configuration is never modified; mappings are copied before defaults are
/// added.
///
/// # Examples
///
/// ```rust,no_run
/// use embedforge_core::config::{EmbeddingConfig, EmbeddingProvider};
/// use embedforge_integrations::EmbeddingFactory;
///
/// # fn example() -> embedforge_core::Result<()> {
/// let config = EmbeddingConfig::hugging_face("BAAI/bge-small-en-v1.5");
/// let client = EmbeddingFactory::create_embedding_model(&config)?;
/// assert_eq!(client.provider(), EmbeddingProvider::HuggingFace);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddingFactory;

impl EmbeddingFactory {
    /// Create a factory.
    pub fn new() -> Self {
        Self
    }

    /// Construct the client described by `config`.
    ///
    /// # Errors
    ///
    /// - [`Configuration`] if the configuration fails validation.
    /// - [`ProviderConstruction`] if the provider client cannot be built
    ///   (missing credentials, malformed endpoint, unknown local model,
    ///   invalid options).
    ///
    /// [`Configuration`]: embedforge_core::EmbedForgeError::Configuration
    /// [`ProviderConstruction`]: embedforge_core::EmbedForgeError::ProviderConstruction
    pub fn create_embedding_model(config: &EmbeddingConfig) -> Result<EmbeddingClient> {
        config.validate()?;
        debug!(
            provider = %config.provider(),
            model = %config.model(),
            "Creating embedding client"
        );

        let client = match config {
            EmbeddingConfig::Azure(c) => AzureOpenAiEmbedder::new(
                c.base.model.clone(),
                c.base.api_key().map(str::to_string),
                c.azure_api_version.clone(),
                &c.azure_endpoint,
            )?
            .into(),
            EmbeddingConfig::OpenAi(c) => OpenAiEmbedder::new(
                c.base.model.clone(),
                c.base.api_key().map(str::to_string),
                c.organization_id.clone(),
            )?
            .into(),
            EmbeddingConfig::HuggingFace(c) => HuggingFaceEmbedder::new(
                c.base.model.clone(),
                hugging_face_model_kwargs(c),
                hugging_face_encode_kwargs(c),
            )?
            .into(),
            EmbeddingConfig::SentenceTransformers(c) => SentenceTransformerEmbedder::new(
                c.base.model.clone(),
                c.cache_folder.clone(),
                c.encode_kwargs.clone(),
            )?
            .into(),
            EmbeddingConfig::Gemini(c) => GeminiEmbedder::new(
                c.base.model.clone(),
                c.base.api_key().map(str::to_string),
                gemini_kwargs(c),
            )?
            .into(),
        };

        Ok(client)
    }

    /// Parse `value` as a configuration and construct its client.
    ///
    /// An unknown or missing `provider` tag is reported as
    /// [`UnsupportedConfiguration`](embedforge_core::EmbedForgeError::UnsupportedConfiguration).
    pub fn create_from_value(value: Value) -> Result<EmbeddingClient> {
        let config = EmbeddingConfig::from_value(value)?;
        Self::create_embedding_model(&config)
    }
}

/// `model_kwargs` passed to the Hugging Face client: a copy of the
/// configured mapping with `api_key` added when one is set.
pub fn hugging_face_model_kwargs(config: &HuggingFaceEmbeddingConfig) -> Kwargs {
    let mut model_kwargs = config.model_kwargs.clone();
    if let Some(api_key) = config.base.api_key() {
        model_kwargs.insert("api_key".to_string(), Value::from(api_key));
    }
    model_kwargs
}

/// `encode_kwargs` passed to the Hugging Face client: a copy of the
/// configured mapping with `normalize_embeddings` defaulting to `true`.
pub fn hugging_face_encode_kwargs(config: &HuggingFaceEmbeddingConfig) -> Kwargs {
    let mut encode_kwargs = config.encode_kwargs.clone();
    encode_kwargs
        .entry("normalize_embeddings")
        .or_insert(Value::Bool(true));
    encode_kwargs
}

/// Options passed to the Gemini client. Only settings that are present
/// appear in the mapping.
pub fn gemini_kwargs(config: &GeminiEmbeddingConfig) -> Kwargs {
    let mut kwargs = Kwargs::new();
    let optional = [
        ("task_type", config.task_type.as_deref()),
        ("title", config.title.as_deref()),
        ("google_api_endpoint", config.google_api_endpoint.as_deref()),
    ];
    for (key, value) in optional {
        if let Some(value) = non_empty(value) {
            kwargs.insert(key.to_string(), Value::from(value));
        }
    }
    if let Some(dimensions) = config.base.dimensions {
        kwargs.insert("dimensions".to_string(), Value::from(dimensions));
    }
    kwargs
}

impl EmbedderFactory for EmbeddingFactory {
    fn create_embedder(&self, config: &EmbeddingConfig) -> Result<Arc<dyn Embedder>> {
        Self::create_embedding_model(config).map(EmbeddingClient::into_shared)
    }

    fn supported_types(&self) -> Vec<EmbeddingProvider> {
        EmbeddingProvider::iter().collect()
    }

    fn name(&self) -> &'static str {
        "EmbeddingFactory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedforge_core::EmbedForgeError;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_gemini_kwargs_only_present_values() {
        let mut config = GeminiEmbeddingConfig::default();
        config.base.model = "text-embedding-004".to_string();
        config.title = Some("doc".to_string());
        config.task_type = Some(String::new());

        let kwargs = gemini_kwargs(&config);
        assert_eq!(Value::Object(kwargs), json!({"title": "doc"}));
    }

    #[test]
    fn test_gemini_kwargs_forward_dimensions() {
        let mut config = GeminiEmbeddingConfig::default();
        config.base.dimensions = Some(256);
        config.task_type = Some("CLUSTERING".to_string());

        assert_eq!(
            Value::Object(gemini_kwargs(&config)),
            json!({"task_type": "CLUSTERING", "dimensions": 256})
        );
    }

    #[test]
    fn test_hugging_face_defaults_copy() {
        let mut config = HuggingFaceEmbeddingConfig::default();
        config.base.api_key = Some("secret".to_string());

        let model_kwargs = hugging_face_model_kwargs(&config);
        let encode_kwargs = hugging_face_encode_kwargs(&config);

        assert_eq!(Value::Object(model_kwargs), json!({"api_key": "secret"}));
        assert_eq!(
            Value::Object(encode_kwargs),
            json!({"normalize_embeddings": true})
        );
        assert!(config.model_kwargs.is_empty());
        assert!(config.encode_kwargs.is_empty());
    }

    #[test]
    fn test_validation_runs_before_construction() {
        let config = EmbeddingConfig::openai("").with_api_key("sk-test");
        let err = EmbeddingFactory::create_embedding_model(&config).unwrap_err();
        assert!(matches!(err, EmbedForgeError::Configuration { .. }));
    }

    #[test]
    fn test_factory_trait_supports_every_provider() {
        let factory = EmbeddingFactory::new();
        assert_eq!(factory.supported_types().len(), 5);
        assert!(factory.can_create(&EmbeddingConfig::gemini("text-embedding-004")));
        assert_eq!(factory.name(), "EmbeddingFactory");
    }
}
