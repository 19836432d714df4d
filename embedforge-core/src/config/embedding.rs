//! Configuration for embedding providers.
//!
//! Each supported provider has its own configuration struct sharing a
//! [`BaseEmbeddingConfig`]. [`EmbeddingConfig`] is the tagged union over all
//! of them and is what the factory dispatches on.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::{EmbedForgeError, Result};

/// Name of the discriminant field in serialized configurations.
pub const PROVIDER_TAG: &str = "provider";

/// Keyword arguments forwarded to local model runtimes.
pub type Kwargs = serde_json::Map<String, serde_json::Value>;

/// Identity of an embedding provider.
///
/// The string form is the value of the `provider` tag in serialized
/// configurations.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EmbeddingProvider {
    /// Azure-hosted OpenAI deployments.
    Azure,
    /// The OpenAI API.
    #[serde(rename = "openai")]
    #[strum(serialize = "openai")]
    OpenAi,
    /// Locally-hosted Hugging Face model.
    HuggingFace,
    /// Locally-hosted Sentence Transformers model.
    SentenceTransformers,
    /// Google Gemini embedding API.
    Gemini,
}

impl EmbeddingProvider {
    /// The tag string for this provider.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Whether this provider runs the model in-process.
    #[must_use]
    pub fn is_local(self) -> bool {
        matches!(self, Self::HuggingFace | Self::SentenceTransformers)
    }
}

/// Fields shared by every provider configuration.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseEmbeddingConfig {
    /// Identifier of the embedding model to load or call.
    pub model: String,

    /// Credential for the provider, if it needs one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Requested output dimensionality.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<u32>,
}

impl BaseEmbeddingConfig {
    /// Create a base configuration for the given model.
    pub fn new<S: Into<String>>(model: S) -> Self {
        Self {
            model: model.into(),
            api_key: None,
            dimensions: None,
        }
    }

    /// The API key, treating an empty string as absent.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        non_empty(self.api_key.as_deref())
    }

    fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(EmbedForgeError::configuration("Model name cannot be empty"));
        }
        if self.dimensions == Some(0) {
            return Err(EmbedForgeError::configuration(
                "Dimensions must be greater than 0",
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for BaseEmbeddingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseEmbeddingConfig")
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("dimensions", &self.dimensions)
            .finish()
    }
}

/// Azure-hosted OpenAI embeddings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AzureEmbeddingConfig {
    /// Shared fields.
    #[serde(flatten)]
    pub base: BaseEmbeddingConfig,

    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`.
    pub azure_endpoint: String,

    /// REST API version, e.g. `2024-02-01`.
    pub azure_api_version: String,
}

/// OpenAI API embeddings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpenAiEmbeddingConfig {
    /// Shared fields.
    #[serde(flatten)]
    pub base: BaseEmbeddingConfig,

    /// Organization to bill requests to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
}

/// Hugging Face models run locally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HuggingFaceEmbeddingConfig {
    /// Shared fields.
    #[serde(flatten)]
    pub base: BaseEmbeddingConfig,

    /// Options applied when loading the model.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub model_kwargs: Kwargs,

    /// Options applied when encoding text.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub encode_kwargs: Kwargs,
}

/// Sentence Transformers models run locally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentenceTransformersEmbeddingConfig {
    /// Shared fields.
    #[serde(flatten)]
    pub base: BaseEmbeddingConfig,

    /// Directory model files are cached in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_folder: Option<String>,

    /// Options applied when encoding text.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub encode_kwargs: Kwargs,
}

/// Google Gemini embeddings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeminiEmbeddingConfig {
    /// Shared fields.
    #[serde(flatten)]
    pub base: BaseEmbeddingConfig,

    /// Task the embeddings are meant for, e.g. `RETRIEVAL_DOCUMENT`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_type: Option<String>,

    /// Document title, used with `RETRIEVAL_DOCUMENT`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Alternative API endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_api_endpoint: Option<String>,
}

/// Configuration for one embedding provider.
///
/// Variants are declared in dispatch precedence order: Azure, OpenAI,
/// Hugging Face, Sentence Transformers, Gemini.
///
/// # Examples
///
/// ```rust
/// use embedforge_core::config::{EmbeddingConfig, EmbeddingProvider};
///
/// let config = EmbeddingConfig::openai("text-embedding-3-small")
///     .with_api_key("sk-test");
/// assert_eq!(config.provider(), EmbeddingProvider::OpenAi);
/// assert!(config.validate().is_ok());
///
/// let parsed = EmbeddingConfig::from_value(serde_json::json!({
///     "provider": "hugging_face",
///     "model": "BAAI/bge-small-en-v1.5",
/// }))
/// .unwrap();
/// assert!(parsed.is_local());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "snake_case")]
pub enum EmbeddingConfig {
    /// Azure-hosted OpenAI.
    Azure(AzureEmbeddingConfig),
    /// OpenAI API.
    #[serde(rename = "openai")]
    OpenAi(OpenAiEmbeddingConfig),
    /// Local Hugging Face model.
    HuggingFace(HuggingFaceEmbeddingConfig),
    /// Local Sentence Transformers model.
    SentenceTransformers(SentenceTransformersEmbeddingConfig),
    /// Google Gemini.
    Gemini(GeminiEmbeddingConfig),
}

impl EmbeddingConfig {
    /// Create an Azure OpenAI configuration.
    pub fn azure<S: Into<String>>(model: S, azure_endpoint: S, azure_api_version: S) -> Self {
        Self::Azure(AzureEmbeddingConfig {
            base: BaseEmbeddingConfig::new(model),
            azure_endpoint: azure_endpoint.into(),
            azure_api_version: azure_api_version.into(),
        })
    }

    /// Create an OpenAI configuration.
    pub fn openai<S: Into<String>>(model: S) -> Self {
        Self::OpenAi(OpenAiEmbeddingConfig {
            base: BaseEmbeddingConfig::new(model),
            organization_id: None,
        })
    }

    /// Create a Hugging Face configuration with empty keyword arguments.
    pub fn hugging_face<S: Into<String>>(model: S) -> Self {
        Self::HuggingFace(HuggingFaceEmbeddingConfig {
            base: BaseEmbeddingConfig::new(model),
            ..Default::default()
        })
    }

    /// Create a Sentence Transformers configuration.
    pub fn sentence_transformers<S: Into<String>>(model: S) -> Self {
        Self::SentenceTransformers(SentenceTransformersEmbeddingConfig {
            base: BaseEmbeddingConfig::new(model),
            ..Default::default()
        })
    }

    /// Create a Gemini configuration.
    pub fn gemini<S: Into<String>>(model: S) -> Self {
        Self::Gemini(GeminiEmbeddingConfig {
            base: BaseEmbeddingConfig::new(model),
            ..Default::default()
        })
    }

    /// Parse a configuration from a JSON value.
    ///
    /// The `provider` tag is inspected before the rest of the value, so an
    /// unknown or missing tag is reported as
    /// [`EmbedForgeError::UnsupportedConfiguration`] rather than as a parse
    /// failure.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let tag = match &value {
            serde_json::Value::Object(fields) => match fields.get(PROVIDER_TAG) {
                Some(serde_json::Value::String(tag)) => tag.clone(),
                Some(other) => return Err(EmbedForgeError::unsupported(other.to_string())),
                None => {
                    return Err(EmbedForgeError::unsupported(format!(
                        "object without `{PROVIDER_TAG}` tag"
                    )));
                }
            },
            other => return Err(EmbedForgeError::unsupported(json_type_name(other))),
        };

        if tag.parse::<EmbeddingProvider>().is_err() {
            return Err(EmbedForgeError::unsupported(tag));
        }

        serde_json::from_value(value).map_err(|e| {
            EmbedForgeError::configuration(format!("Invalid {tag} embedding config: {e}"))
        })
    }

    /// Set the API key.
    #[must_use]
    pub fn with_api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.base_mut().api_key = Some(api_key.into());
        self
    }

    /// Set the requested output dimensionality.
    #[must_use]
    pub fn with_dimensions(mut self, dimensions: u32) -> Self {
        self.base_mut().dimensions = Some(dimensions);
        self
    }

    /// Shared fields of this configuration.
    #[must_use]
    pub fn base(&self) -> &BaseEmbeddingConfig {
        match self {
            Self::Azure(c) => &c.base,
            Self::OpenAi(c) => &c.base,
            Self::HuggingFace(c) => &c.base,
            Self::SentenceTransformers(c) => &c.base,
            Self::Gemini(c) => &c.base,
        }
    }

    /// Mutable access to the shared fields.
    pub fn base_mut(&mut self) -> &mut BaseEmbeddingConfig {
        match self {
            Self::Azure(c) => &mut c.base,
            Self::OpenAi(c) => &mut c.base,
            Self::HuggingFace(c) => &mut c.base,
            Self::SentenceTransformers(c) => &mut c.base,
            Self::Gemini(c) => &mut c.base,
        }
    }

    /// Get the model name.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.base().model
    }

    /// Get the provider this configuration targets.
    #[must_use]
    pub fn provider(&self) -> EmbeddingProvider {
        match self {
            Self::Azure(_) => EmbeddingProvider::Azure,
            Self::OpenAi(_) => EmbeddingProvider::OpenAi,
            Self::HuggingFace(_) => EmbeddingProvider::HuggingFace,
            Self::SentenceTransformers(_) => EmbeddingProvider::SentenceTransformers,
            Self::Gemini(_) => EmbeddingProvider::Gemini,
        }
    }

    /// Check if this configuration runs a local model.
    #[must_use]
    pub fn is_local(&self) -> bool {
        self.provider().is_local()
    }

    /// Check if this configuration calls a remote API.
    #[must_use]
    pub fn is_api(&self) -> bool {
        !self.is_local()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        self.base().validate()?;

        if let Self::Azure(c) = self {
            if c.azure_endpoint.trim().is_empty() {
                return Err(EmbedForgeError::configuration(
                    "Azure endpoint cannot be empty",
                ));
            }
            if c.azure_api_version.trim().is_empty() {
                return Err(EmbedForgeError::configuration(
                    "Azure API version cannot be empty",
                ));
            }
        }
        Ok(())
    }
}

/// Treat `None` and `""` alike, matching how optional string settings are
/// usually written in config files.
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Kwargs, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Kwargs>::deserialize(deserializer)?.unwrap_or_default())
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
