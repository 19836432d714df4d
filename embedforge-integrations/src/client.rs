//! The handle returned by [`EmbeddingFactory`](crate::EmbeddingFactory).

use std::sync::Arc;

use async_trait::async_trait;
use embedforge_core::{Result, config::EmbeddingProvider, traits::Embedder};

use crate::embedders::{
    AzureOpenAiEmbedder, GeminiEmbedder, HuggingFaceEmbedder, OpenAiEmbedder,
    SentenceTransformerEmbedder,
};

/// A constructed embedding client for one provider.
///
/// Implements [`Embedder`] by delegating to the wrapped client. Use the
/// typed accessors to reach provider-specific settings, or
/// [`into_shared`](Self::into_shared) to erase the provider.
#[derive(Debug)]
pub enum EmbeddingClient {
    /// Azure OpenAI deployment.
    AzureOpenAi(AzureOpenAiEmbedder),
    /// OpenAI API.
    OpenAi(OpenAiEmbedder),
    /// Local Hugging Face model.
    HuggingFace(HuggingFaceEmbedder),
    /// Local Sentence Transformers model.
    SentenceTransformers(SentenceTransformerEmbedder),
    /// Google Gemini.
    Gemini(GeminiEmbedder),
}

macro_rules! delegate {
    ($self:ident, $client:ident => $body:expr) => {
        match $self {
            EmbeddingClient::AzureOpenAi($client) => $body,
            EmbeddingClient::OpenAi($client) => $body,
            EmbeddingClient::HuggingFace($client) => $body,
            EmbeddingClient::SentenceTransformers($client) => $body,
            EmbeddingClient::Gemini($client) => $body,
        }
    };
}

impl EmbeddingClient {
    /// Provider backing this client.
    pub fn provider(&self) -> EmbeddingProvider {
        match self {
            Self::AzureOpenAi(_) => EmbeddingProvider::Azure,
            Self::OpenAi(_) => EmbeddingProvider::OpenAi,
            Self::HuggingFace(_) => EmbeddingProvider::HuggingFace,
            Self::SentenceTransformers(_) => EmbeddingProvider::SentenceTransformers,
            Self::Gemini(_) => EmbeddingProvider::Gemini,
        }
    }

    /// The Azure client, if this is one.
    pub fn as_azure(&self) -> Option<&AzureOpenAiEmbedder> {
        match self {
            Self::AzureOpenAi(client) => Some(client),
            _ => None,
        }
    }

    /// The OpenAI client, if this is one.
    pub fn as_openai(&self) -> Option<&OpenAiEmbedder> {
        match self {
            Self::OpenAi(client) => Some(client),
            _ => None,
        }
    }

    /// The Hugging Face client, if this is one.
    pub fn as_hugging_face(&self) -> Option<&HuggingFaceEmbedder> {
        match self {
            Self::HuggingFace(client) => Some(client),
            _ => None,
        }
    }

    /// The Sentence Transformers client, if this is one.
    pub fn as_sentence_transformers(&self) -> Option<&SentenceTransformerEmbedder> {
        match self {
            Self::SentenceTransformers(client) => Some(client),
            _ => None,
        }
    }

    /// The Gemini client, if this is one.
    pub fn as_gemini(&self) -> Option<&GeminiEmbedder> {
        match self {
            Self::Gemini(client) => Some(client),
            _ => None,
        }
    }

    /// Erase the provider type.
    pub fn into_shared(self) -> Arc<dyn Embedder> {
        delegate!(self, client => {
            let shared: Arc<dyn Embedder> = Arc::new(client);
            shared
        })
    }
}

#[async_trait]
impl Embedder for EmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        delegate!(self, client => client.embed(text).await)
    }

    async fn embed_batch(&self, texts: Vec<&str>) -> Result<Vec<Vec<f32>>> {
        delegate!(self, client => client.embed_batch(texts).await)
    }

    fn dimension(&self) -> Option<usize> {
        delegate!(self, client => client.dimension())
    }

    fn model_name(&self) -> &str {
        delegate!(self, client => client.model_name())
    }

    fn provider(&self) -> EmbeddingProvider {
        EmbeddingClient::provider(self)
    }

    fn name(&self) -> &'static str {
        delegate!(self, client => client.name())
    }
}

impl From<AzureOpenAiEmbedder> for EmbeddingClient {
    fn from(client: AzureOpenAiEmbedder) -> Self {
        Self::AzureOpenAi(client)
    }
}

impl From<OpenAiEmbedder> for EmbeddingClient {
    fn from(client: OpenAiEmbedder) -> Self {
        Self::OpenAi(client)
    }
}

impl From<HuggingFaceEmbedder> for EmbeddingClient {
    fn from(client: HuggingFaceEmbedder) -> Self {
        Self::HuggingFace(client)
    }
}

impl From<SentenceTransformerEmbedder> for EmbeddingClient {
    fn from(client: SentenceTransformerEmbedder) -> Self {
        Self::SentenceTransformers(client)
    }
}

impl From<GeminiEmbedder> for EmbeddingClient {
    fn from(client: GeminiEmbedder) -> Self {
        Self::Gemini(client)
    }
}
