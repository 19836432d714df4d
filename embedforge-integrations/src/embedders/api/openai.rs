//! OpenAI embeddings client (`POST /v1/embeddings`).

use async_trait::async_trait;
use embedforge_core::{Result as CoreResult, config::EmbeddingProvider, traits::Embedder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{ApiEmbedderError, Result};
use super::http;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Request body shared by OpenAI and Azure OpenAI.
#[derive(Serialize)]
pub(crate) struct EmbeddingRequest<'a> {
    pub(crate) model: &'a str,
    pub(crate) input: &'a [&'a str],
    pub(crate) encoding_format: &'static str,
}

/// Response body shared by OpenAI and Azure OpenAI.
#[derive(Deserialize)]
pub(crate) struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

impl EmbeddingResponse {
    /// Embeddings in input order.
    pub(crate) fn into_embeddings(mut self, expected: usize) -> Result<Vec<Vec<f32>>> {
        if self.data.len() != expected {
            return Err(ApiEmbedderError::invalid_response(format!(
                "expected {expected} embeddings, got {}",
                self.data.len()
            )));
        }
        self.data.sort_by_key(|d| d.index);
        Ok(self.data.into_iter().map(|d| d.embedding).collect())
    }
}

/// Output size of the published OpenAI embedding models.
pub(crate) fn known_dimension(model: &str) -> Option<usize> {
    match model {
        "text-embedding-ada-002" | "text-embedding-3-small" => Some(1536),
        "text-embedding-3-large" => Some(3072),
        _ => None,
    }
}

/// Embedder backed by the OpenAI embeddings API.
///
/// When no API key is given, `OPENAI_API_KEY` is read at construction.
pub struct OpenAiEmbedder {
    model: String,
    api_key: String,
    organization: Option<String>,
    base_url: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiEmbedder")
            .field("model", &self.model)
            .field("api_key", &http::redact(&self.api_key))
            .field("organization", &self.organization)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl OpenAiEmbedder {
    /// Create a client for `model`.
    pub fn new<S: Into<String>>(
        model: S,
        api_key: Option<String>,
        organization: Option<String>,
    ) -> CoreResult<Self> {
        Self::build(model.into(), api_key, organization)
            .map_err(|e| e.into_construction_error(EmbeddingProvider::OpenAi.as_str()))
    }

    fn build(model: String, api_key: Option<String>, organization: Option<String>) -> Result<Self> {
        let api_key = http::resolve_api_key(api_key.as_deref(), API_KEY_ENV)?;
        let client = http::build_http_client()?;

        Ok(Self {
            model,
            api_key,
            organization,
            base_url: DEFAULT_BASE_URL.to_string(),
            client,
        })
    }

    /// Send requests to a different OpenAI-compatible server.
    #[must_use]
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Organization requests are billed to.
    pub fn organization(&self) -> Option<&str> {
        self.organization.as_deref()
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn request_embeddings(&self, input: &[&str]) -> Result<Vec<Vec<f32>>> {
        let url = format!("{}/v1/embeddings", self.base_url.trim_end_matches('/'));
        debug!(model = %self.model, count = input.len(), "Requesting OpenAI embeddings");

        let mut request = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&EmbeddingRequest {
                model: &self.model,
                input,
                encoding_format: "float",
            });
        if let Some(organization) = &self.organization {
            request = request.header("OpenAI-Organization", organization);
        }

        let response: EmbeddingResponse = http::send_json(request).await?;
        response.into_embeddings(input.len())
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> CoreResult<Vec<f32>> {
        let mut embeddings = self.request_embeddings(&[text]).await?;
        embeddings
            .pop()
            .ok_or_else(|| ApiEmbedderError::invalid_response("empty embedding response").into())
    }

    async fn embed_batch(&self, texts: Vec<&str>) -> CoreResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.request_embeddings(&texts).await?)
    }

    fn dimension(&self) -> Option<usize> {
        known_dimension(&self.model)
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn provider(&self) -> EmbeddingProvider {
        EmbeddingProvider::OpenAi
    }
}
