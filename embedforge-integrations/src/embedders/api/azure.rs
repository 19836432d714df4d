//! Azure OpenAI embeddings client.
//!
//! Requests go to `{endpoint}/openai/deployments/{model}/embeddings` with the
//! API version as a query parameter. The model name doubles as the
//! deployment name.

use async_trait::async_trait;
use embedforge_core::{Result as CoreResult, config::EmbeddingProvider, traits::Embedder};
use tracing::debug;
use url::Url;

use super::error::{ApiEmbedderError, Result};
use super::http;
use super::openai::{EmbeddingRequest, EmbeddingResponse, known_dimension};

const API_KEY_ENV: &str = "AZURE_OPENAI_API_KEY";

/// Embedder backed by an Azure OpenAI deployment.
///
/// When no API key is given, `AZURE_OPENAI_API_KEY` is read at construction.
pub struct AzureOpenAiEmbedder {
    model: String,
    api_key: String,
    api_version: String,
    endpoint: Url,
    embeddings_url: Url,
    client: reqwest::Client,
}

impl std::fmt::Debug for AzureOpenAiEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureOpenAiEmbedder")
            .field("model", &self.model)
            .field("api_key", &http::redact(&self.api_key))
            .field("api_version", &self.api_version)
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl AzureOpenAiEmbedder {
    /// Create a client for the deployment named `model` on `azure_endpoint`.
    pub fn new<S: Into<String>>(
        model: S,
        api_key: Option<String>,
        api_version: S,
        azure_endpoint: &str,
    ) -> CoreResult<Self> {
        Self::build(
            model.into(),
            api_key,
            api_version.into(),
            azure_endpoint,
            API_KEY_ENV,
        )
        .map_err(|e| e.into_construction_error(EmbeddingProvider::Azure.as_str()))
    }

    fn build(
        model: String,
        api_key: Option<String>,
        api_version: String,
        azure_endpoint: &str,
        key_env: &'static str,
    ) -> Result<Self> {
        let endpoint = http::parse_endpoint(azure_endpoint)?;
        let embeddings_url = deployment_url(&endpoint, &model, &api_version)?;
        let api_key = http::resolve_api_key(api_key.as_deref(), key_env)?;
        let client = http::build_http_client()?;

        Ok(Self {
            model,
            api_key,
            api_version,
            endpoint,
            embeddings_url,
            client,
        })
    }

    /// REST API version sent with each request.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Resource endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Full URL embedding requests are posted to.
    pub fn embeddings_url(&self) -> &Url {
        &self.embeddings_url
    }

    async fn request_embeddings(&self, input: &[&str]) -> Result<Vec<Vec<f32>>> {
        debug!(deployment = %self.model, count = input.len(), "Requesting Azure OpenAI embeddings");

        let request = self
            .client
            .post(self.embeddings_url.clone())
            .header("api-key", &self.api_key)
            .json(&EmbeddingRequest {
                model: &self.model,
                input,
                encoding_format: "float",
            });

        let response: EmbeddingResponse = http::send_json(request).await?;
        response.into_embeddings(input.len())
    }
}

fn deployment_url(endpoint: &Url, deployment: &str, api_version: &str) -> Result<Url> {
    let mut url = endpoint.clone();
    url.path_segments_mut()
        .map_err(|()| ApiEmbedderError::invalid_endpoint(endpoint.as_str(), "cannot be a base URL"))?
        .pop_if_empty()
        .extend(["openai", "deployments", deployment, "embeddings"]);
    url.query_pairs_mut().append_pair("api-version", api_version);
    Ok(url)
}

#[async_trait]
impl Embedder for AzureOpenAiEmbedder {
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
        EmbeddingProvider::Azure
    }
}
