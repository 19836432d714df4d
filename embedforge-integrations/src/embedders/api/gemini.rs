//! Google Gemini embeddings client.
//!
//! Single texts go to `:embedContent`, batches to `:batchEmbedContents`.
//! Optional settings arrive as a keyword mapping (see [`GeminiOptions`]) so
//! that only the options a caller actually set reach the request.

use async_trait::async_trait;
use embedforge_core::{
    Result as CoreResult,
    config::{EmbeddingProvider, Kwargs},
    traits::Embedder,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{ApiEmbedderError, Result};
use super::http;

const DEFAULT_API_ENDPOINT: &str = "generativelanguage.googleapis.com";
const API_VERSION: &str = "v1beta";
const API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// What the embeddings will be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GeminiTaskType {
    /// No task given.
    TaskTypeUnspecified,
    /// Search query.
    RetrievalQuery,
    /// Document in a search corpus.
    RetrievalDocument,
    /// Semantic text similarity.
    SemanticSimilarity,
    /// Classification input.
    Classification,
    /// Clustering input.
    Clustering,
    /// Question in a question answering system.
    QuestionAnswering,
    /// Statement to verify.
    FactVerification,
    /// Natural language query for code retrieval.
    CodeRetrievalQuery,
}

/// Optional Gemini settings.
///
/// Field names match the configuration keys; unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiOptions {
    /// Task type sent with every request. When unset, single embeds use
    /// `RETRIEVAL_QUERY` and batches use `RETRIEVAL_DOCUMENT`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_type: Option<GeminiTaskType>,

    /// Document title. Sent only when the effective task type is
    /// `RETRIEVAL_DOCUMENT`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Host or base URL of the API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_api_endpoint: Option<String>,

    /// Requested output dimensionality.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<u32>,
}

impl GeminiOptions {
    /// Parse options from a keyword mapping.
    pub fn from_kwargs(kwargs: Kwargs) -> Result<Self> {
        serde_json::from_value(serde_json::Value::Object(kwargs))
            .map_err(|e| ApiEmbedderError::invalid_option(e.to_string()))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedContentRequest<'a> {
    model: &'a str,
    content: Content<'a>,
    task_type: GeminiTaskType,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    output_dimensionality: Option<u32>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct BatchEmbedContentsRequest<'a> {
    requests: Vec<EmbedContentRequest<'a>>,
}

#[derive(Deserialize)]
struct ContentEmbedding {
    values: Vec<f32>,
}

#[derive(Deserialize)]
struct EmbedContentResponse {
    embedding: ContentEmbedding,
}

#[derive(Deserialize)]
struct BatchEmbedContentsResponse {
    #[serde(default)]
    embeddings: Vec<ContentEmbedding>,
}

/// Embedder backed by the Gemini API.
///
/// When no API key is given, `GOOGLE_API_KEY` is read at construction.
pub struct GeminiEmbedder {
    model: String,
    api_key: String,
    options: GeminiOptions,
    base_url: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for GeminiEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiEmbedder")
            .field("model", &self.model)
            .field("api_key", &http::redact(&self.api_key))
            .field("options", &self.options)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiEmbedder {
    /// Create a client for `model`, applying the given keyword options.
    pub fn new<S: Into<String>>(
        model: S,
        google_api_key: Option<String>,
        kwargs: Kwargs,
    ) -> CoreResult<Self> {
        Self::build(model.into(), google_api_key, kwargs)
            .map_err(|e| e.into_construction_error(EmbeddingProvider::Gemini.as_str()))
    }

    fn build(model: String, google_api_key: Option<String>, kwargs: Kwargs) -> Result<Self> {
        let options = GeminiOptions::from_kwargs(kwargs)?;
        let base_url = base_url(
            options
                .google_api_endpoint
                .as_deref()
                .unwrap_or(DEFAULT_API_ENDPOINT),
        )?;
        let api_key = http::resolve_api_key(google_api_key.as_deref(), API_KEY_ENV)?;
        let client = http::build_http_client()?;

        Ok(Self {
            model: qualified_model_name(&model),
            api_key,
            options,
            base_url,
            client,
        })
    }

    /// Options in effect for this client.
    pub fn options(&self) -> &GeminiOptions {
        &self.options
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn content_request<'a>(
        &'a self,
        text: &'a str,
        default_task: GeminiTaskType,
    ) -> EmbedContentRequest<'a> {
        let task_type = self.options.task_type.unwrap_or(default_task);
        EmbedContentRequest {
            model: &self.model,
            content: Content {
                parts: [Part { text }],
            },
            task_type,
            // The API only accepts a title for document embeddings.
            title: self
                .options
                .title
                .as_deref()
                .filter(|_| task_type == GeminiTaskType::RetrievalDocument),
            output_dimensionality: self.options.dimensions,
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{API_VERSION}/{}:{method}", self.base_url, self.model)
    }

    async fn embed_content(&self, text: &str) -> Result<Vec<f32>> {
        debug!(model = %self.model, "Requesting Gemini embedding");

        let request = self
            .client
            .post(self.method_url("embedContent"))
            .header("x-goog-api-key", &self.api_key)
            .json(&self.content_request(text, GeminiTaskType::RetrievalQuery));

        let response: EmbedContentResponse = http::send_json(request).await?;
        Ok(response.embedding.values)
    }

    async fn batch_embed_contents(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        debug!(model = %self.model, count = texts.len(), "Requesting Gemini batch embeddings");

        let body = BatchEmbedContentsRequest {
            requests: texts
                .iter()
                .map(|text| self.content_request(text, GeminiTaskType::RetrievalDocument))
                .collect(),
        };
        let request = self
            .client
            .post(self.method_url("batchEmbedContents"))
            .header("x-goog-api-key", &self.api_key)
            .json(&body);

        let response: BatchEmbedContentsResponse = http::send_json(request).await?;
        if response.embeddings.len() != texts.len() {
            return Err(ApiEmbedderError::invalid_response(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                response.embeddings.len()
            )));
        }
        Ok(response.embeddings.into_iter().map(|e| e.values).collect())
    }
}

/// The API addresses models as `models/{name}`.
fn qualified_model_name(model: &str) -> String {
    if model.starts_with("models/") || model.starts_with("tunedModels/") {
        model.to_string()
    } else {
        format!("models/{model}")
    }
}

/// Accept either a bare host or a full URL.
fn base_url(endpoint: &str) -> Result<String> {
    let endpoint = endpoint.trim();
    let candidate = if endpoint.contains("://") {
        endpoint.to_string()
    } else {
        format!("https://{endpoint}")
    };
    let url = http::parse_endpoint(&candidate)?;
    Ok(url.as_str().trim_end_matches('/').to_string())
}

fn known_dimension(model: &str) -> Option<usize> {
    match model.trim_start_matches("models/") {
        "embedding-001" | "text-embedding-004" | "text-embedding-005" => Some(768),
        "gemini-embedding-001" => Some(3072),
        _ => None,
    }
}

#[async_trait]
impl Embedder for GeminiEmbedder {
    async fn embed(&self, text: &str) -> CoreResult<Vec<f32>> {
        Ok(self.embed_content(text).await?)
    }

    async fn embed_batch(&self, texts: Vec<&str>) -> CoreResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.batch_embed_contents(&texts).await?)
    }

    fn dimension(&self) -> Option<usize> {
        self.options
            .dimensions
            .map(|d| d as usize)
            .or_else(|| known_dimension(&self.model))
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn provider(&self) -> EmbeddingProvider {
        EmbeddingProvider::Gemini
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedforge_core::EmbedForgeError;
    use mockito::Matcher;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn kwargs(value: serde_json::Value) -> Kwargs {
        match value {
            serde_json::Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_options_from_kwargs() {
        let options = GeminiOptions::from_kwargs(kwargs(json!({
            "task_type": "SEMANTIC_SIMILARITY",
            "dimensions": 256,
        })))
        .unwrap();

        assert_eq!(
            options,
            GeminiOptions {
                task_type: Some(GeminiTaskType::SemanticSimilarity),
                title: None,
                google_api_endpoint: None,
                dimensions: Some(256),
            }
        );
    }

    #[test]
    fn test_unknown_option_rejected() {
        let err = GeminiEmbedder::new(
            "text-embedding-004",
            Some("k".to_string()),
            kwargs(json!({"temperature": 0.2})),
        )
        .unwrap_err();
        assert!(matches!(err, EmbedForgeError::ProviderConstruction { .. }));
    }

    #[test]
    fn test_unknown_task_type_rejected() {
        assert!(GeminiOptions::from_kwargs(kwargs(json!({"task_type": "SUMMARIZE"}))).is_err());
    }

    #[test]
    fn test_model_name_qualified() {
        assert_eq!(qualified_model_name("text-embedding-004"), "models/text-embedding-004");
        assert_eq!(qualified_model_name("models/embedding-001"), "models/embedding-001");
    }

    #[test]
    fn test_base_url_accepts_host() {
        assert_eq!(
            base_url("generativelanguage.googleapis.com").unwrap(),
            "https://generativelanguage.googleapis.com"
        );
        assert_eq!(base_url("http://localhost:8080/").unwrap(), "http://localhost:8080");
    }

    #[test]
    fn test_dimension_prefers_option() {
        let embedder = GeminiEmbedder::new(
            "text-embedding-004",
            Some("k".to_string()),
            kwargs(json!({"dimensions": 128})),
        )
        .unwrap();
        assert_eq!(embedder.dimension(), Some(128));

        let embedder =
            GeminiEmbedder::new("text-embedding-004", Some("k".to_string()), Kwargs::new()).unwrap();
        assert_eq!(embedder.dimension(), Some(768));
    }

    #[tokio::test]
    async fn test_embed_uses_query_task_by_default() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/text-embedding-004:embedContent")
            .match_header("x-goog-api-key", "google-key")
            .match_body(Matcher::Json(json!({
                "model": "models/text-embedding-004",
                "content": {"parts": [{"text": "where is it?"}]},
                "taskType": "RETRIEVAL_QUERY",
            })))
            .with_body(json!({"embedding": {"values": [0.1, 0.2, 0.3]}}).to_string())
            .create_async()
            .await;

        let embedder = GeminiEmbedder::new(
            "text-embedding-004",
            Some("google-key".to_string()),
            kwargs(json!({"google_api_endpoint": server.url()})),
        )
        .unwrap();

        let embedding = embedder.embed("where is it?").await.unwrap();

        assert_eq!(embedding, vec![0.1, 0.2, 0.3]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_batch_sends_configured_options() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/text-embedding-004:batchEmbedContents")
            .match_body(Matcher::Json(json!({
                "requests": [
                    {
                        "model": "models/text-embedding-004",
                        "content": {"parts": [{"text": "a"}]},
                        "taskType": "RETRIEVAL_DOCUMENT",
                        "title": "doc",
                        "outputDimensionality": 2,
                    },
                    {
                        "model": "models/text-embedding-004",
                        "content": {"parts": [{"text": "b"}]},
                        "taskType": "RETRIEVAL_DOCUMENT",
                        "title": "doc",
                        "outputDimensionality": 2,
                    },
                ]
            })))
            .with_body(
                json!({"embeddings": [{"values": [1.0, 0.0]}, {"values": [0.0, 1.0]}]})
                    .to_string(),
            )
            .create_async()
            .await;

        let embedder = GeminiEmbedder::new(
            "text-embedding-004",
            Some("google-key".to_string()),
            kwargs(json!({
                "google_api_endpoint": server.url(),
                "title": "doc",
                "dimensions": 2,
            })),
        )
        .unwrap();

        let embeddings = embedder.embed_batch(vec!["a", "b"]).await.unwrap();

        assert_eq!(embeddings, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_query_embed_omits_title() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/text-embedding-004:embedContent")
            .match_body(Matcher::Json(json!({
                "model": "models/text-embedding-004",
                "content": {"parts": [{"text": "q"}]},
                "taskType": "RETRIEVAL_QUERY",
            })))
            .with_body(json!({"embedding": {"values": [1.0]}}).to_string())
            .create_async()
            .await;

        let embedder = GeminiEmbedder::new(
            "text-embedding-004",
            Some("google-key".to_string()),
            kwargs(json!({"google_api_endpoint": server.url(), "title": "doc"})),
        )
        .unwrap();

        assert_eq!(embedder.embed("q").await.unwrap(), vec![1.0]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_explicit_document_task_keeps_title() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/text-embedding-004:embedContent")
            .match_body(Matcher::PartialJson(json!({
                "taskType": "RETRIEVAL_DOCUMENT",
                "title": "doc",
            })))
            .with_body(json!({"embedding": {"values": [1.0]}}).to_string())
            .create_async()
            .await;

        let embedder = GeminiEmbedder::new(
            "text-embedding-004",
            Some("google-key".to_string()),
            kwargs(json!({
                "google_api_endpoint": server.url(),
                "title": "doc",
                "task_type": "RETRIEVAL_DOCUMENT",
            })),
        )
        .unwrap();

        embedder.embed("body text").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rate_limited() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1beta/models/text-embedding-004:embedContent")
            .with_status(429)
            .with_body("quota")
            .create_async()
            .await;

        let embedder = GeminiEmbedder::new(
            "text-embedding-004",
            Some("google-key".to_string()),
            kwargs(json!({"google_api_endpoint": server.url()})),
        )
        .unwrap();

        let err = embedder.embed("x").await.unwrap_err();
        assert!(matches!(err, EmbedForgeError::RateLimit { .. }));
    }
}
