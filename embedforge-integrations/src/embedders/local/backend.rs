//! Local model runtime backed by FastEmbed.
//!
//! Model names are resolved when a [`LocalModel`] is created; weights are
//! downloaded and loaded on first use and shared by every later call.

#[cfg(feature = "fastembed")]
use std::sync::Arc;

#[cfg(feature = "fastembed")]
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
#[cfg(feature = "fastembed")]
use tokio::sync::OnceCell;
use tracing::debug;
#[cfg(feature = "fastembed")]
use tracing::info;

use super::error::{LocalEmbedderError, Result};
use super::options::{EncodeOptions, LoadOptions};

/// Models with well-known names and output sizes.
const KNOWN_MODELS: &[(&str, usize)] = &[
    ("BAAI/bge-small-en-v1.5", 384),
    ("BAAI/bge-base-en-v1.5", 768),
    ("BAAI/bge-large-en-v1.5", 1024),
    ("sentence-transformers/all-MiniLM-L6-v2", 384),
    ("intfloat/multilingual-e5-base", 768),
    ("intfloat/multilingual-e5-large", 1024),
    ("jinaai/jina-embeddings-v2-base-code", 768),
];

#[cfg(feature = "fastembed")]
fn known_runtime_model(name: &str) -> Option<EmbeddingModel> {
    match name {
        "BAAI/bge-small-en-v1.5" => Some(EmbeddingModel::BGESmallENV15),
        "BAAI/bge-base-en-v1.5" => Some(EmbeddingModel::BGEBaseENV15),
        "BAAI/bge-large-en-v1.5" => Some(EmbeddingModel::BGELargeENV15),
        "sentence-transformers/all-MiniLM-L6-v2" => Some(EmbeddingModel::AllMiniLML6V2),
        "intfloat/multilingual-e5-base" => Some(EmbeddingModel::MultilingualE5Base),
        "intfloat/multilingual-e5-large" => Some(EmbeddingModel::MultilingualE5Large),
        "jinaai/jina-embeddings-v2-base-code" => Some(EmbeddingModel::JinaEmbeddingsV2BaseCode),
        _ => None,
    }
}

/// Names to try for `name`. Bare names are also tried under the
/// `sentence-transformers/` organization.
fn candidate_names(name: &str) -> Vec<String> {
    let mut names = vec![name.to_string()];
    if !name.contains('/') {
        names.push(format!("sentence-transformers/{name}"));
    }
    names
}

fn known_dimension(name: &str) -> Option<usize> {
    candidate_names(name).iter().find_map(|candidate| {
        KNOWN_MODELS
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(candidate))
            .map(|(_, dim)| *dim)
    })
}

/// Organizations whose public models the runtime serves from a re-hosted
/// copy (e.g. `BAAI/bge-small-en-v1.5` as `Xenova/bge-small-en-v1.5`).
const REHOSTED_ORGS: &[&str] = &[
    "BAAI",
    "sentence-transformers",
    "intfloat",
    "jinaai",
    "nomic-ai",
    "mixedbread-ai",
    "thenlper",
    "Alibaba-NLP",
];

#[cfg_attr(not(feature = "fastembed"), allow(dead_code))]
fn repo_name(model_code: &str) -> &str {
    model_code.rsplit('/').next().unwrap_or(model_code)
}

/// Whether `name` may match a catalog entry published under another
/// organization. Names from any other organization must match exactly.
#[cfg_attr(not(feature = "fastembed"), allow(dead_code))]
fn matches_by_repo(name: &str) -> bool {
    match name.rsplit_once('/') {
        None => true,
        Some((org, _)) => REHOSTED_ORGS.iter().any(|o| o.eq_ignore_ascii_case(org)),
    }
}

#[cfg(feature = "fastembed")]
fn resolve(name: &str) -> Result<(EmbeddingModel, usize)> {
    let candidates = candidate_names(name);

    for candidate in &candidates {
        if let Some(model) = known_runtime_model(candidate) {
            if let Some(dim) = known_dimension(candidate) {
                return Ok((model, dim));
            }
        }
    }

    let supported = TextEmbedding::list_supported_models();
    for candidate in &candidates {
        let exact = supported
            .iter()
            .find(|info| info.model_code.eq_ignore_ascii_case(candidate));
        let by_repo = || {
            if !matches_by_repo(candidate) {
                return None;
            }
            supported.iter().find(|info| {
                repo_name(&info.model_code).eq_ignore_ascii_case(repo_name(candidate))
            })
        };
        if let Some(info) = exact.or_else(by_repo) {
            return Ok((info.model.clone(), info.dim));
        }
    }

    Err(LocalEmbedderError::UnknownModel {
        model: name.to_string(),
    })
}

/// A local embedding model that loads lazily.
pub struct LocalModel {
    name: String,
    dimension: Option<usize>,
    load: LoadOptions,
    encode: EncodeOptions,
    #[cfg(feature = "fastembed")]
    model: EmbeddingModel,
    #[cfg(feature = "fastembed")]
    engine: OnceCell<Arc<TextEmbedding>>,
}

impl std::fmt::Debug for LocalModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalModel")
            .field("name", &self.name)
            .field("dimension", &self.dimension)
            .field("load", &self.load)
            .field("encode", &self.encode)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

impl LocalModel {
    /// Resolve `name` without loading any weights.
    #[cfg(feature = "fastembed")]
    pub fn new<S: Into<String>>(name: S, load: LoadOptions, encode: EncodeOptions) -> Result<Self> {
        let name = name.into();
        let (model, dimension) = resolve(&name)?;
        debug!(model = %name, dimension, "Resolved local embedding model");

        Ok(Self {
            name,
            dimension: Some(dimension),
            load,
            encode,
            model,
            engine: OnceCell::new(),
        })
    }

    /// Record `name` for later use; embedding fails without a runtime.
    #[cfg(not(feature = "fastembed"))]
    pub fn new<S: Into<String>>(name: S, load: LoadOptions, encode: EncodeOptions) -> Result<Self> {
        let name = name.into();
        let dimension = known_dimension(&name);
        Ok(Self {
            name,
            dimension,
            load,
            encode,
        })
    }

    /// Requested model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Output size, when known.
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    /// Load options in effect.
    pub fn load_options(&self) -> &LoadOptions {
        &self.load
    }

    /// Encode options in effect.
    pub fn encode_options(&self) -> &EncodeOptions {
        &self.encode
    }

    /// Whether weights have been loaded.
    pub fn is_loaded(&self) -> bool {
        #[cfg(feature = "fastembed")]
        {
            self.engine.initialized()
        }
        #[cfg(not(feature = "fastembed"))]
        {
            false
        }
    }

    #[cfg(feature = "fastembed")]
    async fn engine(&self) -> Result<Arc<TextEmbedding>> {
        self.engine
            .get_or_try_init(|| async {
                info!(model = %self.name, "Loading local embedding model");

                let mut init = InitOptions::new(self.model.clone())
                    .with_max_length(self.load.max_length)
                    .with_show_download_progress(self.load.show_download_progress);
                if let Some(cache_dir) = &self.load.cache_dir {
                    init = init.with_cache_dir(cache_dir.clone());
                }

                let name = self.name.clone();
                let engine = tokio::task::spawn_blocking(move || TextEmbedding::try_new(init))
                    .await
                    .map_err(|e| LocalEmbedderError::ModelLoad {
                        model: name.clone(),
                        reason: e.to_string(),
                    })?
                    .map_err(|e| LocalEmbedderError::ModelLoad {
                        model: name,
                        reason: e.to_string(),
                    })?;

                info!(model = %self.name, "Local embedding model loaded");
                Ok::<_, LocalEmbedderError>(Arc::new(engine))
            })
            .await
            .cloned()
    }

    /// Encode `texts`, loading the model first if needed.
    pub async fn encode(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let expected = texts.len();
        let embeddings = self.run(texts).await?;

        if embeddings.len() != expected {
            return Err(LocalEmbedderError::embedding(format!(
                "expected {expected} embeddings, got {}",
                embeddings.len()
            )));
        }
        debug!(model = %self.name, count = expected, "Generated local embeddings");

        if self.encode.normalize_embeddings {
            Ok(embeddings.into_iter().map(l2_normalize).collect())
        } else {
            Ok(embeddings)
        }
    }

    #[cfg(feature = "fastembed")]
    async fn run(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        let engine = self.engine().await?;
        let batch_size = self.encode.batch_size;
        tokio::task::spawn_blocking(move || engine.embed(texts, batch_size))
            .await
            .map_err(|e| LocalEmbedderError::embedding(e.to_string()))?
            .map_err(|e| LocalEmbedderError::embedding(e.to_string()))
    }

    #[cfg(not(feature = "fastembed"))]
    #[allow(clippy::unused_async)]
    async fn run(&self, _texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        Err(LocalEmbedderError::RuntimeUnavailable)
    }
}

/// Scale `vector` to unit length. Zero vectors are returned unchanged.
pub fn l2_normalize(mut vector: Vec<f32>) -> Vec<f32> {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        for x in &mut vector {
            *x /= norm;
        }
    }
    vector
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("BAAI/bge-small-en-v1.5", Some(384) ; "exact name")]
    #[test_case("all-MiniLM-L6-v2", Some(384) ; "bare sentence transformers name")]
    #[test_case("baai/BGE-LARGE-en-v1.5", Some(1024) ; "case insensitive")]
    #[test_case("acme/unknown", None ; "unknown")]
    fn test_known_dimension(name: &str, expected: Option<usize>) {
        assert_eq!(known_dimension(name), expected);
    }

    #[test]
    fn test_repo_name() {
        assert_eq!(repo_name("Xenova/bge-small-en-v1.5"), "bge-small-en-v1.5");
        assert_eq!(repo_name("plain"), "plain");
    }

    #[test_case("BAAI/bge-small-zh-v1.5", true ; "rehosted org")]
    #[test_case("bge-small-en-v1.5", true ; "bare name")]
    #[test_case("my-private-org/bge-small-en-v1.5", false ; "foreign org")]
    fn test_matches_by_repo(name: &str, expected: bool) {
        assert_eq!(matches_by_repo(name), expected);
    }

    #[test]
    fn test_l2_normalize() {
        let v = l2_normalize(vec![3.0, 4.0]);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
        assert_eq!(l2_normalize(vec![0.0, 0.0]), vec![0.0, 0.0]);
    }

    #[cfg(feature = "fastembed")]
    #[test]
    fn test_resolve_does_not_load() {
        let model = LocalModel::new(
            "BAAI/bge-small-en-v1.5",
            LoadOptions::default(),
            EncodeOptions::default(),
        )
        .unwrap();
        assert_eq!(model.dimension(), Some(384));
        assert!(!model.is_loaded());
    }

    #[cfg(feature = "fastembed")]
    #[test]
    fn test_unknown_model_rejected() {
        let err = LocalModel::new(
            "acme/definitely-not-a-model",
            LoadOptions::default(),
            EncodeOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, LocalEmbedderError::UnknownModel { .. }));
    }

    #[cfg(feature = "fastembed")]
    #[test]
    fn test_foreign_org_not_substituted() {
        let err = LocalModel::new(
            "my-private-org/bge-small-en-v1.5",
            LoadOptions::default(),
            EncodeOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            LocalEmbedderError::UnknownModel { ref model } if model == "my-private-org/bge-small-en-v1.5"
        ));
    }

    #[cfg(not(feature = "fastembed"))]
    #[tokio::test]
    async fn test_encode_without_runtime_fails() {
        let model =
            LocalModel::new("any/model", LoadOptions::default(), EncodeOptions::default()).unwrap();
        let err = model.encode(vec!["x".to_string()]).await.unwrap_err();
        assert!(matches!(err, LocalEmbedderError::RuntimeUnavailable));
    }

    // Requires a model download.
    #[cfg(feature = "fastembed")]
    #[tokio::test]
    #[ignore]
    async fn test_encode_normalized() {
        let model = LocalModel::new(
            "BAAI/bge-small-en-v1.5",
            LoadOptions::default(),
            EncodeOptions {
                normalize_embeddings: true,
                batch_size: None,
            },
        )
        .unwrap();

        let embeddings = model
            .encode(vec!["Hello".to_string(), "World".to_string()])
            .await
            .unwrap();

        assert_eq!(embeddings.len(), 2);
        for embedding in embeddings {
            assert_eq!(embedding.len(), 384);
            let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 1e-3);
        }
        assert!(model.is_loaded());
    }
}
