//! Hugging Face models run in-process.

use async_trait::async_trait;
use embedforge_core::{
    Result as CoreResult,
    config::{EmbeddingProvider, Kwargs},
    traits::Embedder,
};

use super::backend::LocalModel;
use super::error::Result;
use super::options::{EncodeOptions, LoadOptions};

/// Embedder for a Hugging Face model hosted locally.
///
/// `model_kwargs` configure loading (`max_length`, `cache_dir`,
/// `show_download_progress`); `encode_kwargs` configure inference
/// (`normalize_embeddings`, `batch_size`). Both mappings are kept as given.
///
/// ```rust,no_run
/// use embedforge_integrations::embedders::local::HuggingFaceEmbedder;
/// use embedforge_core::traits::Embedder;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let embedder = HuggingFaceEmbedder::new(
///     "BAAI/bge-small-en-v1.5",
///     Default::default(),
///     Default::default(),
/// )?;
/// let embedding = embedder.embed("Hello, world!").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct HuggingFaceEmbedder {
    model_kwargs: Kwargs,
    encode_kwargs: Kwargs,
    model: LocalModel,
}

impl HuggingFaceEmbedder {
    /// Create an embedder for `model_name`. Weights load on first use.
    pub fn new<S: Into<String>>(
        model_name: S,
        model_kwargs: Kwargs,
        encode_kwargs: Kwargs,
    ) -> CoreResult<Self> {
        Self::build(model_name.into(), model_kwargs, encode_kwargs)
            .map_err(|e| e.into_construction_error(EmbeddingProvider::HuggingFace.as_str()))
    }

    fn build(model_name: String, model_kwargs: Kwargs, encode_kwargs: Kwargs) -> Result<Self> {
        let load = LoadOptions::from_kwargs(&model_kwargs)?;
        let encode = EncodeOptions::from_kwargs(&encode_kwargs)?;
        let model = LocalModel::new(model_name, load, encode)?;

        Ok(Self {
            model_kwargs,
            encode_kwargs,
            model,
        })
    }

    /// Model options as given at construction.
    pub fn model_kwargs(&self) -> &Kwargs {
        &self.model_kwargs
    }

    /// Encode options as given at construction.
    pub fn encode_kwargs(&self) -> &Kwargs {
        &self.encode_kwargs
    }

    /// The underlying local model.
    pub fn local_model(&self) -> &LocalModel {
        &self.model
    }
}

#[async_trait]
impl Embedder for HuggingFaceEmbedder {
    async fn embed(&self, text: &str) -> CoreResult<Vec<f32>> {
        let mut embeddings = self.model.encode(vec![text.to_string()]).await?;
        Ok(embeddings.pop().unwrap_or_default())
    }

    async fn embed_batch(&self, texts: Vec<&str>) -> CoreResult<Vec<Vec<f32>>> {
        let texts = texts.into_iter().map(str::to_string).collect();
        Ok(self.model.encode(texts).await?)
    }

    fn dimension(&self) -> Option<usize> {
        self.model.dimension()
    }

    fn model_name(&self) -> &str {
        self.model.name()
    }

    fn provider(&self) -> EmbeddingProvider {
        EmbeddingProvider::HuggingFace
    }
}
