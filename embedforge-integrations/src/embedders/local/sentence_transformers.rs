//! Sentence Transformers models run in-process.

use async_trait::async_trait;
use embedforge_core::{
    Result as CoreResult,
    config::{EmbeddingProvider, Kwargs, non_empty},
    traits::Embedder,
};

use super::backend::LocalModel;
use super::error::Result;
use super::options::{EncodeOptions, LoadOptions};

/// Embedder for a Sentence Transformers model hosted locally.
///
/// Bare model names such as `all-MiniLM-L6-v2` resolve under the
/// `sentence-transformers/` organization.
#[derive(Debug)]
pub struct SentenceTransformerEmbedder {
    cache_folder: Option<String>,
    encode_kwargs: Kwargs,
    model: LocalModel,
}

impl SentenceTransformerEmbedder {
    /// Create an embedder for `model_name`. Weights load on first use.
    pub fn new<S: Into<String>>(
        model_name: S,
        cache_folder: Option<String>,
        encode_kwargs: Kwargs,
    ) -> CoreResult<Self> {
        Self::build(model_name.into(), cache_folder, encode_kwargs).map_err(|e| {
            e.into_construction_error(EmbeddingProvider::SentenceTransformers.as_str())
        })
    }

    fn build(
        model_name: String,
        cache_folder: Option<String>,
        encode_kwargs: Kwargs,
    ) -> Result<Self> {
        let load = LoadOptions::default().with_default_cache_dir(non_empty(cache_folder.as_deref()));
        let encode = EncodeOptions::from_kwargs(&encode_kwargs)?;
        let model = LocalModel::new(model_name, load, encode)?;

        Ok(Self {
            cache_folder,
            encode_kwargs,
            model,
        })
    }

    /// Directory model files are cached in.
    pub fn cache_folder(&self) -> Option<&str> {
        self.cache_folder.as_deref()
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
impl Embedder for SentenceTransformerEmbedder {
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
        EmbeddingProvider::SentenceTransformers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_cache_folder_used_for_loading() {
        let embedder = SentenceTransformerEmbedder::new(
            "all-MiniLM-L6-v2",
            Some("/tmp/st-cache".to_string()),
            Kwargs::new(),
        )
        .unwrap();

        assert_eq!(embedder.cache_folder(), Some("/tmp/st-cache"));
        assert_eq!(
            embedder.local_model().load_options().cache_dir.as_deref(),
            Some(Path::new("/tmp/st-cache"))
        );
        assert_eq!(embedder.dimension(), Some(384));
        assert_eq!(embedder.model_name(), "all-MiniLM-L6-v2");
    }

    #[test]
    fn test_no_normalization_by_default() {
        let embedder = SentenceTransformerEmbedder::new(
            "sentence-transformers/all-MiniLM-L6-v2",
            None,
            Kwargs::new(),
        )
        .unwrap();

        assert!(embedder.encode_kwargs().is_empty());
        assert!(!embedder.local_model().encode_options().normalize_embeddings);
        assert_eq!(embedder.local_model().load_options().cache_dir, None);
    }
}
