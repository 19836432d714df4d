//! Embedding generation trait.
//!
//! Every client the factory builds implements [`Embedder`], so callers can
//! embed text without knowing which provider sits behind the handle.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::Result;
use crate::config::EmbeddingProvider;

/// Generates dense embeddings for text content.
///
/// # Examples
///
/// ```rust,no_run
/// use embedforge_core::config::EmbeddingProvider;
/// use embedforge_core::traits::Embedder;
/// use embedforge_core::Result;
/// use async_trait::async_trait;
///
/// #[derive(Debug)]
/// struct ConstantEmbedder {
///     dimension: usize,
/// }
///
/// #[async_trait]
/// impl Embedder for ConstantEmbedder {
///     async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
///         Ok(vec![0.1; self.dimension])
///     }
///
///     async fn embed_batch(&self, texts: Vec<&str>) -> Result<Vec<Vec<f32>>> {
///         Ok(texts.iter().map(|_| vec![0.1; self.dimension]).collect())
///     }
///
///     fn dimension(&self) -> Option<usize> {
///         Some(self.dimension)
///     }
///
///     fn model_name(&self) -> &str {
///         "constant"
///     }
///
///     fn provider(&self) -> EmbeddingProvider {
///         EmbeddingProvider::HuggingFace
///     }
/// }
/// ```
#[async_trait]
pub trait Embedder: Send + Sync + std::fmt::Debug {
    /// Generate embedding for a single text.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider rejects the request, the network
    /// fails, or a local model cannot be loaded.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts.
    ///
    /// The result has one embedding per input text, in input order. An empty
    /// input yields an empty result.
    async fn embed_batch(&self, texts: Vec<&str>) -> Result<Vec<Vec<f32>>>;

    /// Size of the vectors this embedder produces, when known up front.
    fn dimension(&self) -> Option<usize>;

    /// Get the name/identifier of the embedding model.
    fn model_name(&self) -> &str;

    /// The provider backing this embedder.
    fn provider(&self) -> EmbeddingProvider;

    /// Get a human-readable name for this embedder.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Check if the embedder is healthy and ready to generate embeddings.
    async fn health_check(&self) -> Result<()> {
        self.embed("health check").await.map(|_| ())
    }

    /// Get metadata about the embedding model.
    fn metadata(&self) -> HashMap<String, serde_json::Value> {
        let mut metadata = HashMap::new();
        metadata.insert("provider".to_string(), self.provider().as_str().into());
        metadata.insert("model_name".to_string(), self.model_name().into());
        if let Some(dimension) = self.dimension() {
            metadata.insert("dimension".to_string(), dimension.into());
        }
        metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct FixedEmbedder;

    #[async_trait]
    impl Embedder for FixedEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            #[allow(clippy::cast_precision_loss)]
            Ok(vec![text.len() as f32])
        }

        async fn embed_batch(&self, texts: Vec<&str>) -> Result<Vec<Vec<f32>>> {
            let mut out = Vec::with_capacity(texts.len());
            for text in texts {
                out.push(self.embed(text).await?);
            }
            Ok(out)
        }

        fn dimension(&self) -> Option<usize> {
            Some(1)
        }

        fn model_name(&self) -> &str {
            "fixed"
        }

        fn provider(&self) -> EmbeddingProvider {
            EmbeddingProvider::SentenceTransformers
        }
    }

    #[tokio::test]
    async fn test_default_health_check_embeds() {
        assert!(FixedEmbedder.health_check().await.is_ok());
    }

    #[test]
    fn test_default_metadata() {
        let metadata = FixedEmbedder.metadata();
        assert_eq!(metadata["provider"], "sentence_transformers");
        assert_eq!(metadata["model_name"], "fixed");
        assert_eq!(metadata["dimension"], 1);
    }
}
