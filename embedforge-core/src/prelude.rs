//! Prelude module for convenient imports.
//!
//! ```rust
//! use embedforge_core::prelude::*;
//!
//! let config = EmbeddingConfig::openai("text-embedding-3-small");
//! assert!(config.is_api());
//! ```

// Re-export core error types
pub use crate::error::{EmbedForgeError, Result};

// Re-export core traits
pub use crate::traits::Embedder;

// Re-export configuration types
pub use crate::config::{
    AzureEmbeddingConfig, BaseEmbeddingConfig, ConfigLoader, EmbeddingConfig, EmbeddingProvider,
    GeminiEmbeddingConfig, HuggingFaceEmbeddingConfig, Kwargs, OpenAiEmbeddingConfig,
    SentenceTransformersEmbeddingConfig, load_embedding_config,
};

// Re-export factory types
pub use crate::factory::EmbedderFactory;
