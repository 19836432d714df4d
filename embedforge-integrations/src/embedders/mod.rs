//! Embedding model implementations.
//!
//! API clients live in [`api`]; models run in-process live in [`local`].

pub mod api;
pub mod local;

// Re-export implementations
pub use api::{AzureOpenAiEmbedder, GeminiEmbedder, OpenAiEmbedder};
pub use local::{HuggingFaceEmbedder, SentenceTransformerEmbedder};
