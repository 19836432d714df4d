//! API-based embedding clients.
//!
//! Each client sends exactly one HTTP request per [`Embedder`] call. There is
//! no retry, caching or client-side batching; callers that need those wrap
//! the client.
//!
//! [`Embedder`]: embedforge_core::traits::Embedder
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use embedforge_integrations::embedders::api::OpenAiEmbedder;
//! use embedforge_core::traits::Embedder;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let embedder = OpenAiEmbedder::new(
//!     "text-embedding-3-small",
//!     Some("your-api-key".to_string()),
//!     None,
//! )?;
//!
//! let embedding = embedder.embed("Hello, world!").await?;
//! let embeddings = embedder.embed_batch(vec!["Hello", "World"]).await?;
//! # Ok(())
//! # }
//! ```

pub mod azure;
pub mod error;
pub mod gemini;
mod http;
pub mod openai;

// Re-export main types
pub use azure::AzureOpenAiEmbedder;
pub use error::{ApiEmbedderError, Result};
pub use gemini::{GeminiEmbedder, GeminiOptions, GeminiTaskType};
pub use openai::OpenAiEmbedder;
