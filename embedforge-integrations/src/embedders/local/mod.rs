//! Embedding models run in-process.
//!
//! Both clients share one runtime ([`LocalModel`]), backed by FastEmbed when
//! the `fastembed` feature is enabled. Construction only resolves the model
//! name; weights are downloaded and loaded on the first embedding call.

mod backend;
mod error;
mod huggingface;
mod options;
mod sentence_transformers;

pub use backend::{LocalModel, l2_normalize};
pub use error::{LocalEmbedderError, Result};
pub use huggingface::HuggingFaceEmbedder;
pub use options::{EncodeOptions, LoadOptions};
pub use sentence_transformers::SentenceTransformerEmbedder;
