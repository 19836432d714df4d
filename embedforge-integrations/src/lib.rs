//! Provider clients and the embedding factory for embedforge.
//!
//! - [`embedders::api`]: Azure OpenAI, OpenAI and Gemini over HTTP
//! - [`embedders::local`]: Hugging Face and Sentence Transformers models run
//!   in-process through FastEmbed
//! - [`EmbeddingFactory`]: turns an
//!   [`EmbeddingConfig`](embedforge_core::config::EmbeddingConfig) into an
//!   [`EmbeddingClient`]

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod embedders;
pub mod factory;

// Re-export commonly used types
pub use client::EmbeddingClient;
pub use factory::EmbeddingFactory;
