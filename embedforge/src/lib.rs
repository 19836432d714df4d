//! # Embedforge
//!
//! Build text-embedding clients for cloud APIs and local models from one
//! typed configuration.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use embedforge::prelude::*;
//!
//! # async fn example() -> embedforge::core::Result<()> {
//! let config = EmbeddingConfig::openai("text-embedding-3-small")
//!     .with_api_key("sk-...");
//! let client = EmbeddingFactory::create_embedding_model(&config)?;
//!
//! let embedding = client.embed("Hello, world!").await?;
//! println!("{} dimensions", embedding.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **embedforge-core**: configuration types and loader, the `Embedder`
//!   trait, errors
//! - **embedforge-integrations**: provider clients and the `EmbeddingFactory`

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export all public APIs from sub-crates
pub use embedforge_core as core;
pub use embedforge_integrations as integrations;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and traits
/// from all embedforge modules.
pub mod prelude {
    // Re-export core prelude
    pub use embedforge_core::prelude::*;

    pub use embedforge_integrations::{EmbeddingClient, EmbeddingFactory};
}

/// Version information for the embedforge library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
