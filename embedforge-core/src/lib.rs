//! # Embedforge Core
//!
//! Core traits, configuration types, and errors for embedforge.
//!
//! - **Configuration**: [`config::EmbeddingConfig`], a tagged union with one
//!   variant per embedding provider, plus a JSON/TOML file loader
//! - **Capability**: the [`traits::Embedder`] trait every constructed client
//!   implements
//! - **Factory**: the [`factory::EmbedderFactory`] trait
//! - **Error handling**: [`EmbedForgeError`] and the [`Result`] alias
//!
//! ## Quick Start
//!
//! ```rust
//! use embedforge_core::prelude::*;
//!
//! let config = EmbeddingConfig::hugging_face("BAAI/bge-small-en-v1.5");
//! assert_eq!(config.provider(), EmbeddingProvider::HuggingFace);
//! config.validate().unwrap();
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export commonly used types and traits
pub mod prelude;

// Core modules
pub mod config;
pub mod error;
pub mod factory;
pub mod traits;

// Re-export key types at crate root for convenience
pub use error::{EmbedForgeError, Result};

// Re-export traits for convenience
pub use traits::*;

/// Version information for the embedforge core library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the embedforge core library.
pub const NAME: &str = env!("CARGO_PKG_NAME");
