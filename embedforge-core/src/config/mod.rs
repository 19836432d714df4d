//! Configuration types for embedforge.
//!
//! Provider configurations are plain serde data: they can be built in code,
//! parsed from a JSON value, or loaded from a JSON/TOML file.

pub mod embedding;
pub mod loader;

// Re-export all config types for convenience
pub use embedding::*;
pub use loader::{ConfigLoader, load_embedding_config};
