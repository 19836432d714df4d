//! Core traits for embedforge.
//!
//! [`Embedder`] is the capability every constructed client exposes; callers
//! depend on it rather than on a concrete provider type.

pub mod embedder;

// Re-export all traits for convenience
pub use embedder::*;
