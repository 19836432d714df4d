//! Factory trait for creating embedders from configuration.
//!
//! The concrete factory lives in `embedforge-integrations`, next to the
//! provider clients it constructs.

pub mod embedder;

// Re-export all factory traits for convenience
pub use embedder::*;
