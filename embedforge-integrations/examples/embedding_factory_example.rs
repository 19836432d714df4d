//! Build embedding clients from configuration and embed a few texts.
//!
//! Uses a local model by default. Pass a path to a JSON or TOML config file
//! to use any other provider:
//!
//! ```bash
//! cargo run --example embedding_factory_example
//! cargo run --example embedding_factory_example -- embedding.toml
//! ```

use embedforge_core::config::{EmbeddingConfig, load_embedding_config};
use embedforge_core::traits::Embedder;
use embedforge_integrations::EmbeddingFactory;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "embedforge_integrations=debug,info".into()),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => load_embedding_config(path).await?,
        None => EmbeddingConfig::hugging_face("BAAI/bge-small-en-v1.5"),
    };
    println!("Provider: {}", config.provider());
    println!("Model:    {}", config.model());

    let client = EmbeddingFactory::create_embedding_model(&config)?;

    let query = client.embed("What is the capital of France?").await?;
    println!("Query embedding: {} dimensions", query.len());

    let documents = client
        .embed_batch(vec![
            "Paris is the capital of France.",
            "Berlin is the capital of Germany.",
        ])
        .await?;

    for (i, document) in documents.iter().enumerate() {
        let score: f32 = query.iter().zip(document).map(|(a, b)| a * b).sum();
        println!("Document {i}: similarity {score:.4}");
    }

    Ok(())
}
