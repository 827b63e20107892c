use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};
use translation_portal::config::Config;
use translation_portal::corpus::{Glossary, SourceCorpus};
use translation_portal::server::{router, AppState};
use translation_portal::store::RecordStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("translation_portal=info".parse()?),
        )
        .init();

    info!("Starting translation portal");

    // Load configuration from environment
    let config = Config::from_env()?;

    // Load the source corpus; a missing file leaves progress reporting empty
    // but the portal still serves and stores translations
    let corpus = match SourceCorpus::load(&config.source_strings_file) {
        Ok(corpus) => {
            info!(
                "Loaded {} source strings ({} chars)",
                corpus.total_strings(),
                corpus.total_chars()
            );
            corpus
        }
        Err(e) => {
            warn!("Source corpus unavailable: {:#}", e);
            SourceCorpus::default()
        }
    };

    // The glossary degrades the same way: no term set, but the portal runs
    let glossary = match Glossary::load(&config.glossary_file) {
        Ok(glossary) => {
            info!("Loaded {} glossary terms", glossary.terms().count());
            glossary
        }
        Err(e) => {
            warn!("Glossary unavailable: {:#}", e);
            Glossary::default()
        }
    };

    let store = RecordStore::new(&config.data_dir, &config.backup_dir);
    let port = config.port;

    let state = AppState {
        config: Arc::new(config),
        store,
        corpus: Arc::new(corpus),
        glossary: Arc::new(glossary),
    };

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    info!("Listening on port {}", port);

    axum::serve(listener, router(state))
        .await
        .context("Server error")?;

    Ok(())
}
