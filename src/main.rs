use std::time::Duration;

use tracing_subscriber::EnvFilter;

use portfolio_search::api;
use portfolio_search::config::Config;
use portfolio_search::readiness::{wait_until_ready, Readiness};
use portfolio_search::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!(
        "Ranking: threshold {} / limit {}",
        config.ranking.similarity_threshold,
        config.ranking.result_limit
    );

    let state = AppState::new(config.clone());

    // Probe the index without holding up startup for long.
    if let Some(index) = state.index.clone() {
        tracing::info!("Search index: {} (namespace {})", index.host(), config.index.namespace);
        tokio::spawn(async move {
            let probe = || {
                let index = index.clone();
                async move { index.ping().await }
            };
            match wait_until_ready(probe, Duration::from_secs(2), Duration::from_secs(10)).await {
                Readiness::Confirmed { attempts } => {
                    tracing::info!("Search index reachable after {attempts} attempt(s)");
                }
                Readiness::Assumed { attempts } => {
                    tracing::warn!("Search index not confirmed after {attempts} attempt(s); serving anyway");
                }
            }
        });
    } else {
        tracing::warn!("PINECONE_API_KEY / PINECONE_INDEX_HOST not set; /api/search will return 500");
    }

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    api::serve(listener, state).await?;
    Ok(())
}
