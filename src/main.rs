use std::sync::Arc;

use heronfit_api::{
    config::{Config, DataBackend},
    db::{create_pool, create_redis_client, Cache},
    routes::{create_router, AppState},
    services::{
        providers::{CachedCatalogProvider, PostgresProvider, SupabaseProvider},
        RecommendationService, WorkoutDataProvider,
    },
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("heronfit_api=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let provider: Arc<dyn WorkoutDataProvider> = match config.data_backend()? {
        DataBackend::Postgres { database_url } => {
            let pool = create_pool(&database_url).await?;
            Arc::new(PostgresProvider::new(pool))
        }
        DataBackend::Supabase { url, service_key } => {
            tracing::info!(url = %url, "Using Supabase REST backend");
            Arc::new(SupabaseProvider::new(url, service_key))
        }
    };

    let (provider, catalog_cache, cache_writer) = match config.catalog_cache() {
        Some((redis_url, ttl)) => {
            let client = create_redis_client(redis_url)?;
            let (cache, writer) = Cache::new(client).await;

            let cached: Arc<dyn WorkoutDataProvider> =
                Arc::new(CachedCatalogProvider::new(provider, cache.clone(), ttl));
            (cached, Some(cache), Some(writer))
        }
        None => (provider, None, None),
    };

    tracing::info!(provider = provider.name(), "Workout data provider ready");

    let recommender = RecommendationService::new(provider, config.community_template_size);
    let app = create_router(AppState::new(recommender, catalog_cache));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("Server running on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(writer) = cache_writer {
        writer.shutdown().await;
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
